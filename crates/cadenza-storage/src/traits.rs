//! Asset store abstraction
//!
//! This module defines the AssetStore trait the ingest pipeline, the cascade
//! coordinator and the orphan sweeper work against.

use async_trait::async_trait;
use bytes::Bytes;
use cadenza_core::{AppError, AssetCategory};
use std::path::PathBuf;
use std::pin::Pin;
use std::time::SystemTime;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The logical key was rejected by the sandbox. The message never contains the key.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Write failed: {0}")]
    WriteFailure(String),

    #[error("IO failure: {0}")]
    IoFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidPath(msg) => AppError::InvalidPath(msg),
            StorageError::WriteFailure(msg) => AppError::WriteFailure(msg),
            StorageError::IoFailure(msg) => AppError::IoFailure(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// One top-level entry of an asset category directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub key: String,
    pub modified: SystemTime,
}

/// Sandboxed asset storage.
///
/// Every operation resolves its logical key through the sandbox first, so an
/// invalid key fails with `InvalidPath` before anything touches the filesystem.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Resolve a logical key to its absolute location inside the storage root.
    fn resolve(&self, logical_key: &str) -> StorageResult<PathBuf>;

    /// Stream bytes to the given key, creating intermediate directories and
    /// overwriting any existing file. Returns the number of bytes written.
    async fn save(
        &self,
        logical_key: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64>;

    /// Save an in-memory payload.
    async fn save_bytes(&self, logical_key: &str, data: Bytes) -> StorageResult<u64> {
        self.save(logical_key, Box::pin(std::io::Cursor::new(data)))
            .await
    }

    /// Recursively remove the file or directory behind the key.
    ///
    /// A missing target is not an error: callers may race with an earlier
    /// partial cleanup.
    async fn remove_file_or_directory(&self, logical_key: &str) -> StorageResult<()>;

    /// Check if a file or directory exists
    async fn exists(&self, logical_key: &str) -> StorageResult<bool>;

    /// List the top-level entries stored for a category (one per upload).
    async fn list_category(&self, category: AssetCategory) -> StorageResult<Vec<StoredEntry>>;
}
