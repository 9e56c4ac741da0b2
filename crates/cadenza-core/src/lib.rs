//! Cadenza Core Library
//!
//! This crate provides the domain models, error types and configuration shared
//! by every Cadenza component: the storage layer, the transcoding pipeline,
//! the catalog store, the integrity engine and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AssetCategory, CatalogEntry, DeleteRequest, DependentConflict, DependentRecord,
    DependentRule, EntityKind, MatchKind, MimeClass, StoredAssetDescriptor,
};
