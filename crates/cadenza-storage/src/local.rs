use crate::sandbox::PathSandbox;
use crate::traits::{AssetStore, StorageError, StorageResult, StoredEntry};
use async_trait::async_trait;
use cadenza_core::AssetCategory;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::AsyncRead;

/// Local filesystem asset store
#[derive(Clone)]
pub struct LocalAssetStore {
    sandbox: PathSandbox,
}

impl LocalAssetStore {
    /// Create a new LocalAssetStore instance
    ///
    /// # Arguments
    /// * `root` - Root directory for asset storage (e.g., "/var/lib/cadenza/uploads")
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let root = root.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize storage root: {}", e))
        })?;

        Ok(LocalAssetStore {
            sandbox: PathSandbox::new(root),
        })
    }

    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::WriteFailure(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    async fn write_stream(
        &self,
        path: &Path,
        reader: &mut Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::WriteFailure(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
            StorageError::WriteFailure(format!(
                "Failed to write stream to file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailure(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(bytes_copied)
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    fn resolve(&self, logical_key: &str) -> StorageResult<PathBuf> {
        self.sandbox.resolve(logical_key)
    }

    async fn save(
        &self,
        logical_key: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let path = self.resolve(logical_key)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let bytes_copied = match self.write_stream(&path, &mut reader).await {
            Ok(n) => n,
            Err(e) => {
                if let Err(cleanup_err) = fs::remove_file(&path).await {
                    if cleanup_err.kind() != ErrorKind::NotFound {
                        tracing::warn!(
                            error = %cleanup_err,
                            key = %logical_key,
                            "Failed to remove partially written asset"
                        );
                    }
                }
                return Err(e);
            }
        };

        tracing::info!(
            path = %path.display(),
            key = %logical_key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Asset saved"
        );

        Ok(bytes_copied)
    }

    async fn remove_file_or_directory(&self, logical_key: &str) -> StorageResult<()> {
        let path = self.resolve(logical_key)?;
        let start = std::time::Instant::now();

        let metadata = match fs::symlink_metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key = %logical_key, "Asset already absent, nothing to remove");
                return Ok(());
            }
            Err(e) => {
                return Err(StorageError::IoFailure(format!(
                    "Failed to stat {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };

        match result {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key = %logical_key, "Asset vanished during removal");
                return Ok(());
            }
            Err(e) => {
                return Err(StorageError::IoFailure(format!(
                    "Failed to remove {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        tracing::info!(
            path = %path.display(),
            key = %logical_key,
            directory = metadata.is_dir(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Asset removed"
        );

        Ok(())
    }

    async fn exists(&self, logical_key: &str) -> StorageResult<bool> {
        let path = self.resolve(logical_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn list_category(&self, category: AssetCategory) -> StorageResult<Vec<StoredEntry>> {
        let dir = self.resolve(category.directory())?;

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::IoFailure(format!(
                    "Failed to list {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut listed = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::IoFailure(format!("Failed to read entry: {}", e)))?
        {
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                tracing::warn!(dir = %dir.display(), "Skipping entry with non UTF-8 name");
                continue;
            };
            let modified = entry
                .metadata()
                .await
                .and_then(|m| m.modified())
                .map_err(|e| StorageError::IoFailure(format!("Failed to stat {}: {}", name, e)))?;

            listed.push(StoredEntry {
                key: format!("{}/{}", category.directory(), name),
                modified,
            });
        }

        listed.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(listed)
    }
}
