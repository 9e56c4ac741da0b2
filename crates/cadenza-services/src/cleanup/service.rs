use cadenza_core::{AppError, AssetCategory};
use cadenza_db::CatalogStore;
use cadenza_storage::AssetStore;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::interval;

/// Removes stored assets that no catalog record references.
///
/// Forced cascades leave dependents' assets behind, and a crash between a
/// record write and a storage write can leak an upload; both end up here.
#[derive(Clone)]
pub struct OrphanSweeper {
    catalog: Arc<dyn CatalogStore>,
    store: Arc<dyn AssetStore>,
    /// Entries younger than this are never removed, so uploads whose record
    /// has not been written yet survive.
    grace_period: Duration,
}

impl OrphanSweeper {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        store: Arc<dyn AssetStore>,
        grace_period: Duration,
    ) -> Self {
        Self {
            catalog,
            store,
            grace_period,
        }
    }

    /// Start the background sweep task.
    /// Returns a JoinHandle for graceful shutdown
    pub fn start(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(every);

            loop {
                sweep_interval.tick().await;

                tracing::info!("Starting scheduled sweep of orphaned assets");

                match self.sweep_once().await {
                    Ok(removed) => {
                        tracing::info!(removed = removed.len(), "Orphan sweep completed")
                    }
                    Err(e) => tracing::error!(error = %e, "Orphan sweep failed"),
                }
            }
        })
    }

    /// Run one sweep and return the keys that were removed.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "orphans"))]
    pub async fn sweep_once(&self) -> Result<Vec<String>, AppError> {
        let referenced: HashSet<String> = self
            .catalog
            .referenced_asset_keys()
            .await?
            .into_iter()
            .collect();
        let now = SystemTime::now();
        let mut removed = Vec::new();

        for category in AssetCategory::ALL {
            let entries = match self.store.list_category(category).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        category = category.directory(),
                        "Failed to list assets, skipping category"
                    );
                    continue;
                }
            };

            for entry in entries {
                if referenced.contains(&entry.key) {
                    continue;
                }

                // A modification time in the future counts as brand new.
                let age = now.duration_since(entry.modified).unwrap_or_default();
                if age < self.grace_period {
                    tracing::debug!(key = %entry.key, age_secs = age.as_secs(), "Unreferenced asset within grace period");
                    continue;
                }

                match self.store.remove_file_or_directory(&entry.key).await {
                    Ok(()) => {
                        tracing::info!(key = %entry.key, "Removed orphaned asset");
                        removed.push(entry.key);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, key = %entry.key, "Failed to remove orphaned asset");
                    }
                }
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use cadenza_core::models::{NewArtist, NewTrack};
    use cadenza_db::InMemoryCatalogStore;
    use cadenza_storage::LocalAssetStore;
    use tempfile::{tempdir, TempDir};
    use uuid::Uuid;

    async fn setup() -> (TempDir, InMemoryCatalogStore, Arc<LocalAssetStore>) {
        let dir = tempdir().unwrap();
        let store = Arc::new(LocalAssetStore::new(dir.path()).await.unwrap());
        let catalog = InMemoryCatalogStore::new();

        for key in [
            "artists/kept.png",
            "artists/orphan.png",
            "tracks/kept/original",
            "tracks/orphan/original",
            "tracks/orphan/low.mp3",
        ] {
            store.save_bytes(key, Bytes::from_static(b"x")).await.unwrap();
        }

        catalog
            .insert_artist(NewArtist {
                name: "kept".to_string(),
                artwork_key: "artists/kept.png".to_string(),
            })
            .await
            .unwrap();
        catalog
            .insert_track(NewTrack {
                name: "kept".to_string(),
                album: Uuid::new_v4(),
                artists: vec![],
                audio_dir: "tracks/kept".to_string(),
                duration_seconds: 60,
                lyrics: None,
            })
            .await
            .unwrap();

        (dir, catalog, store)
    }

    #[tokio::test]
    async fn test_removes_unreferenced_and_keeps_referenced() {
        let (_dir, catalog, store) = setup().await;
        let sweeper = OrphanSweeper::new(Arc::new(catalog), store.clone(), Duration::ZERO);

        let mut removed = sweeper.sweep_once().await.unwrap();
        removed.sort();

        assert_eq!(removed, vec!["artists/orphan.png", "tracks/orphan"]);
        assert!(store.exists("artists/kept.png").await.unwrap());
        assert!(store.exists("tracks/kept/original").await.unwrap());
        assert!(!store.exists("tracks/orphan").await.unwrap());
    }

    #[tokio::test]
    async fn test_grace_period_protects_fresh_uploads() {
        let (_dir, catalog, store) = setup().await;
        let sweeper = OrphanSweeper::new(
            Arc::new(catalog),
            store.clone(),
            Duration::from_secs(3600),
        );

        assert!(sweeper.sweep_once().await.unwrap().is_empty());
        assert!(store.exists("artists/orphan.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_store_sweeps_nothing() {
        let dir = tempdir().unwrap();
        let store = Arc::new(LocalAssetStore::new(dir.path()).await.unwrap());
        let sweeper = OrphanSweeper::new(
            Arc::new(InMemoryCatalogStore::new()),
            store,
            Duration::ZERO,
        );

        assert!(sweeper.sweep_once().await.unwrap().is_empty());
    }
}
