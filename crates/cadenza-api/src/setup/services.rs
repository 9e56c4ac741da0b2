//! Wiring of the catalog, the asset store and the services built on them.

use crate::state::AppState;
use cadenza_core::Config;
use cadenza_db::CatalogStore;
use cadenza_processing::{AssetIngestService, MediaTool, TranscodeOrchestrator, UploadValidator};
use cadenza_services::{CascadeDeleteCoordinator, OrphanSweeper};
use cadenza_storage::AssetStore;
use std::sync::Arc;
use std::time::Duration;

/// Build the handler state from already constructed collaborators.
pub fn build_state(
    config: Config,
    catalog: Arc<dyn CatalogStore>,
    store: Arc<dyn AssetStore>,
    tool: Arc<dyn MediaTool>,
) -> AppState {
    let orchestrator =
        TranscodeOrchestrator::with_default_presets(tool, config.max_concurrent_transcodes);
    let validator = UploadValidator::new(config.max_upload_size_bytes);
    let ingest = AssetIngestService::new(Arc::clone(&store), orchestrator, validator);
    let coordinator = CascadeDeleteCoordinator::new(Arc::clone(&catalog), store);

    AppState {
        config,
        catalog,
        ingest,
        coordinator,
    }
}

/// Start the orphan sweeper unless it is disabled (interval 0).
pub fn start_orphan_sweeper(
    config: &Config,
    catalog: Arc<dyn CatalogStore>,
    store: Arc<dyn AssetStore>,
) -> Option<tokio::task::JoinHandle<()>> {
    if config.orphan_sweep_interval_secs == 0 {
        tracing::info!("Orphan sweeper disabled");
        return None;
    }

    let sweeper = Arc::new(OrphanSweeper::new(
        catalog,
        store,
        Duration::from_secs(config.orphan_sweep_grace_secs),
    ));
    tracing::info!(
        interval_secs = config.orphan_sweep_interval_secs,
        grace_secs = config.orphan_sweep_grace_secs,
        "Orphan sweeper started"
    );
    Some(sweeper.start(Duration::from_secs(config.orphan_sweep_interval_secs)))
}
