//! Application state shared by every handler.

use cadenza_core::Config;
use cadenza_db::CatalogStore;
use cadenza_processing::AssetIngestService;
use cadenza_services::CascadeDeleteCoordinator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<dyn CatalogStore>,
    pub ingest: AssetIngestService,
    pub coordinator: CascadeDeleteCoordinator,
}
