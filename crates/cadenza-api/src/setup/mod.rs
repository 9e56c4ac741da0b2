//! Application setup: configuration checks, database, services, routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::Router;
use cadenza_core::Config;
use cadenza_db::{CatalogStore, PgCatalogStore};
use cadenza_processing::{FfmpegTool, MediaTool};
use cadenza_storage::{AssetStore, LocalAssetStore};
use std::sync::Arc;

/// Build everything the server needs and start the background sweeper.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    crate::telemetry::init_telemetry(std::env::var("LOG_FORMAT").ok().as_deref())?;

    config.validate()?;
    tracing::info!(environment = %config.environment, "Configuration loaded");

    let pool = database::setup_database(&config).await?;
    let catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(pool));

    let store: Arc<dyn AssetStore> = Arc::new(
        LocalAssetStore::new(&config.upload_dir)
            .await
            .context("Failed to initialize asset storage")?,
    );

    let tool: Arc<dyn MediaTool> = Arc::new(FfmpegTool::new(
        config.ffmpeg_path.clone(),
        config.ffprobe_path.clone(),
    )?);

    services::start_orphan_sweeper(&config, Arc::clone(&catalog), Arc::clone(&store));

    let state = Arc::new(services::build_state(config, catalog, store, tool));
    let router = routes::setup_routes(Arc::clone(&state));

    Ok((state, router))
}
