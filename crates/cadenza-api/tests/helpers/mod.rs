//! Test helpers: build the router over an in-memory catalog, a temporary
//! asset store and a fake media tool.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use cadenza_api::setup::{routes, services};
use cadenza_core::Config;
use cadenza_db::InMemoryCatalogStore;
use cadenza_processing::{MediaTool, ProcessingError, ProcessingResult, TranscodePreset};
use cadenza_storage::LocalAssetStore;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN_TOKEN: &str = "test-admin-token-0123456789";

/// Writes a placeholder file per preset instead of running ffmpeg.
pub struct FakeMediaTool {
    pub duration: f64,
    pub fail_transcode: bool,
}

#[async_trait]
impl MediaTool for FakeMediaTool {
    async fn probe_duration(&self, _input: &Path) -> ProcessingResult<f64> {
        Ok(self.duration)
    }

    async fn transcode(
        &self,
        _input: &Path,
        output: &Path,
        _preset: &TranscodePreset,
    ) -> ProcessingResult<()> {
        if self.fail_transcode {
            return Err(ProcessingError::Transcode("encoder exited with status 1".to_string()));
        }
        tokio::fs::write(output, b"transcoded")
            .await
            .map_err(|e| ProcessingError::Transcode(e.to_string()))
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub catalog: InMemoryCatalogStore,
    pub store: Arc<LocalAssetStore>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> &Path {
        self._temp_dir.path()
    }
}

pub fn test_config(upload_dir: &Path) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 1,
        upload_dir: upload_dir.to_path_buf(),
        admin_token: ADMIN_TOKEN.to_string(),
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        max_concurrent_transcodes: 2,
        max_upload_size_bytes: 1024 * 1024,
        orphan_sweep_interval_secs: 0,
        orphan_sweep_grace_secs: 0,
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_tool(FakeMediaTool {
        duration: 183.6,
        fail_transcode: false,
    })
    .await
}

pub async fn setup_test_app_with_tool(tool: FakeMediaTool) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = Arc::new(
        LocalAssetStore::new(temp_dir.path())
            .await
            .expect("Failed to create asset store"),
    );
    let catalog = InMemoryCatalogStore::new();

    let state = services::build_state(
        test_config(temp_dir.path()),
        Arc::new(catalog.clone()),
        store.clone(),
        Arc::new(tool),
    );
    let router = routes::setup_routes(Arc::new(state));
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        catalog,
        store,
        _temp_dir: temp_dir,
    }
}

pub fn bearer() -> String {
    format!("Bearer {}", ADMIN_TOKEN)
}
