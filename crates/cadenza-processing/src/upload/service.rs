//! Asset ingest service.
//!
//! One contract for every upload category. Images are stored as a single file;
//! audio gets its own directory holding the original and every transcode. On
//! failure nothing written by the attempt is left behind (best effort).

use std::sync::Arc;

use cadenza_core::{AssetCategory, MimeClass, StoredAssetDescriptor};
use cadenza_storage::{keys, AssetStore};

use super::types::UploadRequest;
use crate::audio::TranscodeOrchestrator;
use crate::error::ProcessingResult;
use crate::validator::UploadValidator;

#[derive(Clone)]
pub struct AssetIngestService {
    store: Arc<dyn AssetStore>,
    orchestrator: TranscodeOrchestrator,
    validator: UploadValidator,
}

impl AssetIngestService {
    pub fn new(
        store: Arc<dyn AssetStore>,
        orchestrator: TranscodeOrchestrator,
        validator: UploadValidator,
    ) -> Self {
        Self {
            store,
            orchestrator,
            validator,
        }
    }

    /// Validate, store and (for audio) transcode an upload.
    #[tracing::instrument(
        skip(self, request),
        fields(
            category = ?category,
            content_type = %request.content_type,
            size_bytes = request.body.len()
        )
    )]
    pub async fn ingest(
        &self,
        category: AssetCategory,
        request: UploadRequest,
    ) -> ProcessingResult<StoredAssetDescriptor> {
        self.validator
            .validate(category, &request.content_type, request.body.len())?;

        let descriptor = match category.expected_class() {
            MimeClass::Image => self.ingest_file(category, request).await?,
            MimeClass::Audio => self.ingest_audio(request).await?,
        };

        tracing::info!(key = %descriptor.logical_key, "Asset ingested");
        Ok(descriptor)
    }

    async fn ingest_file(
        &self,
        category: AssetCategory,
        request: UploadRequest,
    ) -> ProcessingResult<StoredAssetDescriptor> {
        let key = keys::file_key(category, &request.original_filename);
        self.store.save_bytes(&key, request.body).await?;

        Ok(StoredAssetDescriptor {
            logical_key: key,
            duration_seconds: None,
        })
    }

    async fn ingest_audio(&self, request: UploadRequest) -> ProcessingResult<StoredAssetDescriptor> {
        let directory = keys::track_directory_key();

        match self.store_and_transcode(&directory, request).await {
            Ok(duration) => Ok(StoredAssetDescriptor {
                logical_key: directory,
                duration_seconds: Some(duration),
            }),
            Err(e) => {
                tracing::warn!(key = %directory, error = %e, "Audio ingest failed, removing upload directory");
                self.discard(&directory).await;
                Err(e)
            }
        }
    }

    async fn store_and_transcode(
        &self,
        directory: &str,
        request: UploadRequest,
    ) -> ProcessingResult<f64> {
        let original_key = keys::track_original_key(directory);
        self.store.save_bytes(&original_key, request.body).await?;

        let original = self.store.resolve(&original_key)?;
        let destination = self.store.resolve(directory)?;

        self.orchestrator.transcode(&original, &destination).await
    }

    /// Best-effort removal of a previously ingested asset.
    ///
    /// Used to roll back after a later step fails and to drop a replaced asset.
    /// Failures are logged and swallowed; the orphan sweeper collects leftovers.
    pub async fn discard(&self, logical_key: &str) {
        if let Err(e) = self.store.remove_file_or_directory(logical_key).await {
            tracing::warn!(key = %logical_key, error = %e, "Failed to discard asset");
        }
    }
}
