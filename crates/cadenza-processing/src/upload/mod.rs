//! Upload ingest pipeline: validate, store, transcode, roll back on failure

pub mod service;
pub mod types;

pub use service::AssetIngestService;
pub use types::UploadRequest;
