//! Cadenza Processing Library
//!
//! Upload validation, audio probing and transcoding, and the ingest pipeline
//! that turns an upload into a stored asset (or leaves nothing behind).

pub mod audio;
pub mod error;
pub mod upload;
pub mod validator;

pub use audio::{FfmpegTool, MediaTool, TranscodeOrchestrator, TranscodePreset};
pub use error::{ProcessingError, ProcessingResult};
pub use upload::{AssetIngestService, UploadRequest};
pub use validator::{UploadValidator, ValidationError};
