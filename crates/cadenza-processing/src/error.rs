use cadenza_core::AppError;
use cadenza_storage::StorageError;

use crate::validator::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Transcode failed: {0}")]
    Transcode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Validation(ValidationError::UnsupportedMediaType {
                message, ..
            }) => AppError::UnsupportedMediaType(message.to_string()),
            ProcessingError::Validation(ValidationError::EmptyFile) => {
                AppError::InvalidInput("Uploaded file is empty".to_string())
            }
            ProcessingError::Validation(e @ ValidationError::FileTooLarge { .. }) => {
                AppError::PayloadTooLarge(e.to_string())
            }
            ProcessingError::Probe(msg) => AppError::ProbeFailure(msg),
            ProcessingError::Transcode(msg) => AppError::TranscodeFailure(msg),
            ProcessingError::Storage(e) => e.into(),
        }
    }
}
