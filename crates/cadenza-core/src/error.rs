//! Error types module
//!
//! This module provides the error taxonomy used throughout Cadenza. All failures
//! that cross a crate boundary are unified under [`AppError`], which knows how to
//! present itself (status code, machine code, log level) through [`ErrorMetadata`].
//!
//! A blocked deletion is not an error: it is reported as a structured
//! [`DependentConflict`](crate::models::DependentConflict) outcome.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_PATH")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    /// A logical key escaped (or tried to escape) the storage root.
    #[error("Invalid asset path: {0}")]
    InvalidPath(String),

    /// The declared MIME class does not match what the asset category accepts.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Write failure: {0}")]
    WriteFailure(String),

    #[error("IO failure: {0}")]
    IoFailure(String),

    #[error("Probe failure: {0}")]
    ProbeFailure(String),

    #[error("Transcode failure: {0}")]
    TranscodeFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::IoFailure(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "DATABASE_ERROR", true, LogLevel::Error),
        AppError::InvalidPath(_) => (400, "INVALID_PATH", true, LogLevel::Warn),
        AppError::UnsupportedMediaType(_) => {
            (415, "UNSUPPORTED_MEDIA_TYPE", false, LogLevel::Debug)
        }
        AppError::WriteFailure(_) => (500, "WRITE_FAILURE", true, LogLevel::Error),
        AppError::IoFailure(_) => (500, "IO_FAILURE", true, LogLevel::Error),
        AppError::ProbeFailure(_) => (500, "PROBE_FAILURE", true, LogLevel::Error),
        AppError::TranscodeFailure(_) => (500, "TRANSCODE_FAILURE", true, LogLevel::Error),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::InvalidPath(_) => "InvalidPath",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::WriteFailure(_) => "WriteFailure",
            AppError::IoFailure(_) => "IOFailure",
            AppError::ProbeFailure(_) => "ProbeFailure",
            AppError::TranscodeFailure(_) => "TranscodeFailure",
            AppError::NotFound(_) => "NotFound",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::InvalidPath(_) => "Invalid asset path".to_string(),
            AppError::UnsupportedMediaType(ref msg) => msg.clone(),
            AppError::WriteFailure(_) => "Failed to store asset".to_string(),
            AppError::IoFailure(_) => "Failed to access storage".to_string(),
            AppError::ProbeFailure(_) => "Failed to read audio file".to_string(),
            AppError::TranscodeFailure(_) => "Failed to transcode audio file".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(err.client_message(), "Failed to access database");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_invalid_path_hides_reason_from_clients() {
        let err = AppError::InvalidPath("key contains a parent directory segment".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_PATH");
        assert_eq!(err.client_message(), "Invalid asset path");
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_unsupported_media_type() {
        let err = AppError::UnsupportedMediaType("Only audio files are accepted".to_string());
        assert_eq!(err.http_status_code(), 415);
        assert_eq!(err.client_message(), "Only audio files are accepted");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_transcode_failures_are_server_errors() {
        for err in [
            AppError::ProbeFailure("no duration".to_string()),
            AppError::TranscodeFailure("exit status 1".to_string()),
            AppError::WriteFailure("disk full".to_string()),
        ] {
            assert_eq!(err.http_status_code(), 500);
            assert!(err.is_sensitive());
            assert_eq!(err.log_level(), LogLevel::Error);
        }
    }

    #[test]
    fn test_io_error_converts_to_io_failure() {
        let err = AppError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.error_type(), "IOFailure");
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("inner").context("outer"));
        let details = err.detailed_message();
        assert!(details.contains("Internal error with source"));
        assert!(details.contains("outer"));
    }
}
