//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that
//! converts into [`AppError`] converts into [`HttpAppError`] and renders with
//! the same status, body and log level.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{multipart::MultipartError, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cadenza_core::{AppError, DependentConflict, DependentRecord, EntityKind, ErrorMetadata, LogLevel};
use cadenza_processing::ProcessingError;
use cadenza_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Body of a 409 returned when a non-forced delete hits dependents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    pub message: String,
    pub dependent_type: EntityKind,
    pub dependents: Vec<DependentRecord>,
}

impl ConflictResponse {
    pub fn new(kind: EntityKind, conflict: DependentConflict) -> Self {
        Self {
            message: format!(
                "Cannot delete {}: it is referenced by {} {} record(s)",
                kind,
                conflict.dependents.len(),
                conflict.dependent_type
            ),
            dependent_type: conflict.dependent_type,
            dependents: conflict.dependents,
        }
    }
}

impl IntoResponse for ConflictResponse {
    fn into_response(self) -> Response {
        tracing::debug!(
            dependent_type = %self.dependent_type,
            dependents = self.dependents.len(),
            "Deletion blocked by dependents"
        );
        (StatusCode::CONFLICT, Json(self)).into_response()
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: neither the trait nor the type is local to this crate).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<QueryRejection> for HttpAppError {
    fn from(rejection: QueryRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid query parameters: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpAppError(AppError::PayloadTooLarge(
                "Request body exceeds the upload limit".to_string(),
            ));
        }
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid multipart body: {}",
            err.body_text()
        )))
    }
}

/// JSON body extractor that answers malformed bodies with our ErrorResponse format.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.eq_ignore_ascii_case("production") || env.eq_ignore_ascii_case("prod"))
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Sensitive errors never carry details; nothing does in production.
        let (details, error_type) = if is_production_env() || app_error.is_sensitive() {
            (None, None)
        } else {
            (
                Some(app_error.detailed_message()),
                Some(app_error.error_type().to_string()),
            )
        };

        let body = ErrorResponse {
            error: app_error.client_message(),
            details,
            error_type,
            code: app_error.error_code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_sensitive_error_hides_details() {
        let response =
            HttpAppError(AppError::InvalidPath("tracks/../../etc".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["code"], "INVALID_PATH");
        assert_eq!(json["error"], "Invalid asset path");
        assert!(json.get("details").is_none());
        assert!(json.get("error_type").is_none());
        assert!(!text.contains("tracks/../../etc"));
    }

    #[tokio::test]
    async fn test_non_sensitive_error_carries_details() {
        let response =
            HttpAppError(AppError::NotFound("Album not found".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["error_type"], "NotFound");
        assert!(json["details"].as_str().unwrap().contains("Album not found"));
    }

    #[test]
    fn test_conflict_response_shape() {
        let id = Uuid::new_v4();
        let body = ConflictResponse::new(
            EntityKind::Album,
            DependentConflict {
                dependent_type: EntityKind::Track,
                dependents: vec![DependentRecord {
                    id,
                    display_name: "Intro".to_string(),
                }],
            },
        );

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["dependentType"], "Track");
        assert_eq!(json["dependents"][0]["id"], id.to_string());
        assert_eq!(json["dependents"][0]["displayName"], "Intro");
        assert!(json["message"].as_str().unwrap().contains("Album"));
    }

    #[test]
    fn test_processing_error_maps_to_status() {
        let err: HttpAppError = ProcessingError::Probe("no duration".to_string()).into();
        assert_eq!(err.0.http_status_code(), 500);
    }
}
