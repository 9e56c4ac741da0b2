//! Admin authentication
//!
//! Every `/admin` route requires `Authorization: Bearer <ADMIN_TOKEN>`.

use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use cadenza_core::AppError;
use std::sync::Arc;
use subtle::ConstantTimeEq;

#[derive(Clone)]
pub struct AuthState {
    pub admin_token: String,
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized(message: &str) -> Response {
    HttpAppError(AppError::Unauthorized(message.to_string())).into_response()
}

pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        return unauthorized("Missing authorization header");
    };

    let Some(token) = header.strip_prefix("Bearer ") else {
        return unauthorized("Invalid authorization header format");
    };

    if !secure_compare(token.trim(), &auth_state.admin_token) {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request with invalid token");
        return unauthorized("Invalid token");
    }

    next.run(request).await
}
