//! Router construction

use crate::auth::{admin_auth_middleware, AuthState};
use crate::handlers::{album, artist, delete, genre, health, track};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and text fields on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn setup_routes(state: Arc<AppState>) -> Router {
    let auth_state = Arc::new(AuthState {
        admin_token: state.config.admin_token.clone(),
    });
    let body_limit = state.config.max_upload_size_bytes + MULTIPART_OVERHEAD_BYTES;
    let files = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .route("/health", get(health::health))
        .nest("/admin", admin_routes(auth_state))
        .nest_service("/files", files)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_routes(auth_state: Arc<AuthState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/genre",
            post(genre::create_genre)
                .patch(genre::update_genre)
                .delete(delete::delete_genre),
        )
        .route(
            "/artist",
            post(artist::create_artist)
                .patch(artist::update_artist)
                .delete(delete::delete_artist),
        )
        .route(
            "/album",
            post(album::create_album)
                .patch(album::update_album)
                .delete(delete::delete_album),
        )
        .route(
            "/track",
            post(track::create_track)
                .patch(track::update_track)
                .delete(delete::delete_track),
        )
        .layer(middleware::from_fn_with_state(
            auth_state,
            admin_auth_middleware,
        ))
}
