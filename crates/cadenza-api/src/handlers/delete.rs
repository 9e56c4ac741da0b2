//! Deletion routes. Every entity goes through the cascade coordinator.

use crate::error::{ConflictResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use cadenza_core::{DeleteRequest, EntityKind};
use cadenza_services::DeletionOutcome;
use std::sync::Arc;

async fn delete_entity(
    state: &AppState,
    kind: EntityKind,
    query: Result<Query<DeleteRequest>, QueryRejection>,
) -> Result<Response, HttpAppError> {
    let Query(request) = query?;

    match state.coordinator.delete(kind, request).await? {
        DeletionOutcome::Deleted(report) => {
            tracing::info!(
                entity = %kind,
                id = %report.id,
                removed_dependents = report.removed_dependents,
                storage_removed = report.storage_removed,
                "Entity deleted"
            );
            Ok(Json(report).into_response())
        }
        DeletionOutcome::Blocked(conflict) => {
            Ok(ConflictResponse::new(kind, conflict).into_response())
        }
    }
}

pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DeleteRequest>, QueryRejection>,
) -> Result<Response, HttpAppError> {
    delete_entity(&state, EntityKind::Artist, query).await
}

pub async fn delete_album(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DeleteRequest>, QueryRejection>,
) -> Result<Response, HttpAppError> {
    delete_entity(&state, EntityKind::Album, query).await
}

pub async fn delete_track(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DeleteRequest>, QueryRejection>,
) -> Result<Response, HttpAppError> {
    delete_entity(&state, EntityKind::Track, query).await
}

pub async fn delete_genre(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DeleteRequest>, QueryRejection>,
) -> Result<Response, HttpAppError> {
    delete_entity(&state, EntityKind::Genre, query).await
}
