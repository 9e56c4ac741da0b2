use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::IdQuery;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cadenza_core::models::NewGenre;
use cadenza_core::AppError;
use std::sync::Arc;

#[tracing::instrument(skip(state, body))]
pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<NewGenre>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Field 'name' is required".to_string()).into());
    }

    let genre = state
        .catalog
        .insert_genre(NewGenre {
            name: name.to_string(),
        })
        .await?;

    tracing::info!(genre_id = %genre.id, name = %genre.name, "Genre created");
    Ok((StatusCode::CREATED, Json(genre)))
}

#[tracing::instrument(skip(state, query, body))]
pub async fn update_genre(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
    ValidatedJson(body): ValidatedJson<NewGenre>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(IdQuery { id }) = query?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Field 'name' is required".to_string()).into());
    }

    let genre = state
        .catalog
        .update_genre(id, name.to_string())
        .await?
        .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;

    tracing::info!(genre_id = %genre.id, name = %genre.name, "Genre renamed");
    Ok(Json(genre))
}
