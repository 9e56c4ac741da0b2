use crate::error::HttpAppError;
use crate::handlers::{form::UploadForm, IdQuery};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cadenza_core::models::NewArtist;
use cadenza_core::{AppError, AssetCategory};
use std::sync::Arc;

#[tracing::instrument(skip(state, multipart))]
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut form = UploadForm::read(multipart).await?;
    let name = form.required("name")?;
    let upload = form.require_file()?;

    let stored = state
        .ingest
        .ingest(AssetCategory::ArtistArtwork, upload)
        .await?;

    let artist = match state
        .catalog
        .insert_artist(NewArtist {
            name,
            artwork_key: stored.logical_key.clone(),
        })
        .await
    {
        Ok(artist) => artist,
        Err(e) => {
            state.ingest.discard(&stored.logical_key).await;
            return Err(e.into());
        }
    };

    tracing::info!(artist_id = %artist.id, key = %artist.artwork_key, "Artist created");
    Ok((StatusCode::CREATED, Json(artist)))
}

/// Rename an artist and/or replace its artwork.
///
/// The new artwork is stored first and the record repointed; only then is the
/// previous file removed.
#[tracing::instrument(skip(state, query, multipart))]
pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(IdQuery { id }) = query?;
    let mut form = UploadForm::read(multipart).await?;
    let name = form.text("name");
    let upload = form.take_file();

    if name.is_none() && upload.is_none() {
        return Err(AppError::InvalidInput("Nothing to update".to_string()).into());
    }

    let existing = state
        .catalog
        .get_artist(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))?;

    let new_key = match upload {
        Some(upload) => Some(
            state
                .ingest
                .ingest(AssetCategory::ArtistArtwork, upload)
                .await?
                .logical_key,
        ),
        None => None,
    };

    let updated = match state.catalog.update_artist(id, name, new_key.clone()).await {
        Ok(Some(artist)) => artist,
        Ok(None) => {
            if let Some(key) = &new_key {
                state.ingest.discard(key).await;
            }
            return Err(AppError::NotFound("Artist not found".to_string()).into());
        }
        Err(e) => {
            if let Some(key) = &new_key {
                state.ingest.discard(key).await;
            }
            return Err(e.into());
        }
    };

    if new_key.is_some() && existing.artwork_key != updated.artwork_key {
        state.ingest.discard(&existing.artwork_key).await;
    }

    tracing::info!(artist_id = %updated.id, "Artist updated");
    Ok(Json(updated))
}
