use crate::error::HttpAppError;
use crate::handlers::{ensure_exists, form::UploadForm, IdQuery};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cadenza_core::models::{AlbumChanges, NewAlbum};
use cadenza_core::{AppError, AssetCategory, EntityKind};
use std::sync::Arc;

#[tracing::instrument(skip(state, multipart))]
pub async fn create_album(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut form = UploadForm::read(multipart).await?;
    let name = form.required("name")?;
    let artists = form.required_uuid_list("artists")?;
    let genres = form.required_uuid_list("genres")?;
    let upload = form.require_file()?;

    ensure_exists(state.catalog.as_ref(), EntityKind::Artist, &artists).await?;
    ensure_exists(state.catalog.as_ref(), EntityKind::Genre, &genres).await?;

    let stored = state
        .ingest
        .ingest(AssetCategory::AlbumArtwork, upload)
        .await?;

    let album = match state
        .catalog
        .insert_album(NewAlbum {
            name,
            artists,
            genres,
            artwork_key: stored.logical_key.clone(),
        })
        .await
    {
        Ok(album) => album,
        Err(e) => {
            state.ingest.discard(&stored.logical_key).await;
            return Err(e.into());
        }
    };

    tracing::info!(album_id = %album.id, key = %album.artwork_key, "Album created");
    Ok((StatusCode::CREATED, Json(album)))
}

/// Partially update an album. Artwork is replaced the same way as an
/// artist's: new file stored, record repointed, old file removed.
#[tracing::instrument(skip(state, query, multipart))]
pub async fn update_album(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(IdQuery { id }) = query?;
    let mut form = UploadForm::read(multipart).await?;
    let name = form.text("name");
    let artists = form.optional_uuid_list("artists")?;
    let genres = form.optional_uuid_list("genres")?;
    let upload = form.take_file();

    if name.is_none() && artists.is_none() && genres.is_none() && upload.is_none() {
        return Err(AppError::InvalidInput("Nothing to update".to_string()).into());
    }

    let existing = state
        .catalog
        .get_album(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

    if let Some(artists) = &artists {
        ensure_exists(state.catalog.as_ref(), EntityKind::Artist, artists).await?;
    }
    if let Some(genres) = &genres {
        ensure_exists(state.catalog.as_ref(), EntityKind::Genre, genres).await?;
    }

    let new_key = match upload {
        Some(upload) => Some(
            state
                .ingest
                .ingest(AssetCategory::AlbumArtwork, upload)
                .await?
                .logical_key,
        ),
        None => None,
    };

    let changes = AlbumChanges {
        name,
        artists,
        genres,
        artwork_key: new_key.clone(),
    };
    let updated = match state.catalog.update_album(id, changes).await {
        Ok(Some(album)) => album,
        Ok(None) => {
            if let Some(key) = &new_key {
                state.ingest.discard(key).await;
            }
            return Err(AppError::NotFound("Album not found".to_string()).into());
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

    tracing::info!(album_id = %updated.id, "Album updated");
    Ok(Json(updated))
}
