use crate::error::HttpAppError;
use crate::handlers::{ensure_exists, form::UploadForm, IdQuery};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cadenza_core::models::{NewTrack, TrackChanges};
use cadenza_core::{AppError, AssetCategory, EntityKind, StoredAssetDescriptor};
use cadenza_processing::UploadRequest;
use std::sync::Arc;

/// Run an upload through the transcoding pipeline and return its directory
/// key with the whole-second duration.
async fn ingest_audio(
    state: &AppState,
    upload: UploadRequest,
) -> Result<(String, i32), HttpAppError> {
    let StoredAssetDescriptor {
        logical_key,
        duration_seconds,
    } = state
        .ingest
        .ingest(AssetCategory::TrackAudio, upload)
        .await?;

    match duration_seconds {
        Some(duration) => Ok((logical_key, duration as i32)),
        None => {
            state.ingest.discard(&logical_key).await;
            Err(AppError::Internal("audio ingest returned no duration".to_string()).into())
        }
    }
}

/// Ingest and transcode an audio upload, then record the track.
#[tracing::instrument(skip(state, multipart))]
pub async fn create_track(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut form = UploadForm::read(multipart).await?;
    let name = form.required("name")?;
    let album = form.uuid("album")?;
    let artists = form.required_uuid_list("artists")?;
    let lyrics = form.text("lyrics");
    let upload = form.require_file()?;

    ensure_exists(state.catalog.as_ref(), EntityKind::Album, &[album]).await?;
    ensure_exists(state.catalog.as_ref(), EntityKind::Artist, &artists).await?;

    let (audio_dir, duration_seconds) = ingest_audio(&state, upload).await?;

    let track = match state
        .catalog
        .insert_track(NewTrack {
            name,
            album,
            artists,
            audio_dir: audio_dir.clone(),
            duration_seconds,
            lyrics,
        })
        .await
    {
        Ok(track) => track,
        Err(e) => {
            state.ingest.discard(&audio_dir).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        track_id = %track.id,
        key = %track.audio_dir,
        duration_seconds = track.duration_seconds,
        "Track created"
    );
    Ok((StatusCode::CREATED, Json(track)))
}

/// Partially update a track.
///
/// A new audio file is transcoded into a fresh directory first. The previous
/// directory is removed only once the record points at the new one; any
/// failure before that leaves the old audio and record untouched.
#[tracing::instrument(skip(state, query, multipart))]
pub async fn update_track(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(IdQuery { id }) = query?;
    let mut form = UploadForm::read(multipart).await?;
    let name = form.text("name");
    let album = form.optional_uuid("album")?;
    let artists = form.optional_uuid_list("artists")?;
    let lyrics = form.text("lyrics");
    let upload = form.take_file();

    if name.is_none()
        && album.is_none()
        && artists.is_none()
        && lyrics.is_none()
        && upload.is_none()
    {
        return Err(AppError::InvalidInput("Nothing to update".to_string()).into());
    }

    let existing = state
        .catalog
        .get_track(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Track not found".to_string()))?;

    if let Some(album) = album {
        ensure_exists(state.catalog.as_ref(), EntityKind::Album, &[album]).await?;
    }
    if let Some(artists) = &artists {
        ensure_exists(state.catalog.as_ref(), EntityKind::Artist, artists).await?;
    }

    let audio = match upload {
        Some(upload) => Some(ingest_audio(&state, upload).await?),
        None => None,
    };
    let new_dir = audio.as_ref().map(|(dir, _)| dir.clone());

    let changes = TrackChanges {
        name,
        album,
        artists,
        audio_dir: new_dir.clone(),
        duration_seconds: audio.map(|(_, duration)| duration),
        lyrics,
    };
    let updated = match state.catalog.update_track(id, changes).await {
        Ok(Some(track)) => track,
        Ok(None) => {
            if let Some(dir) = &new_dir {
                state.ingest.discard(dir).await;
            }
            return Err(AppError::NotFound("Track not found".to_string()).into());
        }
        Err(e) => {
            if let Some(dir) = &new_dir {
                state.ingest.discard(dir).await;
            }
            return Err(e.into());
        }
    };

    if new_dir.is_some() && existing.audio_dir != updated.audio_dir {
        state.ingest.discard(&existing.audio_dir).await;
    }

    tracing::info!(
        track_id = %updated.id,
        key = %updated.audio_dir,
        duration_seconds = updated.duration_seconds,
        "Track updated"
    );
    Ok(Json(updated))
}
