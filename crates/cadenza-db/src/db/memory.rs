//! In-memory catalog store
//!
//! Backs the API integration tests and local tooling without a database.
//! Dependent lookups understand exactly the fields the cascade table uses.

use async_trait::async_trait;
use cadenza_core::models::{
    Album, AlbumChanges, Artist, CatalogEntry, DependentRecord, DependentRule, EntityKind, Genre,
    NewAlbum, NewArtist, NewGenre, NewTrack, Track, TrackChanges,
};
use cadenza_core::AppError;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::catalog::CatalogStore;

#[derive(Default)]
struct Collections {
    artists: HashMap<Uuid, Artist>,
    albums: HashMap<Uuid, Album>,
    tracks: HashMap<Uuid, Track>,
    genres: HashMap<Uuid, Genre>,
}

#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    collections: Arc<Mutex<Collections>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, AppError> {
        self.collections
            .lock()
            .map_err(|_| AppError::Internal("catalog store lock poisoned".to_string()))
    }

    /// Number of records currently stored for `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        let Ok(collections) = self.collections.lock() else {
            return 0;
        };
        match kind {
            EntityKind::Artist => collections.artists.len(),
            EntityKind::Album => collections.albums.len(),
            EntityKind::Track => collections.tracks.len(),
            EntityKind::Genre => collections.genres.len(),
        }
    }
}

fn unknown_field(rule: &DependentRule) -> AppError {
    AppError::Internal(format!(
        "no dependent lookup for {}.{}",
        rule.dependent.collection(),
        rule.field
    ))
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find_entry(
        &self,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<Option<CatalogEntry>, AppError> {
        let collections = self.lock()?;
        let found = match kind {
            EntityKind::Artist => collections
                .artists
                .get(&id)
                .map(|a| (a.name.clone(), Some(a.artwork_key.clone()))),
            EntityKind::Album => collections
                .albums
                .get(&id)
                .map(|a| (a.name.clone(), Some(a.artwork_key.clone()))),
            EntityKind::Track => collections
                .tracks
                .get(&id)
                .map(|t| (t.name.clone(), Some(t.audio_dir.clone()))),
            EntityKind::Genre => collections.genres.get(&id).map(|g| (g.name.clone(), None)),
        };

        Ok(found.map(|(display_name, asset_key)| CatalogEntry {
            kind,
            id,
            display_name,
            asset_key,
        }))
    }

    async fn find_dependents(
        &self,
        rule: &DependentRule,
        parent_id: Uuid,
    ) -> Result<Vec<DependentRecord>, AppError> {
        let collections = self.lock()?;
        let mut dependents: Vec<DependentRecord> = match (rule.dependent, rule.field) {
            (EntityKind::Track, "album") => collections
                .tracks
                .values()
                .filter(|t| t.album == parent_id)
                .map(|t| record(t.id, &t.name))
                .collect(),
            (EntityKind::Track, "artists") => collections
                .tracks
                .values()
                .filter(|t| t.artists.contains(&parent_id))
                .map(|t| record(t.id, &t.name))
                .collect(),
            (EntityKind::Album, "artists") => collections
                .albums
                .values()
                .filter(|a| a.artists.contains(&parent_id))
                .map(|a| record(a.id, &a.name))
                .collect(),
            (EntityKind::Album, "genres") => collections
                .albums
                .values()
                .filter(|a| a.genres.contains(&parent_id))
                .map(|a| record(a.id, &a.name))
                .collect(),
            _ => return Err(unknown_field(rule)),
        };

        dependents.sort_by_key(|d| d.id);
        Ok(dependents)
    }

    async fn delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<bool, AppError> {
        let mut collections = self.lock()?;
        let removed = match kind {
            EntityKind::Artist => collections.artists.remove(&id).is_some(),
            EntityKind::Album => collections.albums.remove(&id).is_some(),
            EntityKind::Track => collections.tracks.remove(&id).is_some(),
            EntityKind::Genre => collections.genres.remove(&id).is_some(),
        };
        Ok(removed)
    }

    async fn insert_genre(&self, genre: NewGenre) -> Result<Genre, AppError> {
        let mut collections = self.lock()?;
        if collections.genres.values().any(|g| g.name == genre.name) {
            return Err(AppError::InvalidInput(format!(
                "Genre '{}' already exists",
                genre.name
            )));
        }

        let genre = Genre {
            id: Uuid::new_v4(),
            name: genre.name,
            created_at: Utc::now(),
        };
        collections.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn update_genre(&self, id: Uuid, name: String) -> Result<Option<Genre>, AppError> {
        let mut collections = self.lock()?;
        if collections
            .genres
            .values()
            .any(|g| g.id != id && g.name == name)
        {
            return Err(AppError::InvalidInput(format!(
                "Genre '{}' already exists",
                name
            )));
        }

        let Some(genre) = collections.genres.get_mut(&id) else {
            return Ok(None);
        };
        genre.name = name;
        Ok(Some(genre.clone()))
    }

    async fn insert_artist(&self, artist: NewArtist) -> Result<Artist, AppError> {
        let now = Utc::now();
        let artist = Artist {
            id: Uuid::new_v4(),
            name: artist.name,
            artwork_key: artist.artwork_key,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.artists.insert(artist.id, artist.clone());
        Ok(artist)
    }

    async fn get_artist(&self, id: Uuid) -> Result<Option<Artist>, AppError> {
        Ok(self.lock()?.artists.get(&id).cloned())
    }

    async fn update_artist(
        &self,
        id: Uuid,
        name: Option<String>,
        artwork_key: Option<String>,
    ) -> Result<Option<Artist>, AppError> {
        let mut collections = self.lock()?;
        let Some(artist) = collections.artists.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = name {
            artist.name = name;
        }
        if let Some(artwork_key) = artwork_key {
            artist.artwork_key = artwork_key;
        }
        artist.updated_at = Utc::now();
        Ok(Some(artist.clone()))
    }

    async fn insert_album(&self, album: NewAlbum) -> Result<Album, AppError> {
        let now = Utc::now();
        let album = Album {
            id: Uuid::new_v4(),
            name: album.name,
            artists: album.artists,
            genres: album.genres,
            artwork_key: album.artwork_key,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.albums.insert(album.id, album.clone());
        Ok(album)
    }

    async fn get_album(&self, id: Uuid) -> Result<Option<Album>, AppError> {
        Ok(self.lock()?.albums.get(&id).cloned())
    }

    async fn update_album(
        &self,
        id: Uuid,
        changes: AlbumChanges,
    ) -> Result<Option<Album>, AppError> {
        let mut collections = self.lock()?;
        let Some(album) = collections.albums.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            album.name = name;
        }
        if let Some(artists) = changes.artists {
            album.artists = artists;
        }
        if let Some(genres) = changes.genres {
            album.genres = genres;
        }
        if let Some(artwork_key) = changes.artwork_key {
            album.artwork_key = artwork_key;
        }
        album.updated_at = Utc::now();
        Ok(Some(album.clone()))
    }

    async fn insert_track(&self, track: NewTrack) -> Result<Track, AppError> {
        let now = Utc::now();
        let track = Track {
            id: Uuid::new_v4(),
            name: track.name,
            album: track.album,
            artists: track.artists,
            audio_dir: track.audio_dir,
            duration_seconds: track.duration_seconds,
            lyrics: track.lyrics,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.tracks.insert(track.id, track.clone());
        Ok(track)
    }

    async fn get_track(&self, id: Uuid) -> Result<Option<Track>, AppError> {
        Ok(self.lock()?.tracks.get(&id).cloned())
    }

    async fn update_track(
        &self,
        id: Uuid,
        changes: TrackChanges,
    ) -> Result<Option<Track>, AppError> {
        let mut collections = self.lock()?;
        let Some(track) = collections.tracks.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            track.name = name;
        }
        if let Some(album) = changes.album {
            track.album = album;
        }
        if let Some(artists) = changes.artists {
            track.artists = artists;
        }
        if let Some(audio_dir) = changes.audio_dir {
            track.audio_dir = audio_dir;
        }
        if let Some(duration_seconds) = changes.duration_seconds {
            track.duration_seconds = duration_seconds;
        }
        if let Some(lyrics) = changes.lyrics {
            track.lyrics = Some(lyrics);
        }
        track.updated_at = Utc::now();
        Ok(Some(track.clone()))
    }

    async fn referenced_asset_keys(&self) -> Result<Vec<String>, AppError> {
        let collections = self.lock()?;
        let keys = collections
            .artists
            .values()
            .map(|a| a.artwork_key.clone())
            .chain(collections.albums.values().map(|a| a.artwork_key.clone()))
            .chain(collections.tracks.values().map(|t| t.audio_dir.clone()))
            .collect();
        Ok(keys)
    }
}

fn record(id: Uuid, name: &str) -> DependentRecord {
    DependentRecord {
        id,
        display_name: name.to_string(),
    }
}
