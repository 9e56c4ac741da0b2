//! Catalog store abstraction
//!
//! The minimal interface the integrity engine, the orphan sweeper and the
//! admin routes need from persistence, so each can be exercised without a
//! database.

use async_trait::async_trait;
use cadenza_core::models::{
    Album, AlbumChanges, Artist, CatalogEntry, DependentRecord, DependentRule, EntityKind, Genre,
    NewAlbum, NewArtist, NewGenre, NewTrack, Track, TrackChanges,
};
use cadenza_core::AppError;
use uuid::Uuid;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up any catalog record by kind and id.
    async fn find_entry(&self, kind: EntityKind, id: Uuid)
        -> Result<Option<CatalogEntry>, AppError>;

    /// Records of `rule.dependent` whose `rule.field` references `parent_id`,
    /// ordered by id. One query per call.
    async fn find_dependents(
        &self,
        rule: &DependentRule,
        parent_id: Uuid,
    ) -> Result<Vec<DependentRecord>, AppError>;

    /// Delete one record. Returns false when it did not exist.
    async fn delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<bool, AppError>;

    async fn insert_genre(&self, genre: NewGenre) -> Result<Genre, AppError>;

    /// Rename a genre. Names stay unique.
    async fn update_genre(&self, id: Uuid, name: String) -> Result<Option<Genre>, AppError>;

    async fn insert_artist(&self, artist: NewArtist) -> Result<Artist, AppError>;

    async fn get_artist(&self, id: Uuid) -> Result<Option<Artist>, AppError>;

    /// Rename and/or repoint the artwork of an artist. `None` keeps the current value.
    async fn update_artist(
        &self,
        id: Uuid,
        name: Option<String>,
        artwork_key: Option<String>,
    ) -> Result<Option<Artist>, AppError>;

    async fn insert_album(&self, album: NewAlbum) -> Result<Album, AppError>;

    async fn get_album(&self, id: Uuid) -> Result<Option<Album>, AppError>;

    async fn update_album(
        &self,
        id: Uuid,
        changes: AlbumChanges,
    ) -> Result<Option<Album>, AppError>;

    async fn insert_track(&self, track: NewTrack) -> Result<Track, AppError>;

    async fn get_track(&self, id: Uuid) -> Result<Option<Track>, AppError>;

    async fn update_track(
        &self,
        id: Uuid,
        changes: TrackChanges,
    ) -> Result<Option<Track>, AppError>;

    /// Every logical asset key some record currently points at.
    async fn referenced_asset_keys(&self) -> Result<Vec<String>, AppError>;
}
