use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The catalog collections that take part in referential integrity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Artist,
    Album,
    Track,
    Genre,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Artist => "Artist",
            EntityKind::Album => "Album",
            EntityKind::Track => "Track",
            EntityKind::Genre => "Genre",
        }
    }

    /// Table backing this collection.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artists",
            EntityKind::Album => "albums",
            EntityKind::Track => "tracks",
            EntityKind::Genre => "genres",
        }
    }

    /// Column holding the entity's logical asset key, if the entity owns one.
    pub fn asset_column(&self) -> Option<&'static str> {
        match self {
            EntityKind::Artist | EntityKind::Album => Some("artwork_key"),
            EntityKind::Track => Some("audio_dir"),
            EntityKind::Genre => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: Uuid,
    pub name: String,
    pub artwork_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: Uuid,
    pub name: String,
    pub artists: Vec<Uuid>,
    pub genres: Vec<Uuid>,
    pub artwork_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: Uuid,
    pub name: String,
    pub album: Uuid,
    pub artists: Vec<Uuid>,
    /// Logical key of the per-upload directory (original + transcoded siblings).
    pub audio_dir: String,
    pub duration_seconds: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewArtist {
    pub name: String,
    pub artwork_key: String,
}

#[derive(Debug, Clone)]
pub struct NewAlbum {
    pub name: String,
    pub artists: Vec<Uuid>,
    pub genres: Vec<Uuid>,
    pub artwork_key: String,
}

#[derive(Debug, Clone)]
pub struct NewTrack {
    pub name: String,
    pub album: Uuid,
    pub artists: Vec<Uuid>,
    pub audio_dir: String,
    pub duration_seconds: i32,
    pub lyrics: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGenre {
    pub name: String,
}

/// Partial update of an album. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct AlbumChanges {
    pub name: Option<String>,
    pub artists: Option<Vec<Uuid>>,
    pub genres: Option<Vec<Uuid>>,
    pub artwork_key: Option<String>,
}

/// Partial update of a track. A new `audio_dir` always comes with its
/// `duration_seconds`.
#[derive(Debug, Clone, Default)]
pub struct TrackChanges {
    pub name: Option<String>,
    pub album: Option<Uuid>,
    pub artists: Option<Vec<Uuid>>,
    pub audio_dir: Option<String>,
    pub duration_seconds: Option<i32>,
    pub lyrics: Option<String>,
}

/// Collection-agnostic view of one catalog record, as needed by deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: EntityKind,
    pub id: Uuid,
    pub display_name: String,
    pub asset_key: Option<String>,
}
