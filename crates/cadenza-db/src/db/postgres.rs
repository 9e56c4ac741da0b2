use async_trait::async_trait;
use cadenza_core::models::{
    Album, AlbumChanges, Artist, CatalogEntry, DependentRecord, DependentRule, EntityKind, Genre,
    MatchKind, NewAlbum, NewArtist, NewGenre, NewTrack, Track, TrackChanges,
};
use cadenza_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::catalog::CatalogStore;

const ARTIST_COLUMNS: &str = "id, name, artwork_key, created_at, updated_at";
const ALBUM_COLUMNS: &str = "id, name, artists, genres, artwork_key, created_at, updated_at";
const TRACK_COLUMNS: &str =
    "id, name, album, artists, audio_dir, duration_seconds, lyrics, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    display_name: String,
    asset_key: Option<String>,
}

/// Dependent lookup query for one cascade rule.
///
/// Table and column names come from the static cascade table and
/// [`EntityKind`], never from a request; only the parent id is bound.
fn dependents_query(rule: &DependentRule) -> String {
    let predicate = match rule.match_kind {
        MatchKind::Scalar => format!("{} = $1", rule.field),
        // Containment keeps the lookup on the GIN index over the array column.
        MatchKind::ArrayContains => format!("{} @> ARRAY[$1]::UUID[]", rule.field),
    };
    format!(
        "SELECT id, {} AS display_name FROM {} WHERE {} ORDER BY id",
        rule.display_field,
        rule.dependent.collection(),
        predicate
    )
}

fn entry_query(kind: EntityKind) -> String {
    format!(
        "SELECT id, name AS display_name, {} AS asset_key FROM {} WHERE id = $1",
        kind.asset_column().unwrap_or("NULL::TEXT"),
        kind.collection()
    )
}

/// PostgreSQL catalog store
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    #[tracing::instrument(skip(self), fields(db.table = %kind.collection(), db.operation = "select", db.record_id = %id))]
    async fn find_entry(
        &self,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<Option<CatalogEntry>, AppError> {
        let row = sqlx::query_as::<Postgres, EntryRow>(&entry_query(kind))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| CatalogEntry {
            kind,
            id: row.id,
            display_name: row.display_name,
            asset_key: row.asset_key,
        }))
    }

    #[tracing::instrument(skip(self, rule), fields(db.table = %rule.dependent.collection(), db.operation = "select", field = rule.field))]
    async fn find_dependents(
        &self,
        rule: &DependentRule,
        parent_id: Uuid,
    ) -> Result<Vec<DependentRecord>, AppError> {
        let dependents = sqlx::query_as::<Postgres, DependentRecord>(&dependents_query(rule))
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(dependents)
    }

    #[tracing::instrument(skip(self), fields(db.table = %kind.collection(), db.operation = "delete", db.record_id = %id))]
    async fn delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.collection()))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "genres", db.operation = "insert"))]
    async fn insert_genre(&self, genre: NewGenre) -> Result<Genre, AppError> {
        sqlx::query_as::<Postgres, Genre>(
            "INSERT INTO genres (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(&genre.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::InvalidInput(format!("Genre '{}' already exists", genre.name))
            }
            other => other.into(),
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "genres", db.operation = "update", db.record_id = %id))]
    async fn update_genre(&self, id: Uuid, name: String) -> Result<Option<Genre>, AppError> {
        sqlx::query_as::<Postgres, Genre>(
            "UPDATE genres SET name = $2 WHERE id = $1 RETURNING id, name, created_at",
        )
        .bind(id)
        .bind(&name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::InvalidInput(format!("Genre '{}' already exists", name))
            }
            other => other.into(),
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "artists", db.operation = "insert"))]
    async fn insert_artist(&self, artist: NewArtist) -> Result<Artist, AppError> {
        let artist = sqlx::query_as::<Postgres, Artist>(&format!(
            "INSERT INTO artists (name, artwork_key) VALUES ($1, $2) RETURNING {ARTIST_COLUMNS}"
        ))
        .bind(&artist.name)
        .bind(&artist.artwork_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(artist)
    }

    #[tracing::instrument(skip(self), fields(db.table = "artists", db.operation = "select", db.record_id = %id))]
    async fn get_artist(&self, id: Uuid) -> Result<Option<Artist>, AppError> {
        let artist = sqlx::query_as::<Postgres, Artist>(&format!(
            "SELECT {ARTIST_COLUMNS} FROM artists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(artist)
    }

    #[tracing::instrument(skip(self), fields(db.table = "artists", db.operation = "update", db.record_id = %id))]
    async fn update_artist(
        &self,
        id: Uuid,
        name: Option<String>,
        artwork_key: Option<String>,
    ) -> Result<Option<Artist>, AppError> {
        let artist = sqlx::query_as::<Postgres, Artist>(&format!(
            r#"
            UPDATE artists
            SET name = COALESCE($2, name),
                artwork_key = COALESCE($3, artwork_key),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ARTIST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(artwork_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(artist)
    }

    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "insert"))]
    async fn insert_album(&self, album: NewAlbum) -> Result<Album, AppError> {
        let album = sqlx::query_as::<Postgres, Album>(&format!(
            r#"
            INSERT INTO albums (name, artists, genres, artwork_key)
            VALUES ($1, $2, $3, $4)
            RETURNING {ALBUM_COLUMNS}
            "#
        ))
        .bind(&album.name)
        .bind(&album.artists)
        .bind(&album.genres)
        .bind(&album.artwork_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(album)
    }

    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "select", db.record_id = %id))]
    async fn get_album(&self, id: Uuid) -> Result<Option<Album>, AppError> {
        let album = sqlx::query_as::<Postgres, Album>(&format!(
            "SELECT {ALBUM_COLUMNS} FROM albums WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(album)
    }

    #[tracing::instrument(skip(self, changes), fields(db.table = "albums", db.operation = "update", db.record_id = %id))]
    async fn update_album(
        &self,
        id: Uuid,
        changes: AlbumChanges,
    ) -> Result<Option<Album>, AppError> {
        let album = sqlx::query_as::<Postgres, Album>(&format!(
            r#"
            UPDATE albums
            SET name = COALESCE($2, name),
                artists = COALESCE($3, artists),
                genres = COALESCE($4, genres),
                artwork_key = COALESCE($5, artwork_key),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ALBUM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.artists)
        .bind(changes.genres)
        .bind(changes.artwork_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(album)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tracks", db.operation = "insert"))]
    async fn insert_track(&self, track: NewTrack) -> Result<Track, AppError> {
        let track = sqlx::query_as::<Postgres, Track>(&format!(
            r#"
            INSERT INTO tracks (name, album, artists, audio_dir, duration_seconds, lyrics)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TRACK_COLUMNS}
            "#
        ))
        .bind(&track.name)
        .bind(track.album)
        .bind(&track.artists)
        .bind(&track.audio_dir)
        .bind(track.duration_seconds)
        .bind(&track.lyrics)
        .fetch_one(&self.pool)
        .await?;

        Ok(track)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tracks", db.operation = "select", db.record_id = %id))]
    async fn get_track(&self, id: Uuid) -> Result<Option<Track>, AppError> {
        let track = sqlx::query_as::<Postgres, Track>(&format!(
            "SELECT {TRACK_COLUMNS} FROM tracks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(track)
    }

    #[tracing::instrument(skip(self, changes), fields(db.table = "tracks", db.operation = "update", db.record_id = %id))]
    async fn update_track(
        &self,
        id: Uuid,
        changes: TrackChanges,
    ) -> Result<Option<Track>, AppError> {
        let track = sqlx::query_as::<Postgres, Track>(&format!(
            r#"
            UPDATE tracks
            SET name = COALESCE($2, name),
                album = COALESCE($3, album),
                artists = COALESCE($4, artists),
                audio_dir = COALESCE($5, audio_dir),
                duration_seconds = COALESCE($6, duration_seconds),
                lyrics = COALESCE($7, lyrics),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TRACK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.album)
        .bind(changes.artists)
        .bind(changes.audio_dir)
        .bind(changes.duration_seconds)
        .bind(changes.lyrics)
        .fetch_optional(&self.pool)
        .await?;

        Ok(track)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "select"))]
    async fn referenced_asset_keys(&self) -> Result<Vec<String>, AppError> {
        let keys = sqlx::query_scalar::<Postgres, String>(
            r#"
            SELECT artwork_key FROM artists
            UNION ALL
            SELECT artwork_key FROM albums
            UNION ALL
            SELECT audio_dir FROM tracks
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_dependents_query() {
        let rule = DependentRule {
            dependent: EntityKind::Track,
            match_kind: MatchKind::Scalar,
            field: "album",
            display_field: "name",
        };
        assert_eq!(
            dependents_query(&rule),
            "SELECT id, name AS display_name FROM tracks WHERE album = $1 ORDER BY id"
        );
    }

    #[test]
    fn test_array_dependents_query() {
        let rule = DependentRule {
            dependent: EntityKind::Album,
            match_kind: MatchKind::ArrayContains,
            field: "genres",
            display_field: "name",
        };
        assert_eq!(
            dependents_query(&rule),
            "SELECT id, name AS display_name FROM albums WHERE genres @> ARRAY[$1]::UUID[] ORDER BY id"
        );
    }

    #[test]
    fn test_entry_query_projects_asset_column() {
        assert_eq!(
            entry_query(EntityKind::Track),
            "SELECT id, name AS display_name, audio_dir AS asset_key FROM tracks WHERE id = $1"
        );
        assert!(entry_query(EntityKind::Genre).contains("NULL::TEXT AS asset_key"));
    }
}
