pub mod asset;
pub mod catalog;
pub mod dependent;

pub use asset::{AssetCategory, MimeClass, StoredAssetDescriptor};
pub use catalog::{
    Album, AlbumChanges, Artist, CatalogEntry, EntityKind, Genre, NewAlbum, NewArtist, NewGenre,
    NewTrack, Track, TrackChanges,
};
pub use dependent::{DeleteRequest, DependentConflict, DependentRecord, DependentRule, MatchKind};
