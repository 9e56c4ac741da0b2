//! Application-wide constants.

/// Directory (under the storage root) holding artist artwork.
pub const ARTISTS_DIR: &str = "artists";

/// Directory (under the storage root) holding album artwork.
pub const ALBUMS_DIR: &str = "albums";

/// Directory (under the storage root) holding one sub-directory per track upload.
pub const TRACKS_DIR: &str = "tracks";

/// File name of the untouched upload inside a track directory.
pub const TRACK_ORIGINAL_FILENAME: &str = "original";

/// URL prefix under which the storage root is served read-only.
pub const STATIC_FILES_PREFIX: &str = "/files";

/// Extension used when an uploaded filename carries none we can keep.
pub const FALLBACK_EXTENSION: &str = "bin";

/// Longest extension kept from an uploaded filename.
pub const MAX_EXTENSION_LEN: usize = 8;
