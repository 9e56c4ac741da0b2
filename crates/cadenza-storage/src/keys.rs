//! Logical key generation.
//!
//! Keys are built from a random identifier and, for artwork, the sanitized
//! extension of the uploaded filename. The original filename never reaches a path.

use cadenza_core::constants::{
    FALLBACK_EXTENSION, MAX_EXTENSION_LEN, TRACKS_DIR, TRACK_ORIGINAL_FILENAME,
};
use cadenza_core::AssetCategory;
use uuid::Uuid;

/// Keep only a short, lowercase, alphanumeric extension from an uploaded filename.
pub fn sanitize_extension(original_filename: &str) -> String {
    let extension = match original_filename.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => "",
    };

    let sanitized: String = extension
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_EXTENSION_LEN)
        .collect::<String>()
        .to_ascii_lowercase();

    if sanitized.is_empty() {
        FALLBACK_EXTENSION.to_string()
    } else {
        sanitized
    }
}

/// `{category}/{uuid}.{ext}` for a single-file asset such as artwork.
pub fn file_key(category: AssetCategory, original_filename: &str) -> String {
    format!(
        "{}/{}.{}",
        category.directory(),
        Uuid::new_v4(),
        sanitize_extension(original_filename)
    )
}

/// `tracks/{uuid}`: the per-upload directory holding an original and its transcodes.
pub fn track_directory_key() -> String {
    format!("{}/{}", TRACKS_DIR, Uuid::new_v4())
}

/// Key of the untouched upload inside a track directory.
pub fn track_original_key(directory_key: &str) -> String {
    format!("{}/{}", directory_key, TRACK_ORIGINAL_FILENAME)
}
