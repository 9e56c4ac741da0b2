use serde::{Deserialize, Serialize};

use crate::constants::{ALBUMS_DIR, ARTISTS_DIR, TRACKS_DIR};

/// Top-level class of a declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeClass {
    Image,
    Audio,
}

impl MimeClass {
    /// Classify a declared content type such as `image/png` or `audio/mpeg; codecs=mp3`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let (class, subtype) = content_type.split_once('/')?;
        if subtype.trim().is_empty() {
            return None;
        }
        let class = class.trim().to_ascii_lowercase();
        match class.as_str() {
            "image" => Some(MimeClass::Image),
            "audio" => Some(MimeClass::Audio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MimeClass::Image => "image",
            MimeClass::Audio => "audio",
        }
    }
}

/// What an upload is for; decides the accepted MIME class and the storage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    ArtistArtwork,
    AlbumArtwork,
    TrackAudio,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 3] = [
        AssetCategory::ArtistArtwork,
        AssetCategory::AlbumArtwork,
        AssetCategory::TrackAudio,
    ];

    pub fn directory(&self) -> &'static str {
        match self {
            AssetCategory::ArtistArtwork => ARTISTS_DIR,
            AssetCategory::AlbumArtwork => ALBUMS_DIR,
            AssetCategory::TrackAudio => TRACKS_DIR,
        }
    }

    pub fn expected_class(&self) -> MimeClass {
        match self {
            AssetCategory::ArtistArtwork | AssetCategory::AlbumArtwork => MimeClass::Image,
            AssetCategory::TrackAudio => MimeClass::Audio,
        }
    }

    pub fn rejection_message(&self) -> &'static str {
        match self.expected_class() {
            MimeClass::Image => "Only image files are accepted",
            MimeClass::Audio => "Only audio files are accepted",
        }
    }
}

/// Result of a successful ingest, handed to the catalog layer for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAssetDescriptor {
    pub logical_key: String,
    /// Present only for audio; rounded to the nearest whole second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_class_from_content_type() {
        assert_eq!(MimeClass::from_content_type("image/png"), Some(MimeClass::Image));
        assert_eq!(
            MimeClass::from_content_type("Audio/MPEG; codecs=mp3"),
            Some(MimeClass::Audio)
        );
        assert_eq!(MimeClass::from_content_type("video/mp4"), None);
        assert_eq!(MimeClass::from_content_type(""), None);
    }

    #[test]
    fn test_content_type_requires_subtype() {
        assert_eq!(MimeClass::from_content_type("image"), None);
        assert_eq!(MimeClass::from_content_type("audio"), None);
        assert_eq!(MimeClass::from_content_type("audio/"), None);
        assert_eq!(MimeClass::from_content_type("image/webp"), Some(MimeClass::Image));
    }

    #[test]
    fn test_category_layout() {
        assert_eq!(AssetCategory::ArtistArtwork.directory(), "artists");
        assert_eq!(AssetCategory::AlbumArtwork.expected_class(), MimeClass::Image);
        assert_eq!(AssetCategory::TrackAudio.expected_class(), MimeClass::Audio);
    }
}
