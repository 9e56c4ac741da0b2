//! Cadenza Storage Library
//!
//! This crate provides the sandboxed asset store used for artwork and track audio.
//!
//! # Logical key format
//!
//! Every stored asset is addressed by a server-generated logical key relative to
//! the configured storage root:
//!
//! - **Artwork**: `artists/{uuid}.{ext}`, `albums/{uuid}.{ext}`
//! - **Track audio**: `tracks/{uuid}/original`, with transcoded siblings such as
//!   `tracks/{uuid}/low.mp3` written next to it
//!
//! Keys never contain `..` segments or a leading `/`; [`PathSandbox`] rejects any
//! key that would resolve outside the root. Key generation lives in [`keys`].

pub mod keys;
pub mod local;
pub mod sandbox;
pub mod traits;

// Re-export commonly used types
pub use local::LocalAssetStore;
pub use sandbox::PathSandbox;
pub use traits::{AssetStore, StorageError, StorageResult, StoredEntry};
