//! Types for the upload pipeline.

use bytes::Bytes;

/// An upload as received from the route layer, before any validation.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    /// Declared content type, e.g. `audio/mpeg`.
    pub content_type: String,
    /// Only its extension is ever used, and only after sanitization.
    pub original_filename: String,
    pub body: Bytes,
}

impl UploadRequest {
    pub fn new(
        content_type: impl Into<String>,
        original_filename: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            original_filename: original_filename.into(),
            body: body.into(),
        }
    }
}
