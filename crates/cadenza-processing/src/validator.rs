use cadenza_core::{AssetCategory, MimeClass};

/// Upload rejections, detected before anything is written.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{message} (declared content type: {content_type})")]
    UnsupportedMediaType {
        content_type: String,
        message: &'static str,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Empty file")]
    EmptyFile,
}

/// Checks an upload's declared type and size against its asset category.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn validate_content_type(
        &self,
        category: AssetCategory,
        content_type: &str,
    ) -> Result<MimeClass, ValidationError> {
        match MimeClass::from_content_type(content_type) {
            Some(class) if class == category.expected_class() => Ok(class),
            _ => Err(ValidationError::UnsupportedMediaType {
                content_type: content_type.to_string(),
                message: category.rejection_message(),
            }),
        }
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Content type first: a wrong type is reported even for an empty body.
    pub fn validate(
        &self,
        category: AssetCategory,
        content_type: &str,
        size: usize,
    ) -> Result<(), ValidationError> {
        self.validate_content_type(category, content_type)?;
        self.validate_file_size(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_matching_class() {
        let validator = UploadValidator::new(1024);
        assert!(validator
            .validate(AssetCategory::ArtistArtwork, "image/webp", 10)
            .is_ok());
        assert!(validator
            .validate(AssetCategory::TrackAudio, "audio/flac", 10)
            .is_ok());
    }

    #[test]
    fn test_rejects_wrong_class() {
        let validator = UploadValidator::new(1024);
        let err = validator
            .validate(AssetCategory::TrackAudio, "image/png", 10)
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnsupportedMediaType {
                message: "Only audio files are accepted",
                ..
            }
        ));

        assert!(validator
            .validate(AssetCategory::AlbumArtwork, "application/octet-stream", 10)
            .is_err());
    }

    #[test]
    fn test_type_checked_before_size() {
        let validator = UploadValidator::new(1024);
        let err = validator
            .validate(AssetCategory::AlbumArtwork, "text/plain", 0)
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedMediaType { .. }));
    }

    #[test]
    fn test_size_limits() {
        let validator = UploadValidator::new(4);
        assert_eq!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        );
        assert_eq!(
            validator.validate_file_size(5),
            Err(ValidationError::FileTooLarge { size: 5, max: 4 })
        );
        assert!(validator.validate_file_size(4).is_ok());
    }
}
