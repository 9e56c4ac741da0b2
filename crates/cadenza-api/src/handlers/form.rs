//! Multipart form parsing shared by the upload routes.

use crate::error::HttpAppError;
use axum::extract::Multipart;
use cadenza_core::AppError;
use cadenza_processing::UploadRequest;
use std::collections::HashMap;
use uuid::Uuid;

const FILE_FIELD: &str = "file";

/// Text fields plus the optional `file` part of an admin upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<UploadRequest>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, HttpAppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;
                form.file = Some(UploadRequest::new(content_type, filename, data));
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A trimmed, non-empty text field, if present.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn required(&self, name: &str) -> Result<String, HttpAppError> {
        self.text(name)
            .ok_or_else(|| AppError::InvalidInput(format!("Field '{}' is required", name)).into())
    }

    pub fn uuid(&self, name: &str) -> Result<Uuid, HttpAppError> {
        let value = self.required(name)?;
        parse_uuid(name, &value)
    }

    /// A UUID field that may be left out of a partial update.
    pub fn optional_uuid(&self, name: &str) -> Result<Option<Uuid>, HttpAppError> {
        self.text(name)
            .map(|value| parse_uuid(name, &value))
            .transpose()
    }

    /// Comma separated ids naming at least one record. Duplicates collapse.
    pub fn required_uuid_list(&self, name: &str) -> Result<Vec<Uuid>, HttpAppError> {
        let ids = self.uuid_list(name)?;
        if ids.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Field '{}' requires at least one id",
                name
            ))
            .into());
        }
        Ok(ids)
    }

    /// Like [`required_uuid_list`](Self::required_uuid_list), but an absent
    /// field means "leave unchanged". A field that is sent blank is rejected.
    pub fn optional_uuid_list(&self, name: &str) -> Result<Option<Vec<Uuid>>, HttpAppError> {
        if !self.fields.contains_key(name) {
            return Ok(None);
        }
        self.required_uuid_list(name).map(Some)
    }

    fn uuid_list(&self, name: &str) -> Result<Vec<Uuid>, HttpAppError> {
        let Some(value) = self.text(name) else {
            return Ok(Vec::new());
        };

        let mut ids = Vec::new();
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id = Uuid::parse_str(part).map_err(|_| {
                HttpAppError::from(AppError::InvalidInput(format!(
                    "Field '{}' must be a comma separated list of UUIDs",
                    name
                )))
            })?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    pub fn take_file(&mut self) -> Option<UploadRequest> {
        self.file.take()
    }

    pub fn require_file(&mut self) -> Result<UploadRequest, HttpAppError> {
        self.take_file()
            .ok_or_else(|| AppError::InvalidInput("Field 'file' is required".to_string()).into())
    }
}

fn parse_uuid(name: &str, value: &str) -> Result<Uuid, HttpAppError> {
    Uuid::parse_str(value)
        .map_err(|_| AppError::InvalidInput(format!("Field '{}' must be a UUID", name)).into())
}
