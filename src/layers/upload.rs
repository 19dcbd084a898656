// Client-side checks for the upload form, mirrored from what the backend accepts.
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

use crate::error::{HubError, ValidationError};

pub const MAX_UPLOAD_BYTES: u64 = 200 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadForm {
    pub file: PathBuf,
    pub title: String,
    pub subject: String,
    pub semester: i32,
    pub kind: String,
    pub uploader_name: Option<String>,
}

/// MIME type for the accepted extensions (PDF, JPG/JPEG, PNG).
pub fn accepted_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

impl UploadForm {
    /// Uploader name as submitted: trimmed, omitted when blank.
    pub fn uploader(&self) -> Option<&str> {
        self.uploader_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Checks fields and the selected file; returns the file's MIME type.
    pub fn validate(&self, file_size: u64) -> Result<&'static str, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "title" });
        }
        if self.subject.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "subject" });
        }

        let mime = accepted_mime(&self.file).ok_or_else(|| ValidationError::UnsupportedType {
            file_name: self.file_name(),
        })?;

        if file_size > MAX_UPLOAD_BYTES {
            return Err(ValidationError::TooLarge {
                size: file_size,
                max_mb: MAX_UPLOAD_BYTES / (1024 * 1024),
            });
        }
        Ok(mime)
    }

    pub async fn to_multipart(&self) -> Result<Form, HubError> {
        let meta = match tokio::fs::metadata(&self.file).await {
            Ok(meta) if meta.is_file() => meta,
            _ => return Err(ValidationError::MissingFile.into()),
        };
        let mime = self.validate(meta.len())?;

        let bytes = tokio::fs::read(&self.file)
            .await
            .map_err(|e| HubError::io(&self.file, e))?;
        let part = Part::bytes(bytes)
            .file_name(self.file_name())
            .mime_str(mime)
            .map_err(HubError::Form)?;

        let mut form = Form::new()
            .part("file", part)
            .text("title", self.title.clone())
            .text("subject", self.subject.clone())
            .text("semester", self.semester.to_string())
            .text("type", self.kind.clone());

        if let Some(name) = self.uploader() {
            form = form.text("uploaderName", name.to_string());
        }
        Ok(form)
    }
}
