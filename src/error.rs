//! Error types shared by the backend client, the downloader and the upload form.

use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the resource backend.
#[derive(Debug, Error)]
pub enum HubError {
    /// The request never produced a response (DNS, connection refused, TLS...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The backend refused an upload; `message` is the response body.
    #[error("{message}")]
    Rejected {
        url: String,
        status: u16,
        message: String,
    },

    /// The response body was not the shape we expected.
    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("could not build upload form: {0}")]
    Form(#[source] reqwest::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Client-side checks on the upload form. Always terminal for the submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a file to upload")]
    MissingFile,

    #[error("Please select a PDF, JPG, or PNG file (got {file_name})")]
    UnsupportedType { file_name: String },

    #[error("File size must be less than {max_mb}MB ({size} bytes given)")]
    TooLarge { size: u64, max_mb: u64 },

    #[error("{field} is required")]
    MissingField { field: &'static str },
}

impl HubError {
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        HubError::Transport {
            url: url.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HubError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_backend_message() {
        let err = HubError::Rejected {
            url: "http://localhost/api/resources/upload".to_string(),
            status: 500,
            message: "Failed to upload file: disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to upload file: disk full");
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: HubError = ValidationError::MissingFile.into();
        assert_eq!(err.to_string(), "Please select a file to upload");
    }
}
