use reqwest::header::CONTENT_DISPOSITION;
use reqwest::Client;
use std::path::PathBuf;
use tokio::fs::{create_dir_all, File};
use tokio::io::AsyncWriteExt;

use crate::error::HubError;

pub struct Downloader {
    client: Client,
    base_dir: PathBuf,
}

impl Downloader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            base_dir: base_dir.into(),
        }
    }

    /// Fetches `url` into the download directory and returns the written path.
    ///
    /// The file name comes from `Content-Disposition` when the backend sends one,
    /// otherwise from `fallback_name`.
    pub async fn save(&self, url: &str, fallback_name: &str) -> Result<PathBuf, HubError> {
        tracing::info!("Downloading from: {}", url);
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HubError::transport(url, e))?;

        if !response.status().is_success() {
            tracing::error!("Failed to download: {}", response.status());
            return Err(HubError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| fallback_name.to_string());
        let name = sanitize_filename(&name);

        create_dir_all(&self.base_dir)
            .await
            .map_err(|e| HubError::io(&self.base_dir, e))?;
        let path = self.base_dir.join(name);

        let mut file = File::create(&path)
            .await
            .map_err(|e| HubError::io(&path, e))?;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| HubError::transport(url, e))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| HubError::io(&path, e))?;
        }
        file.flush().await.map_err(|e| HubError::io(&path, e))?;

        tracing::info!("Saved download to: {:?}", path);
        Ok(path)
    }
}

/// Extracts the file name from a `Content-Disposition` value.
/// Prefers RFC 5987 `filename*=UTF-8''...` over plain `filename=`.
pub fn disposition_filename(header: &str) -> Option<String> {
    let mut plain = None;
    for param in header.split(';').map(str::trim) {
        if let Some(value) = param.strip_prefix("filename*=") {
            let encoded = value.rsplit("''").next().unwrap_or(value);
            if let Ok(decoded) = urlencoding::decode(encoded) {
                if !decoded.is_empty() {
                    return Some(decoded.into_owned());
                }
            }
        } else if let Some(value) = param.strip_prefix("filename=") {
            let value = value.trim_matches('"');
            if !value.is_empty() {
                plain = Some(value.to_string());
            }
        }
    }
    plain
}

/// Keeps the final path component and replaces characters unsafe on common filesystems.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned.to_string()
    }
}
