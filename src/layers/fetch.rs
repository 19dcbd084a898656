use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::HubError;
use crate::layers::upload::UploadForm;
use crate::layers::Resource;

/// Thin client over the backend's `/api/resources` routes.
#[derive(Clone)]
pub struct ResourceClient {
    client: Client,
    base: String,
}

impl ResourceClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            client: Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn download_url(&self, id: i64) -> String {
        format!("{}/download/{}", self.base, id)
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base)
    }

    /// Fetches the whole collection. Entries that fail validation are dropped.
    pub async fn list(&self) -> Result<Vec<Resource>, HubError> {
        let url = self.base.clone();
        tracing::info!("Fetching resources from: {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HubError::transport(&url, e))?;

        if !resp.status().is_success() {
            tracing::error!("Failed to fetch resources: {}", resp.status());
            return Err(HubError::Status {
                url,
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| HubError::transport(&url, e))?;
        let entries: Vec<Value> = serde_json::from_str(&body).map_err(|e| HubError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let resources = decode_entries(entries);
        tracing::info!("Loaded resources: {}", resources.len());
        Ok(resources)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Resource>, HubError> {
        let url = format!("{}/{}", self.base, id);
        tracing::info!("Fetching resource: {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HubError::transport(&url, e))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(HubError::Status {
                url,
                status: resp.status().as_u16(),
            });
        }

        resp.json::<Resource>()
            .await
            .map(Some)
            .map_err(|e| HubError::Decode {
                url,
                reason: e.to_string(),
            })
    }

    /// Backend health text from the `hello` route.
    pub async fn ping(&self) -> Result<String, HubError> {
        let url = format!("{}/hello", self.base);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HubError::transport(&url, e))?;

        if !resp.status().is_success() {
            return Err(HubError::Status {
                url,
                status: resp.status().as_u16(),
            });
        }
        resp.text().await.map_err(|e| HubError::transport(&url, e))
    }

    /// Submits the upload form. A non-2xx body is surfaced as the failure message.
    pub async fn upload(&self, form: &UploadForm) -> Result<Resource, HubError> {
        let url = self.upload_url();
        let multipart = form.to_multipart().await?;

        tracing::info!("Uploading {:?} to: {}", form.file, url);
        let resp = self
            .client
            .post(&url)
            .multipart(multipart)
            .send()
            .await
            .map_err(|e| HubError::transport(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                "Upload failed".to_string()
            } else {
                body
            };
            tracing::error!("Upload rejected with {}: {}", status, message);
            return Err(HubError::Rejected {
                url,
                status: status.as_u16(),
                message,
            });
        }

        let resource = resp.json::<Resource>().await.map_err(|e| HubError::Decode {
            url,
            reason: e.to_string(),
        })?;
        tracing::info!("Upload successful: id {}", resource.id);
        Ok(resource)
    }
}

/// Validates each raw entry on its own so one bad record cannot poison the list.
pub fn decode_entries(entries: Vec<Value>) -> Vec<Resource> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value::<Resource>(entry) {
            Ok(resource) => Some(resource),
            Err(e) => {
                tracing::warn!("Rejecting malformed resource at index {}: {}", idx, e);
                None
            }
        })
        .collect()
}
