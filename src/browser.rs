//! Application state for the resource browser.
//!
//! `all` is always the last successful fetch, untouched, even after a failed
//! reload; `filtered` is always recomputed from it by [`Filter::apply`] and
//! never edited on its own.

use chrono::Utc;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::HubError;
use crate::layers::download::Downloader;
use crate::layers::fetch::ResourceClient;
use crate::layers::filter::{Filter, FilterCriteria};
use crate::layers::render::View;
use crate::layers::stats::Statistics;
use crate::layers::Resource;

pub struct Browser {
    client: ResourceClient,
    all: Vec<Resource>,
    filtered: Vec<Resource>,
    criteria: FilterCriteria,
    load_failed: bool,
    refresh_delay: Duration,
}

/// A saved download plus the outcome of the refresh that followed it.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub saved: PathBuf,
    pub refresh: Result<(), HubError>,
}

impl Browser {
    pub fn new(client: ResourceClient, refresh_delay: Duration) -> Self {
        Self {
            client,
            all: Vec::new(),
            filtered: Vec::new(),
            criteria: FilterCriteria::default(),
            load_failed: false,
            refresh_delay,
        }
    }

    pub fn client(&self) -> &ResourceClient {
        &self.client
    }

    pub fn all(&self) -> &[Resource] {
        &self.all
    }

    pub fn filtered(&self) -> &[Resource] {
        &self.filtered
    }

    /// Replaces the collection with a fresh fetch and resets the view to an
    /// unfiltered copy (criteria cleared). On failure the collection keeps the
    /// last successful fetch and the view shows the empty state until the next
    /// filter change; no retry.
    pub async fn load(&mut self) -> Result<(), HubError> {
        match self.client.list().await {
            Ok(resources) => {
                self.all = resources;
                self.filtered = self.all.clone();
                self.criteria = FilterCriteria::default();
                self.load_failed = false;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error loading resources: {}", e);
                self.load_failed = true;
                Err(e)
            }
        }
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> &[Resource] {
        self.criteria = criteria;
        self.filter()
    }

    /// Re-derives the filtered view from the full collection.
    pub fn filter(&mut self) -> &[Resource] {
        self.filtered = Filter::apply(&self.all, &self.criteria);
        self.load_failed = false;
        &self.filtered
    }

    pub fn update_criteria(&mut self, update: impl FnOnce(&mut FilterCriteria)) -> &[Resource] {
        update(&mut self.criteria);
        self.filter()
    }

    /// In-memory lookup; never touches the network.
    pub fn details(&self, id: i64) -> Option<&Resource> {
        self.all.iter().find(|r| r.id == id)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_resources(&self.all)
    }

    pub fn subject_options(&self) -> Vec<String> {
        Filter::subject_options(&self.all)
    }

    pub fn view(&self) -> View {
        if self.load_failed {
            return View::Empty;
        }
        View::build(&self.filtered, Utc::now(), |id| self.client.download_url(id))
    }

    /// Saves the resource's file, then after the refresh delay reloads the
    /// collection so the server-side download counter shows up. Only a failed
    /// download is an error; a failed refresh is reported in the outcome.
    pub async fn download(
        &mut self,
        id: i64,
        dir: impl Into<PathBuf>,
    ) -> Result<DownloadOutcome, HubError> {
        let fallback = self
            .details(id)
            .map(|r| r.file_name.clone())
            .unwrap_or_else(|| format!("resource-{}", id));

        let url = self.client.download_url(id);
        let saved = Downloader::new(dir).save(&url, &fallback).await?;

        tokio::time::sleep(self.refresh_delay).await;
        let refresh = self.load().await;
        Ok(DownloadOutcome { saved, refresh })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::fetch::tests::record;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn browser_for(server: &MockServer) -> Browser {
        let client = ResourceClient::new(format!("{}/api/resources", server.uri()));
        Browser::new(client, Duration::from_millis(10))
    }

    async fn mount_list(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/resources"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_load_replaces_collections() {
        let server = MockServer::start().await;
        mount_list(&server, json!([record(1, "Alpha"), record(2, "Beta")])).await;

        let mut browser = browser_for(&server).await;
        browser.load().await.unwrap();

        assert_eq!(browser.all().len(), 2);
        assert_eq!(browser.filtered(), browser.all());
        assert_eq!(browser.subject_options(), vec!["OS"]);
    }

    #[tokio::test]
    async fn test_failed_load_shows_empty_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut browser = browser_for(&server).await;
        assert!(browser.load().await.is_err());
        assert!(browser.all().is_empty());
        assert!(browser.view().is_empty());
        assert_eq!(browser.view().len(), 0);
    }

    #[tokio::test]
    async fn test_filter_and_details() {
        let server = MockServer::start().await;
        mount_list(
            &server,
            json!([record(1, "Alpha Notes"), record(2, "Beta Paper"), record(3, "alphabet")]),
        )
        .await;

        let mut browser = browser_for(&server).await;
        browser.load().await.unwrap();

        let ids: Vec<i64> = browser
            .update_criteria(|c| c.search = "ALPHA".to_string())
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        // statistics ignore the filter
        assert_eq!(browser.statistics().total_resources, 3);

        assert_eq!(browser.details(2).map(|r| r.title.as_str()), Some("Beta Paper"));
        assert!(browser.details(99).is_none());

        browser.set_criteria(FilterCriteria::default());
        assert_eq!(browser.filtered().len(), 3);
    }

    #[tokio::test]
    async fn test_download_refreshes_counter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/resources"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([record(1, "Alpha")])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        let mut bumped = record(1, "Alpha");
        bumped["downloadCount"] = json!(1);
        mount_list(&server, json!([bumped])).await;
        Mock::given(method("GET"))
            .and(path("/api/resources/download/1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::TempDir::new().unwrap();
        let mut browser = browser_for(&server).await;
        browser.load().await.unwrap();
        assert_eq!(browser.all()[0].downloads(), 0);

        let outcome = browser.download(1, dir.path()).await.unwrap();
        assert_eq!(outcome.saved, dir.path().join("1.pdf"));
        assert!(outcome.refresh.is_ok());
        assert_eq!(browser.all()[0].downloads(), 1);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_last_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/resources"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([record(1, "Alpha"), record(2, "Beta")])),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/resources"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut browser = browser_for(&server).await;
        browser.load().await.unwrap();
        assert!(browser.load().await.is_err());

        assert_eq!(browser.all().len(), 2);
        assert!(browser.view().is_empty());
        assert_eq!(browser.statistics().total_resources, 2);
        assert_eq!(browser.details(1).map(|r| r.title.as_str()), Some("Alpha"));
        assert_eq!(browser.subject_options(), vec!["OS"]);

        // the next filter change works on the kept collection again
        browser.update_criteria(|c| c.search = "beta".to_string());
        assert_eq!(browser.view().len(), 1);
    }

    #[tokio::test]
    async fn test_download_survives_failed_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/resources"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([record(1, "Alpha")])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/resources"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/resources/download/1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::TempDir::new().unwrap();
        let mut browser = browser_for(&server).await;
        browser.load().await.unwrap();

        let outcome = browser.download(1, dir.path()).await.unwrap();
        assert!(outcome.saved.exists());
        assert!(matches!(
            outcome.refresh,
            Err(HubError::Status { status: 500, .. })
        ));
        assert_eq!(browser.all().len(), 1);
        assert!(browser.view().is_empty());
    }
}
