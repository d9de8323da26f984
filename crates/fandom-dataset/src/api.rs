//! Remote dataset sink backed by the Apify REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::DatasetError;
use crate::sink::RecordSink;

const DEFAULT_BASE_URL: &str = "https://api.apify.com";

/// Pushes items to `POST /v2/datasets/{id}/items` with bearer auth.
pub struct ApiDatasetSink {
    client: Client,
    token: String,
    dataset_id: String,
    items_url: Url,
}

impl ApiDatasetSink {
    /// Creates a sink for `dataset_id` on the production API.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(token: &str, dataset_id: &str, timeout_secs: u64) -> Result<Self, DatasetError> {
        Self::with_base_url(token, dataset_id, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a sink against a custom API origin (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`DatasetError::InvalidBaseUrl`] if `base_url` cannot carry a path.
    pub fn with_base_url(
        token: &str,
        dataset_id: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, DatasetError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("fandom-velocity/0.1 (dataset-push)")
            .build()?;

        let invalid = |reason: String| DatasetError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };

        let mut items_url =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        items_url
            .path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(["v2", "datasets", dataset_id, "items"]);

        Ok(Self {
            client,
            token: token.to_owned(),
            dataset_id: dataset_id.to_owned(),
            items_url,
        })
    }
}

#[async_trait]
impl RecordSink for ApiDatasetSink {
    async fn push(&mut self, item: &serde_json::Value) -> Result<(), DatasetError> {
        let response = self
            .client
            .post(self.items_url.clone())
            .bearer_auth(&self.token)
            .json(item)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DatasetError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(dataset_id = %self.dataset_id, "pushed dataset item");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("dataset {}", self.dataset_id)
    }
}
