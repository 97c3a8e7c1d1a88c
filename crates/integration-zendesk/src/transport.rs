use std::time::Duration;

use async_trait::async_trait;
use helpdesk_core::{first_page_locator, CoreError, FetchError, HelpdeskTransport};
use reqwest::{header, Client};
use serde_json::Value;
use tracing::debug;

use crate::config::ZendeskConfig;

#[derive(Debug, Clone)]
pub struct ZendeskTransport {
    config: ZendeskConfig,
    client: Client,
}

impl ZendeskTransport {
    pub fn new(config: ZendeskConfig) -> Result<Self, CoreError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|error| {
                CoreError::Configuration(format!("failed to build Zendesk HTTP client: {error}"))
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ZendeskConfig {
        &self.config
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Reads a one-ticket page to confirm the root and credentials work.
    pub async fn health_check(&self) -> Result<(), CoreError> {
        let probe = first_page_locator(&self.config.api_url, 1);
        self.get_json(probe.as_str())
            .await
            .map(|_| ())
            .map_err(|error| CoreError::DependencyUnavailable(error.to_string()))
    }
}

#[async_trait]
impl HelpdeskTransport for ZendeskTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url, "requesting Zendesk resource");
        let response = self
            .client
            .get(url)
            .basic_auth(self.config.basic_auth_user(), Some(&self.config.api_token))
            .send()
            .await
            .map_err(|error| {
                FetchError::transport(url, format!("Zendesk API request failed: {error}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| {
            FetchError::transport(url, format!("Zendesk API response read failed: {error}"))
        })?;

        if !status.is_success() {
            return Err(FetchError::remote_status(url, status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|error| {
            FetchError::parse(url, format!("Zendesk API response was malformed JSON: {error}"))
        })
    }
}
