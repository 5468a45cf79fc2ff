//! Async HTTP fetcher wrapping reqwest.
//!
//! One GET per call. Timeouts come from the client config; there are no
//! retries, a failed request is reported as-is.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::types::{ClientError, ClientResult};

use super::Fetcher;

const USER_AGENT: &str = concat!("web-action-metadata/", env!("CARGO_PKG_VERSION"));

/// HTTP fetcher bound to one backend.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpFetcher {
    /// Build a fetcher from resolved configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_json(&self, path: &str) -> ClientResult<Value> {
        let url = self.config.url_for(path);
        tracing::debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("GET {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("Response from {url} is not JSON: {e}")))
    }
}
