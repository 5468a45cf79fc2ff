//! Configuration loading and resolution.

use serde::{Deserialize, Serialize};

use crate::types::{ClientError, ClientResult};

pub const URL_ENV: &str = "WEB_ACTION_METADATA_URL";
pub const TIMEOUT_ENV: &str = "WEB_ACTION_METADATA_TIMEOUT_MS";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_ACTIONS_PATH: &str = "/api/webactions";
const DEFAULT_METADATA_PATH: &str = "/api/webaction/metadata";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Where and how the client reaches the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub actions_path: String,
    pub metadata_path: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            actions_path: DEFAULT_ACTIONS_PATH.to_string(),
            metadata_path: DEFAULT_METADATA_PATH.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Resolve configuration: explicit value, then environment, then default.
    pub fn resolve(
        explicit_url: Option<&str>,
        explicit_timeout_ms: Option<u64>,
    ) -> ClientResult<Self> {
        let env_url = std::env::var(URL_ENV).ok();
        let env_timeout = std::env::var(TIMEOUT_ENV).ok();
        Self::resolve_from(
            explicit_url,
            explicit_timeout_ms,
            env_url.as_deref(),
            env_timeout.as_deref(),
        )
    }

    fn resolve_from(
        explicit_url: Option<&str>,
        explicit_timeout_ms: Option<u64>,
        env_url: Option<&str>,
        env_timeout: Option<&str>,
    ) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(url) = explicit_url.or(env_url) {
            config.base_url = normalize_base_url(url);
        }

        config.timeout_ms = match (explicit_timeout_ms, env_timeout) {
            (Some(ms), _) => ms,
            (None, Some(raw)) => parse_timeout(raw)?,
            (None, None) => DEFAULT_TIMEOUT_MS,
        };

        if config.base_url.is_empty() {
            return Err(ClientError::Config("base URL must not be empty".to_string()));
        }

        Ok(config)
    }

    /// Full URL for a path on the configured backend.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn parse_timeout(raw: &str) -> ClientResult<u64> {
    raw.trim()
        .parse()
        .map_err(|e| ClientError::Config(format!("{TIMEOUT_ENV} must be milliseconds: {e}")))
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
