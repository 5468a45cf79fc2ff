//! Transport layer for reaching the metadata backend.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::ClientResult;

pub use http::HttpFetcher;

/// Source of JSON documents for the controller.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// GET a path on the backend and return its JSON body.
    async fn get_json(&self, path: &str) -> ClientResult<Value>;
}
