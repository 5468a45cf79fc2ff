//! Error types and the structured error payload published on failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use web_action_metadata::MetadataError;

/// Coarse classification of a failed fetch, carried in every failure payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    HttpStatus,
    Decode,
    MalformedInput,
    Config,
}

/// Diagnostic context of a failure: a fixed kind and message plus open details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
}

/// All errors that can occur in the metadata client.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Status { .. } => ErrorKind::HttpStatus,
            ClientError::Decode(_) => ErrorKind::Decode,
            ClientError::MalformedInput(_) => ErrorKind::MalformedInput,
            ClientError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let mut details = BTreeMap::new();
        if let ClientError::Status { status, url } = self {
            details.insert("status".to_string(), Value::from(*status));
            details.insert("url".to_string(), Value::from(url.as_str()));
        }

        ErrorPayload {
            kind: self.kind(),
            message: self.to_string(),
            details,
        }
    }
}

impl From<MetadataError> for ClientError {
    fn from(e: MetadataError) -> Self {
        match e {
            MetadataError::MalformedInput(msg) => ClientError::MalformedInput(msg),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return ClientError::Decode(e.to_string());
        }
        if let Some(status) = e.status() {
            return ClientError::Status {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }
        ClientError::Transport(e.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
