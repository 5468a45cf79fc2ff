//! Core data types for web action descriptors and the metadata table.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP verb a web action is dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Delete,
    Get,
    Head,
    Patch,
    Post,
    Put,
}

impl HttpMethod {
    /// Every verb recognized as a dispatch mechanism.
    pub const ALL: [HttpMethod; 6] = [
        HttpMethod::Delete,
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Post,
        HttpMethod::Put,
    ];

    /// Upper-case verb name, as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }

    /// Look up a verb by name, ignoring case.
    pub fn from_name(name: &str) -> Option<HttpMethod> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (route, HTTP method) binding as returned by the backend.
///
/// Every field is required; a descriptor missing any of them fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAction {
    pub allowed_services: Vec<String>,
    pub allowed_roles: Vec<String>,
    pub application_interceptors: Vec<String>,
    pub dispatch_mechanism: HttpMethod,
    pub function: String,
    pub function_annotations: Vec<String>,
    pub name: String,
    pub network_interceptors: Vec<String>,
    pub parameter_types: Vec<String>,
    pub path_pattern: String,
    pub request_media_types: Vec<String>,
    pub response_media_type: String,
    pub return_type: String,
}

/// A web action reshaped for display.
///
/// `allowed_roles` and `allowed_services` are display strings, and
/// `dispatch_mechanism` is widened to a list so bindings on the same route
/// can be merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAction {
    pub allowed_services: String,
    pub allowed_roles: String,
    pub application_interceptors: Vec<String>,
    pub dispatch_mechanism: Vec<HttpMethod>,
    pub function: String,
    pub function_annotations: Vec<String>,
    pub name: String,
    pub network_interceptors: Vec<String>,
    pub parameter_types: Vec<String>,
    pub path_pattern: String,
    pub request_media_types: Vec<String>,
    pub response_media_type: String,
    pub return_type: String,
    pub auth_function_annotations: Vec<String>,
    pub non_access_or_type_function_annotations: Vec<String>,
}

/// One metadata table row: a single entry per distinct path pattern.
pub type AggregatedAction = NormalizedAction;

/// Top-level body of the metadata endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    pub web_action_metadata: Vec<RawAction>,
}

/// Decode the metadata endpoint body into raw action descriptors.
pub fn decode_metadata_response(body: Value) -> MetadataResult<Vec<RawAction>> {
    if !body.is_object() {
        return Err(MetadataError::MalformedInput(
            "metadata response is not a JSON object".to_string(),
        ));
    }

    let response: MetadataResponse = serde_json::from_value(body)
        .map_err(|e| MetadataError::MalformedInput(e.to_string()))?;

    let actions = response.web_action_metadata;
    tracing::debug!("Decoded {} raw web actions", actions.len());
    Ok(actions)
}

/// Decode the action list endpoint body, which must be a JSON array.
pub fn decode_action_list(body: Value) -> MetadataResult<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        other => Err(MetadataError::MalformedInput(format!(
            "expected a JSON array of actions, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Errors that can occur while decoding or processing action metadata.
#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

/// Convenience result type.
pub type MetadataResult<T> = Result<T, MetadataError>;
