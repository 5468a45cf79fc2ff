//! Events flowing from the controller into the state container.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use web_action_metadata::AggregatedAction;

use super::error::{ClientError, ErrorPayload};

/// One of the independent fetch workflows, each with its own cancellation scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Fetch the raw action list and pass it through.
    Actions,
    /// Fetch action metadata, normalize, and aggregate per route.
    Metadata,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Actions, Operation::Metadata];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Actions => "actions",
            Operation::Metadata => "metadata",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `Loading` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadingPayload {
    pub error: Option<ErrorPayload>,
    pub loading: bool,
    pub success: bool,
}

/// Processed result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuccessData {
    Metadata { metadata: Vec<AggregatedAction> },
    Actions { data: Vec<Value> },
}

/// Payload of a `Success` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessPayload {
    #[serde(flatten)]
    pub result: SuccessData,
    pub error: Option<ErrorPayload>,
    pub loading: bool,
    pub success: bool,
}

/// Payload of a `Failure` event. The error's fields sit at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailurePayload {
    #[serde(flatten)]
    pub error: ErrorPayload,
    pub loading: bool,
    pub success: bool,
}

/// Everything dispatched into or published by the metadata client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// External request to start an operation.
    Requested { operation: Operation },
    /// The operation's request is in flight.
    Loading {
        operation: Operation,
        payload: LoadingPayload,
    },
    /// The operation finished and produced data.
    Success {
        operation: Operation,
        payload: SuccessPayload,
    },
    /// The operation failed anywhere between fetch and aggregation.
    Failure {
        operation: Operation,
        payload: FailurePayload,
    },
}

impl Event {
    pub fn requested(operation: Operation) -> Self {
        Event::Requested { operation }
    }

    pub fn loading(operation: Operation) -> Self {
        Event::Loading {
            operation,
            payload: LoadingPayload {
                error: None,
                loading: true,
                success: false,
            },
        }
    }

    pub fn succeeded(operation: Operation, result: SuccessData) -> Self {
        Event::Success {
            operation,
            payload: SuccessPayload {
                result,
                error: None,
                loading: false,
                success: true,
            },
        }
    }

    pub fn failed(operation: Operation, error: &ClientError) -> Self {
        Event::Failure {
            operation,
            payload: FailurePayload {
                error: error.to_payload(),
                loading: false,
                success: false,
            },
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Event::Requested { operation }
            | Event::Loading { operation, .. }
            | Event::Success { operation, .. }
            | Event::Failure { operation, .. } => *operation,
        }
    }

    /// Whether the event ends an operation's run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Success { .. } | Event::Failure { .. })
    }
}
