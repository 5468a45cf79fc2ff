//! Pure fold of published events into the observed snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use web_action_metadata::AggregatedAction;

use crate::types::{ErrorPayload, Event, SuccessData};

/// State observed by subscribers. Fields are only ever added or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub loading: bool,
    pub success: bool,
    pub error: Option<ErrorPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<AggregatedAction>>,
}

/// Merge an event's payload into a copy of the snapshot.
///
/// Trigger events carry no payload and leave the snapshot as it was.
pub fn reduce(snapshot: &Snapshot, event: &Event) -> Snapshot {
    let mut next = snapshot.clone();

    match event {
        Event::Requested { .. } => {}
        Event::Loading { payload, .. } => {
            next.error = payload.error.clone();
            next.loading = payload.loading;
            next.success = payload.success;
        }
        Event::Success { payload, .. } => {
            match &payload.result {
                SuccessData::Metadata { metadata } => next.metadata = Some(metadata.clone()),
                SuccessData::Actions { data } => next.data = Some(data.clone()),
            }
            next.error = payload.error.clone();
            next.loading = payload.loading;
            next.success = payload.success;
        }
        Event::Failure { payload, .. } => {
            next.error = Some(payload.error.clone());
            next.loading = payload.loading;
            next.success = payload.success;
        }
    }

    next
}
