//! Conversion of raw backend descriptors into display-ready actions.

use crate::classify::classify_annotations;
use crate::types::{NormalizedAction, RawAction};

/// Displayed when an allowed list is empty and the action is open to everyone.
pub const ALLOWED_ALL: &str = "All";

/// Displayed when an allowed list is empty otherwise.
pub const ALLOWED_NONE: &str = "None";

const FUNCTION_KEYWORD: &str = "fun ";

/// Fallback shown for an empty allowed-roles or allowed-services list.
///
/// `All` only when there are at least two auth annotations and the first one
/// marks the action as unauthenticated.
pub fn empty_allowed_value(auth_annotations: &[String]) -> &'static str {
    let unauthenticated = auth_annotations
        .first()
        .is_some_and(|first| first.contains("Unauthenticated"));

    if auth_annotations.len() > 1 && unauthenticated {
        ALLOWED_ALL
    } else {
        ALLOWED_NONE
    }
}

/// Strip the leading declaration keyword from a function signature.
///
/// Returns everything after the last `fun `, or the input when it has none.
pub fn bare_function_name(function: &str) -> &str {
    match function.rfind(FUNCTION_KEYWORD) {
        Some(idx) => &function[idx + FUNCTION_KEYWORD.len()..],
        None => function,
    }
}

fn display_allowed(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.join(", ")
    }
}

/// Normalize one raw action.
pub fn normalize_action(action: RawAction) -> NormalizedAction {
    let classified = classify_annotations(&action.function_annotations);
    let fallback = empty_allowed_value(&classified.auth);

    NormalizedAction {
        allowed_services: display_allowed(&action.allowed_services, fallback),
        allowed_roles: display_allowed(&action.allowed_roles, fallback),
        application_interceptors: action.application_interceptors,
        dispatch_mechanism: vec![action.dispatch_mechanism],
        function: bare_function_name(&action.function).to_string(),
        function_annotations: action.function_annotations,
        name: action.name,
        network_interceptors: action.network_interceptors,
        parameter_types: action.parameter_types,
        path_pattern: action.path_pattern,
        request_media_types: action.request_media_types,
        response_media_type: action.response_media_type,
        return_type: action.return_type,
        auth_function_annotations: classified.auth,
        non_access_or_type_function_annotations: classified.other,
    }
}

/// Normalize a batch of raw actions, keeping their order.
pub fn normalize_actions(actions: Vec<RawAction>) -> Vec<NormalizedAction> {
    actions.into_iter().map(normalize_action).collect()
}
