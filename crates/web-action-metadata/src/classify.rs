//! Annotation classification for web action handler functions.

use crate::types::HttpMethod;

const REQUEST_CONTENT_TYPE: &str = "RequestContentType";
const RESPONSE_CONTENT_TYPE: &str = "ResponseContentType";

/// Annotations of one handler, split into auth-related and everything else.
///
/// Content-type and HTTP verb markers belong to neither list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedAnnotations {
    pub auth: Vec<String>,
    pub other: Vec<String>,
}

/// Whether an annotation governs access (`Access` or `authz`, case-sensitive).
pub fn is_auth_annotation(annotation: &str) -> bool {
    annotation.contains("Access") || annotation.contains("authz")
}

/// Whether an annotation marks the request or response content type.
pub fn is_content_type_annotation(annotation: &str) -> bool {
    annotation.contains(REQUEST_CONTENT_TYPE) || annotation.contains(RESPONSE_CONTENT_TYPE)
}

/// Whether an annotation is an HTTP verb marker such as `@misk.web.Get(...)`.
///
/// The annotation name is the last dotted segment before any argument list,
/// compared against the known verbs ignoring case.
pub fn is_http_method_annotation(annotation: &str) -> bool {
    let name = annotation.trim().trim_start_matches('@');
    let name = name.split('(').next().unwrap_or(name);
    let name = name.rsplit('.').next().unwrap_or(name).trim();
    HttpMethod::from_name(name).is_some()
}

fn is_marker_annotation(annotation: &str) -> bool {
    is_content_type_annotation(annotation) || is_http_method_annotation(annotation)
}

/// Split a handler's annotations into auth annotations and the remaining
/// non-access, non-type annotations. Input order is preserved in both lists.
pub fn classify_annotations(annotations: &[String]) -> ClassifiedAnnotations {
    let mut classified = ClassifiedAnnotations::default();

    for annotation in annotations {
        if is_auth_annotation(annotation) {
            classified.auth.push(annotation.clone());
        } else if !is_marker_annotation(annotation) {
            classified.other.push(annotation.clone());
        }
    }

    classified
}
