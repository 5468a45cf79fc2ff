//! Web action metadata: annotation classification, normalization, and
//! per-route aggregation of backend web action descriptors.

pub mod aggregate;
pub mod classify;
pub mod normalize;
pub mod search;
pub mod types;

pub use aggregate::{aggregate_actions, build_metadata, sort_methods_descending};
pub use classify::{classify_annotations, ClassifiedAnnotations};
pub use normalize::{
    bare_function_name, empty_allowed_value, normalize_action, normalize_actions, ALLOWED_ALL,
    ALLOWED_NONE,
};
pub use search::search_metadata;
pub use types::*;
