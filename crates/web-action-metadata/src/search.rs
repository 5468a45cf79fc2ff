//! Case-insensitive search over the metadata table.

use crate::types::AggregatedAction;

/// Whether an entry matches a lower-cased query by name, path or function.
fn matches(action: &AggregatedAction, needle: &str) -> bool {
    action.name.to_lowercase().contains(needle)
        || action.path_pattern.to_lowercase().contains(needle)
        || action.function.to_lowercase().contains(needle)
}

/// Find table entries matching `query`, keeping table order.
///
/// A blank query matches everything.
pub fn search_metadata<'a>(
    metadata: &'a [AggregatedAction],
    query: &str,
) -> Vec<&'a AggregatedAction> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return metadata.iter().collect();
    }

    metadata.iter().filter(|a| matches(a, &needle)).collect()
}
