//! Per-route aggregation of normalized actions into the metadata table.

use std::collections::HashMap;

use crate::normalize::normalize_actions;
use crate::types::{AggregatedAction, HttpMethod, NormalizedAction, RawAction};

/// Sort methods by verb name, descending.
///
/// Duplicates are kept.
pub fn sort_methods_descending(methods: &mut [HttpMethod]) {
    methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    methods.reverse();
}

/// Merge actions that share a path pattern into one table entry each.
///
/// The first action seen for a pattern supplies every field except
/// `dispatch_mechanism`, which becomes the concatenation of all methods
/// registered on that pattern. The table is ordered by name, then path.
pub fn aggregate_actions(actions: Vec<NormalizedAction>) -> Vec<AggregatedAction> {
    let input_len = actions.len();
    let mut groups: Vec<AggregatedAction> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for action in actions {
        let existing = index.get(&action.path_pattern).copied();
        match existing {
            Some(i) => {
                let entry = &mut groups[i];
                entry.dispatch_mechanism.extend(action.dispatch_mechanism);
            }
            None => {
                index.insert(action.path_pattern.clone(), groups.len());
                groups.push(action);
            }
        }
    }

    for entry in &mut groups {
        sort_methods_descending(&mut entry.dispatch_mechanism);
    }

    groups.sort_by(|a, b| {
        let by_name = a.name.cmp(&b.name);
        by_name.then_with(|| a.path_pattern.cmp(&b.path_pattern))
    });

    let routes = groups.len();
    tracing::debug!("Aggregated {input_len} actions into {routes} routes");
    groups
}

/// Normalize and aggregate a fetched batch of raw actions.
pub fn build_metadata(actions: Vec<RawAction>) -> Vec<AggregatedAction> {
    aggregate_actions(normalize_actions(actions))
}
