//! Plain-text rendering of the metadata table.

use web_action_metadata::{AggregatedAction, HttpMethod};

const HEADERS: [&str; 6] = ["NAME", "METHODS", "PATH", "ROLES", "SERVICES", "FUNCTION"];

fn row(action: &AggregatedAction) -> [String; 6] {
    let methods: Vec<&str> = action
        .dispatch_mechanism
        .iter()
        .map(HttpMethod::as_str)
        .collect();
    [
        action.name.clone(),
        methods.join(","),
        action.path_pattern.clone(),
        action.allowed_roles.clone(),
        action.allowed_services.clone(),
        action.function.clone(),
    ]
}

/// Render entries as an aligned table with a header line.
pub fn render_table<'a, I>(actions: I) -> String
where
    I: IntoIterator<Item = &'a AggregatedAction>,
{
    let rows: Vec<[String; 6]> = actions.into_iter().map(row).collect();

    let mut widths = HEADERS.map(str::len);
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = HEADERS.map(str::to_string);
    for r in std::iter::once(&header).chain(rows.iter()) {
        let line: Vec<String> = r
            .iter()
            .zip(widths.iter())
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}
