//! Dependency mapper. Flattens every action property and detects external
//! connections, filesystem paths, and API endpoints by keyword and pattern.

use crate::{
    model::{ActionNode, SourceDocument},
    vocab::{API_URL_RE, CONNECTION_KEYWORDS, FILE_PATH_RE},
};
use indexmap::{IndexMap, IndexSet};
use tracing::info;

const CONNECTION_VALUE_LIMIT: usize = 200;

/// Populate the derived dependency fields of a parsed document. Never fails;
/// a document with no matching properties just ends up with empty lists.
pub fn map_dependencies(mut doc: SourceDocument) -> SourceDocument {
    let props = collect_all_properties(&doc.actions);

    doc.external_connections = detect_connections(&props);
    // The Unix-path pattern also matches the `//host` fragment of a URL;
    // UNC shares use backslashes, so anything starting with `//` is a URL
    // remnant rather than a filesystem path.
    doc.file_paths = extract_matches(&props, &FILE_PATH_RE)
        .into_iter()
        .filter(|p| !p.starts_with("//"))
        .collect();
    doc.api_calls = extract_matches(&props, &API_URL_RE);

    let mut dependencies: IndexSet<String> = IndexSet::new();
    dependencies.extend(doc.external_connections.iter().cloned());
    dependencies.extend(doc.file_paths.iter().cloned());
    dependencies.extend(doc.api_calls.iter().cloned());
    dependencies.extend(doc.sub_workflows.iter().cloned());
    doc.dependencies = dependencies.into_iter().collect();

    info!(
        document = %doc.name,
        connections = doc.external_connections.len(),
        paths = doc.file_paths.len(),
        api_calls = doc.api_calls.len(),
        sub_workflows = doc.sub_workflows.len(),
        "mapped dependencies"
    );
    doc
}

/// Flatten the whole action forest into `{action_name}.{property}` keys.
/// Later occurrences of the same key overwrite earlier ones.
fn collect_all_properties(actions: &[ActionNode]) -> IndexMap<String, String> {
    let mut all = IndexMap::new();
    flatten_into(actions, &mut all);
    all
}

fn flatten_into(actions: &[ActionNode], out: &mut IndexMap<String, String>) {
    for action in actions {
        for (key, value) in &action.properties {
            out.insert(format!("{}.{}", action.name, key), value.clone());
        }
        flatten_into(&action.children, out);
    }
}

fn detect_connections(props: &IndexMap<String, String>) -> Vec<String> {
    let mut connections: IndexSet<String> = IndexSet::new();
    for (key, value) in props {
        let value_lower = value.to_lowercase();
        if CONNECTION_KEYWORDS.iter().any(|kw| value_lower.contains(kw)) {
            let truncated: String = value.chars().take(CONNECTION_VALUE_LIMIT).collect();
            connections.insert(format!("{key}: {truncated}"));
        }
    }
    connections.into_iter().collect()
}

fn extract_matches(props: &IndexMap<String, String>, pattern: &regex::Regex) -> Vec<String> {
    let mut found: IndexSet<String> = IndexSet::new();
    for value in props.values() {
        for m in pattern.find_iter(value) {
            found.insert(m.as_str().to_string());
        }
    }
    found.into_iter().collect()
}
