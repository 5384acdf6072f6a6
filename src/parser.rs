//! Source document parser. Extracts the typed action tree, variable
//! declarations, and sub-workflow references from a legacy workflow file.

use crate::{
    error::{MigrateError, Result},
    model::{ActionNode, SourceDocument, Variable},
    vocab,
};
use roxmltree::{Document, Node};
use std::{fs, path::Path};
use tracing::info;

/// Parse a workflow file. Only `.xml` and `.robot` sources are accepted;
/// `.robot` files are XML under a different extension.
pub fn parse_path(path: &Path) -> Result<SourceDocument> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if extension != "xml" && extension != "robot" {
        return Err(MigrateError::UnsupportedFormat { extension });
    }
    let content = fs::read_to_string(path).map_err(|source| MigrateError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("workflow");
    parse_str(&content, name)
}

/// Parse workflow markup from a string, labelled with a document name for
/// diagnostics and downstream joins.
pub fn parse_str(xml: &str, name: &str) -> Result<SourceDocument> {
    let doc = Document::parse(xml).map_err(|e| MigrateError::Xml {
        document: name.to_string(),
        message: e.to_string(),
    })?;
    let root = doc.root_element();

    let actions = collect_actions(&doc, root);
    let variables = collect_variables(root);
    let sub_workflows = collect_sub_workflows(root);

    info!(
        document = name,
        actions = actions.len(),
        variables = variables.len(),
        "parsed source document"
    );

    Ok(SourceDocument {
        name: name.to_string(),
        actions,
        variables,
        sub_workflows,
        ..SourceDocument::default()
    })
}

/// Depth-first discovery of actions in a non-action context. Actions nested
/// under non-action wrappers surface here as flat top-level entries; actions
/// nested directly under other actions become children instead, so each
/// element is captured exactly once.
fn collect_actions(doc: &Document, scope: Node) -> Vec<ActionNode> {
    let mut out = Vec::new();
    for child in scope.children().filter(Node::is_element) {
        if vocab::is_action_tag(child.tag_name().name()) {
            let (node, mut strays) = build_action(doc, child);
            out.push(node);
            out.append(&mut strays);
        } else {
            out.extend(collect_actions(doc, child));
        }
    }
    out
}

/// Build one action node. Direct action children nest; any action found
/// deeper under a non-action wrapper is returned as a stray for the caller
/// to keep at the top level.
fn build_action(doc: &Document, elem: Node) -> (ActionNode, Vec<ActionNode>) {
    let tag = elem.tag_name().name();
    let mut node = ActionNode::new(tag, elem.attribute("name").unwrap_or(tag));
    node.line = doc.text_pos_at(elem.range().start).row;

    for attr in elem.attributes() {
        node.properties
            .insert(attr.name().to_string(), attr.value().to_string());
    }
    if let Some(text) = elem.text() {
        let text = text.trim();
        if !text.is_empty() {
            node.properties.insert("_text".to_string(), text.to_string());
        }
    }

    let mut strays = Vec::new();
    for child in elem.children().filter(Node::is_element) {
        if vocab::is_action_tag(child.tag_name().name()) {
            let (child_node, mut child_strays) = build_action(doc, child);
            node.children.push(child_node);
            strays.append(&mut child_strays);
        } else {
            strays.extend(collect_actions(doc, child));
        }
    }
    (node, strays)
}

fn collect_variables(root: Node) -> Vec<Variable> {
    let mut variables = Vec::new();
    for elem in root.descendants().filter(Node::is_element) {
        if !vocab::is_variable_tag(elem.tag_name().name()) {
            continue;
        }
        let default_value = elem
            .attribute("defaultValue")
            .map(str::to_string)
            .or_else(|| elem.text().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()));
        variables.push(Variable {
            name: elem.attribute("name").unwrap_or("unknown").to_string(),
            declared_type: elem.attribute("type").unwrap_or("String").to_string(),
            default_value,
            scope: elem.attribute("scope").unwrap_or("workflow").to_string(),
        });
    }
    variables
}

fn collect_sub_workflows(root: Node) -> Vec<String> {
    let mut refs = Vec::new();
    for elem in root.descendants().filter(Node::is_element) {
        if !vocab::is_sub_workflow_tag(elem.tag_name().name()) {
            continue;
        }
        let target = elem
            .attribute("robotUrl")
            .or_else(|| elem.attribute("robot"))
            .unwrap_or("");
        if !target.is_empty() {
            refs.push(target.to_string());
        }
    }
    refs
}
