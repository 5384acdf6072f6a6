//! Target document generation: the workflow markup itself, the project
//! manifest, and the unresolved-items checklist.

use crate::model::{TargetActivity, VariableDescriptor};
use serde_json::json;
use tracing::info;

const NS_ACTIVITIES: &str = "http://schemas.microsoft.com/netfx/2009/xaml/activities";
const NS_XAML: &str = "http://schemas.microsoft.com/winfx/2006/xaml";
const NS_SAP: &str = "http://schemas.microsoft.com/netfx/2009/xaml/activities/presentation";
const NS_SAP2010: &str = "http://schemas.microsoft.com/netfx/2010/xaml/activities/presentation";

/// Serialize the activity tree into a target workflow document.
pub fn generate_document(
    activities: &[TargetActivity],
    variables: &[VariableDescriptor],
    workflow_name: &str,
) -> String {
    let mut root = XmlElement::new("Activity");
    root.set("xmlns", NS_ACTIVITIES);
    root.set("xmlns:x", NS_XAML);
    root.set("xmlns:sap", NS_SAP);
    root.set("xmlns:sap2010", NS_SAP2010);
    root.set("x:Class", workflow_name);

    // Variables surface twice: as member metadata and as in-scope
    // declarations inside the main sequence.
    if !variables.is_empty() {
        let members = root.child(XmlElement::new("x:Members"));
        for var in variables {
            let mut prop = XmlElement::new("x:Property");
            prop.set("Name", &var.name);
            prop.set("Type", format!("InArgument({})", var.var_type));
            members.child(prop);
        }
    }

    let sequence = root.child(XmlElement::new("Sequence"));
    sequence.set("DisplayName", workflow_name);
    for var in variables {
        let mut decl = XmlElement::new("Variable");
        decl.set("x:TypeArguments", &var.var_type);
        decl.set("Name", &var.name);
        if !var.default_value.is_empty() {
            decl.set("Default", &var.default_value);
        }
        sequence.child(decl);
    }
    for activity in activities {
        add_activity(sequence, activity);
    }

    info!(activities = activities.len(), "generated workflow document");

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    root.render(0, &mut out);
    out
}

fn add_activity(parent: &mut XmlElement, activity: &TargetActivity) {
    let tag = activity
        .activity_type
        .rsplit('.')
        .next()
        .unwrap_or(activity.activity_type.as_str())
        .to_string();
    let elem = parent.child(XmlElement::new(&tag));
    elem.set("DisplayName", &activity.display_name);

    for (key, value) in &activity.properties {
        if key.contains('.') {
            // Dotted keys denote nested sub-element paths: `Target.Selector`
            // becomes `<{tag}.Target Selector="..."/>`, sub-elements reused
            // across keys sharing a prefix.
            let parts: Vec<&str> = key.split('.').collect();
            let mut current = &mut *elem;
            for part in &parts[..parts.len() - 1] {
                let nested_name = format!("{tag}.{part}");
                current = current.child_named(&nested_name);
            }
            current.set(*parts.last().expect("split is never empty"), value);
        } else {
            elem.set(key, value);
        }
    }

    for child in &activity.children {
        add_activity(elem, child);
    }
}

/// Flat project descriptor accompanying the generated workflow.
pub fn generate_manifest(project_name: &str, description: &str, main_file: &str) -> String {
    let manifest = json!({
        "name": project_name,
        "description": description,
        "main": main_file,
        "dependencies": {
            "AkaBot.Core.Activities": "1.0.0",
            "AkaBot.Excel.Activities": "1.0.0",
            "AkaBot.Mail.Activities": "1.0.0",
            "AkaBot.System.Activities": "1.0.0",
        },
        "schemaVersion": "1.0",
        "studioVersion": "1.0.0",
        "projectVersion": "1.0.0",
        "expressionLanguage": "CSharp",
    });
    serde_json::to_string_pretty(&manifest).expect("manifest is always serializable")
}

/// Ordered, numbered checklist of unresolved items. `None` when there is
/// nothing to list.
pub fn generate_checklist(items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let mut lines = vec!["# Manual follow-up items".to_string(), String::new()];
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("- [ ] {}. {item}", i + 1));
    }
    lines.push(String::new());
    Some(lines.join("\n"))
}

/// Minimal owned XML tree with escaping and pretty-printing. Enough for the
/// generated document; parsing stays with roxmltree.
struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((key.into(), value.into()));
    }

    fn child(&mut self, elem: XmlElement) -> &mut XmlElement {
        self.children.push(elem);
        self.children.last_mut().expect("just pushed")
    }

    /// Return the existing child with this name, or append a fresh one.
    fn child_named(&mut self, name: &str) -> &mut XmlElement {
        if let Some(idx) = self.children.iter().position(|c| c.name == name) {
            return &mut self.children[idx];
        }
        self.child(XmlElement::new(name))
    }

    fn render(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }
        out.push_str(">\n");
        for c in &self.children {
            c.render(depth + 1, out);
        }
        out.push_str(&indent);
        out.push_str("</");
        out.push_str(&self.name);
        out.push_str(">\n");
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
