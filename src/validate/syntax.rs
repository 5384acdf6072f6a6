//! Structural well-formedness checks over the generated document.

use crate::model::{Category, Severity, ValidationIssue};
use roxmltree::{Document, Node};

/// Check the generated markup. A document that fails to parse short-circuits
/// with a single error-severity issue.
pub fn check(document_content: &str) -> Vec<ValidationIssue> {
    let doc = match Document::parse(document_content) {
        Ok(doc) => doc,
        Err(e) => {
            return vec![ValidationIssue::new(
                Severity::Error,
                Category::Syntax,
                format!("Document syntax error: {e}"),
            )];
        }
    };

    let mut issues = Vec::new();
    for elem in doc.root().descendants().filter(Node::is_element) {
        let tag = elem.tag_name().name();

        if let Some(display_name) = elem.attribute("DisplayName") {
            if display_name.trim().is_empty() {
                issues.push(
                    ValidationIssue::new(
                        Severity::Warning,
                        Category::Syntax,
                        format!("DisplayName is empty on element: {tag}"),
                    )
                    .at(tag)
                    .suggest("Set a descriptive display name"),
                );
            }
        }

        if tag == "Sequence" && !elem.children().any(|c| c.is_element()) {
            issues.push(
                ValidationIssue::new(Severity::Warning, Category::Syntax, "Empty Sequence element")
                    .at(elem.attribute("DisplayName").unwrap_or("unknown"))
                    .suggest("Remove sequences with no activities"),
            );
        }

        if tag == "Comment" {
            let text = elem.attribute("Text").unwrap_or("");
            if text.contains("TODO") || text.to_lowercase().contains("manual") {
                issues.push(
                    ValidationIssue::new(
                        Severity::Warning,
                        Category::Missing,
                        format!("Unconverted item: {text}"),
                    )
                    .at(elem.attribute("DisplayName").unwrap_or(""))
                    .suggest("Requires manual conversion work"),
                );
            }
        }
    }
    issues
}
