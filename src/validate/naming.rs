//! Naming-convention checks: project name, variable type prefixes, and
//! activity display names.

use crate::model::{Category, Conversion, Severity, TargetActivity, ValidationIssue};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INVALID_NAME_CHAR_RE: Regex = Regex::new(r"[^\w]").unwrap();
}

/// Configurable variable-type → name-prefix table. Matching is
/// first-entry-wins on a substring of the lowercased type name.
#[derive(Debug, Clone)]
pub struct NamingRules {
    pub type_prefixes: Vec<(String, String)>,
}

impl Default for NamingRules {
    fn default() -> Self {
        let type_prefixes = [
            ("string", "str"),
            ("int", "int"),
            ("bool", "bln"),
            ("datatable", "dt"),
            ("datetime", "dtm"),
            ("list", "lst"),
        ]
        .iter()
        .map(|(t, p)| (t.to_string(), p.to_string()))
        .collect();
        NamingRules { type_prefixes }
    }
}

pub fn check(conversion: &Conversion, rules: &NamingRules) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if INVALID_NAME_CHAR_RE.is_match(&conversion.source_name) {
        issues.push(
            ValidationIssue::new(
                Severity::Warning,
                Category::Naming,
                format!(
                    "Project name contains invalid characters: {}",
                    conversion.source_name
                ),
            )
            .suggest("Use the PRJ_{business}_{sequence} form"),
        );
    }

    for var in &conversion.variables {
        let type_lower = var.var_type.to_lowercase();
        let expected = rules
            .type_prefixes
            .iter()
            .find(|(type_key, _)| type_lower.contains(type_key))
            .map(|(_, prefix)| prefix);
        if let Some(prefix) = expected {
            if !var.name.is_empty() && !var.name.starts_with(&format!("{prefix}_")) {
                issues.push(
                    ValidationIssue::new(
                        Severity::Info,
                        Category::Naming,
                        format!("Variable '{}' lacks a type prefix", var.name),
                    )
                    .at(&var.name)
                    .suggest(format!("Suggested name: {prefix}_{}", var.name)),
                );
            }
        }
    }

    for activity in &conversion.activities {
        check_activity_names(activity, &mut issues);
    }
    issues
}

fn check_activity_names(activity: &TargetActivity, issues: &mut Vec<ValidationIssue>) {
    if activity.display_name.is_empty() || activity.display_name == activity.activity_type {
        issues.push(
            ValidationIssue::new(
                Severity::Info,
                Category::Naming,
                format!(
                    "Activity lacks a descriptive display name: {}",
                    activity.activity_type
                ),
            )
            .suggest("Name the activity after what it does in the business process"),
        );
    }
    for child in &activity.children {
        check_activity_names(child, issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VariableDescriptor;
    use indexmap::IndexMap;

    fn empty_conversion(name: &str) -> Conversion {
        Conversion {
            source_name: name.to_string(),
            activities: Vec::new(),
            variables: Vec::new(),
            document_content: String::new(),
            manifest_content: String::new(),
            unresolved_items: Vec::new(),
            conversion_rate: 1.0,
        }
    }

    #[test]
    fn flags_invalid_project_name_characters() {
        let issues = check(&empty_conversion("order entry!"), &NamingRules::default());
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.contains("invalid characters")));
        assert!(check(&empty_conversion("OrderEntry_001"), &NamingRules::default()).is_empty());
    }

    #[test]
    fn suggests_type_prefix_for_variables() {
        let mut conversion = empty_conversion("Demo");
        conversion.variables.push(VariableDescriptor {
            name: "customer".into(),
            var_type: "System.String".into(),
            default_value: String::new(),
            scope: "workflow".into(),
        });
        conversion.variables.push(VariableDescriptor {
            name: "str_customer".into(),
            var_type: "System.String".into(),
            default_value: String::new(),
            scope: "workflow".into(),
        });
        let issues = check(&conversion, &NamingRules::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].suggestion.as_deref(), Some("Suggested name: str_customer"));
    }

    #[test]
    fn flags_display_names_equal_to_bare_type_recursively() {
        let mut conversion = empty_conversion("Demo");
        conversion.activities.push(TargetActivity {
            activity_type: "AkaBot.UI.Click".into(),
            display_name: "Open customer page".into(),
            properties: IndexMap::new(),
            children: vec![TargetActivity {
                activity_type: "AkaBot.UI.Click".into(),
                display_name: "AkaBot.UI.Click".into(),
                properties: IndexMap::new(),
                children: Vec::new(),
            }],
        });
        let issues = check(&conversion, &NamingRules::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
    }
}
