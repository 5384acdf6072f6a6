//! Source/target diff: what the conversion dropped, renamed, or deferred.

use crate::model::{Assessment, Category, Conversion, Severity, ValidationIssue};
use std::collections::HashSet;

pub fn check(assessment: &Assessment, conversion: &Conversion) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let source_count = assessment.document.actions.len();
    let target_count = conversion.activities.len();
    if source_count > 0 && target_count == 0 {
        issues.push(
            ValidationIssue::new(
                Severity::Error,
                Category::Missing,
                "Conversion produced no activities",
            )
            .suggest("Check the mapping table against the source action types"),
        );
    } else if source_count > target_count {
        let gap = source_count - target_count;
        issues.push(
            ValidationIssue::new(
                Severity::Warning,
                Category::Missing,
                format!(
                    "Possible conversion gap: source={source_count}, target={target_count} (missing={gap})"
                ),
            )
            .suggest("Review which source actions were not converted"),
        );
    }

    let target_vars: HashSet<&str> = conversion
        .variables
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    let missing_vars: Vec<&str> = assessment
        .document
        .variables
        .iter()
        .map(|v| v.name.as_str())
        .filter(|name| !target_vars.contains(name))
        .collect();
    if !missing_vars.is_empty() {
        issues.push(
            ValidationIssue::new(
                Severity::Warning,
                Category::Missing,
                format!("Variables not converted: {}", missing_vars.join(", ")),
            )
            .suggest("Check the variable declarations"),
        );
    }

    for sub in &assessment.document.sub_workflows {
        issues.push(
            ValidationIssue::new(
                Severity::Info,
                Category::Missing,
                format!("Sub-workflow reference '{sub}' needs separate migration"),
            )
            .suggest("Migrate the referenced workflow as well"),
        );
    }

    for item in &conversion.unresolved_items {
        issues.push(ValidationIssue::new(
            Severity::Warning,
            Category::Missing,
            format!("Manual follow-up: {item}"),
        ));
    }
    for item in &assessment.manual_items {
        if item.starts_with("[manual]") {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                Category::Missing,
                format!("Manual follow-up: {item}"),
            ));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ActionNode, ComplexityScore, DifficultyRank, SourceDocument, TargetActivity, Variable,
    };
    use indexmap::IndexMap;

    fn assessment_for(doc: SourceDocument) -> Assessment {
        Assessment {
            document: doc,
            complexity: ComplexityScore {
                step_count: 0,
                branch_depth: 0,
                loop_depth: 0,
                external_deps: 0,
                total_score: 0.0,
                rank: DifficultyRank::A,
                risk_flags: Vec::new(),
            },
            priority: 0,
            estimated_hours: 0.0,
            auto_convertible_rate: 1.0,
            manual_items: Vec::new(),
        }
    }

    fn conversion_with(activities: usize) -> Conversion {
        let activity = TargetActivity {
            activity_type: "AkaBot.UI.Click".into(),
            display_name: "Click".into(),
            properties: IndexMap::new(),
            children: Vec::new(),
        };
        Conversion {
            source_name: "Demo".into(),
            activities: vec![activity; activities],
            variables: Vec::new(),
            document_content: String::new(),
            manifest_content: String::new(),
            unresolved_items: Vec::new(),
            conversion_rate: 1.0,
        }
    }

    #[test]
    fn zero_targets_from_nonzero_sources_is_an_error() {
        let doc = SourceDocument {
            name: "Demo".into(),
            actions: vec![ActionNode::new("click", "Go")],
            ..SourceDocument::default()
        };
        let issues = check(&assessment_for(doc), &conversion_with(0));
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Error && i.message.contains("no activities")));
    }

    #[test]
    fn count_gap_is_a_warning_with_the_difference() {
        let doc = SourceDocument {
            name: "Demo".into(),
            actions: vec![
                ActionNode::new("click", "One"),
                ActionNode::new("click", "Two"),
                ActionNode::new("click", "Three"),
            ],
            ..SourceDocument::default()
        };
        let issues = check(&assessment_for(doc), &conversion_with(1));
        assert!(issues.iter().any(|i| i.message.contains("missing=2")));
    }

    #[test]
    fn clean_conversion_yields_no_missing_issues() {
        let doc = SourceDocument {
            name: "Demo".into(),
            actions: vec![ActionNode::new("click", "Go")],
            variables: vec![Variable {
                name: "strCustomer".into(),
                declared_type: "String".into(),
                default_value: None,
                scope: "workflow".into(),
            }],
            ..SourceDocument::default()
        };
        let mut conversion = conversion_with(1);
        conversion.variables.push(crate::model::VariableDescriptor {
            name: "strCustomer".into(),
            var_type: "System.String".into(),
            default_value: String::new(),
            scope: "workflow".into(),
        });
        assert!(check(&assessment_for(doc), &conversion).is_empty());
    }

    #[test]
    fn unresolved_and_manual_tagged_items_resurface_as_warnings() {
        let doc = SourceDocument {
            name: "Demo".into(),
            actions: vec![ActionNode::new("click", "Go")],
            ..SourceDocument::default()
        };
        let mut assessment = assessment_for(doc);
        assessment.manual_items = vec![
            "[manual] ocrRead: Scan - alternative implementation required".into(),
            "[confirm] business requirements and workflow intent".into(),
        ];
        let mut conversion = conversion_with(1);
        conversion
            .unresolved_items
            .push("Unmapped action 'desktopRecorder' requires manual conversion".into());

        let issues = check(&assessment, &conversion);
        let followups: Vec<_> = issues
            .iter()
            .filter(|i| i.message.starts_with("Manual follow-up"))
            .collect();
        // The [confirm] entry stays in the assessment only.
        assert_eq!(followups.len(), 2);
        assert!(followups
            .iter()
            .all(|i| i.severity == Severity::Warning && i.category == Category::Missing));
    }
}
