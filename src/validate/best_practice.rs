//! Best-practice checks against the target platform's recommended patterns.

use crate::model::{Category, Conversion, Severity, TargetActivity, ValidationIssue};

/// Root-activity count above which a missing error-handling wrapper is worth
/// flagging.
const TRIVIAL_WORKFLOW_LIMIT: usize = 3;

const HARDCODE_PREFIXES: &[&str] = &["C:\\", "D:\\", "/home/", "http://", "https://"];
const HARDCODE_VALUE_PREVIEW: usize = 50;

pub fn check(conversion: &Conversion, max_nesting: usize) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let has_try_catch = conversion
        .activities
        .iter()
        .any(|a| a.activity_type.contains("TryCatch"));
    if !has_try_catch && conversion.activities.len() > TRIVIAL_WORKFLOW_LIMIT {
        issues.push(
            ValidationIssue::new(
                Severity::Warning,
                Category::BestPractice,
                "No error handling (TryCatch) in the workflow",
            )
            .suggest("Wrap the main flow in a TryCatch activity"),
        );
    }

    let has_log = conversion
        .activities
        .iter()
        .any(|a| a.activity_type.contains("Log"));
    if !has_log {
        issues.push(
            ValidationIssue::new(
                Severity::Info,
                Category::BestPractice,
                "No logging activity in the workflow",
            )
            .suggest("Add log messages at the start and end of the process"),
        );
    }

    for activity in &conversion.activities {
        for (key, value) in &activity.properties {
            if looks_hardcoded(value) {
                let preview: String = value.chars().take(HARDCODE_VALUE_PREVIEW).collect();
                issues.push(
                    ValidationIssue::new(
                        Severity::Info,
                        Category::BestPractice,
                        format!("Possible hardcoded value: {key}={preview}"),
                    )
                    .at(&activity.display_name)
                    .suggest("Read the value from configuration instead"),
                );
            }
        }
    }

    for activity in &conversion.activities {
        let depth = measure_depth(activity, 0);
        if depth > max_nesting {
            issues.push(
                ValidationIssue::new(
                    Severity::Warning,
                    Category::BestPractice,
                    format!("Nesting too deep ({depth} > {max_nesting})"),
                )
                .at(&activity.display_name)
                .suggest("Split the subtree into sub-workflows"),
            );
        }
    }
    issues
}

fn looks_hardcoded(value: &str) -> bool {
    !value.is_empty() && HARDCODE_PREFIXES.iter().any(|p| value.starts_with(p))
}

fn measure_depth(activity: &TargetActivity, current: usize) -> usize {
    activity
        .children
        .iter()
        .map(|c| measure_depth(c, current + 1))
        .max()
        .unwrap_or(current)
}
