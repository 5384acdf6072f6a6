//! Static validation of a conversion: four independent checks plus the
//! aggregating score.

pub mod best_practice;
pub mod diff;
pub mod naming;
pub mod syntax;

use crate::model::{Assessment, Conversion, ValidationReport};
use tracing::info;

pub use naming::NamingRules;

pub const DEFAULT_MAX_NESTING: usize = 5;

const ERROR_PENALTY: f64 = 20.0;
const WARNING_PENALTY: f64 = 5.0;

/// Run all four checks with default rules and aggregate the result.
pub fn validate(assessment: &Assessment, conversion: &Conversion) -> ValidationReport {
    validate_with(
        assessment,
        conversion,
        &NamingRules::default(),
        DEFAULT_MAX_NESTING,
    )
}

/// Run all four checks with caller-supplied naming rules and nesting limit.
pub fn validate_with(
    assessment: &Assessment,
    conversion: &Conversion,
    rules: &NamingRules,
    max_nesting: usize,
) -> ValidationReport {
    let mut issues = Vec::new();
    if !conversion.document_content.is_empty() {
        issues.extend(syntax::check(&conversion.document_content));
    }
    issues.extend(naming::check(conversion, rules));
    issues.extend(best_practice::check(conversion, max_nesting));
    issues.extend(diff::check(assessment, conversion));

    let mut report = ValidationReport {
        source_name: conversion.source_name.clone(),
        issues,
        passed: false,
        score: 0.0,
    };
    let errors = report.error_count() as f64;
    let warnings = report.warning_count() as f64;
    report.score = (100.0 - errors * ERROR_PENALTY - warnings * WARNING_PENALTY).max(0.0);
    report.passed = report.error_count() == 0;

    info!(
        document = %report.source_name,
        score = report.score,
        passed = report.passed,
        issues = report.issues.len(),
        "validation finished"
    );
    report
}
