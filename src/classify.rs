//! Difficulty classification: per-rank estimates, manual-intervention items,
//! and batch prioritization.

use crate::model::{Assessment, ComplexityScore, DifficultyRank, SourceDocument};
use tracing::info;

const MIN_AUTO_RATE: f64 = 0.1;
const RISK_RATE_PENALTY: f64 = 0.1;
const RISK_HOURS_PENALTY: f64 = 2.0;
const DEP_RATE_PENALTY: f64 = 0.05;
const DEP_HOURS_PENALTY: f64 = 1.0;
const DEP_PENALTY_THRESHOLD: usize = 3;

fn base_auto_rate(rank: DifficultyRank) -> f64 {
    match rank {
        DifficultyRank::A => 0.90,
        DifficultyRank::B => 0.70,
        DifficultyRank::C => 0.50,
        DifficultyRank::D => 0.30,
    }
}

fn base_hours(rank: DifficultyRank) -> f64 {
    match rank {
        DifficultyRank::A => 1.0,
        DifficultyRank::B => 4.0,
        DifficultyRank::C => 8.0,
        DifficultyRank::D => 16.0,
    }
}

/// Derive the migration assessment for one analyzed document. Never fails.
pub fn classify(doc: SourceDocument, complexity: ComplexityScore) -> Assessment {
    let mut auto_rate = base_auto_rate(complexity.rank);
    let mut estimated_hours = base_hours(complexity.rank);

    if !complexity.risk_flags.is_empty() {
        let n = complexity.risk_flags.len() as f64;
        auto_rate = (auto_rate - RISK_RATE_PENALTY * n).max(MIN_AUTO_RATE);
        estimated_hours += RISK_HOURS_PENALTY * n;
    }
    if complexity.external_deps > DEP_PENALTY_THRESHOLD {
        auto_rate = (auto_rate - DEP_RATE_PENALTY).max(MIN_AUTO_RATE);
        estimated_hours += DEP_HOURS_PENALTY;
    }

    let manual_items = identify_manual_items(&doc, &complexity);

    info!(
        document = %doc.name,
        rank = %complexity.rank,
        auto_rate,
        estimated_hours,
        "classification finished"
    );

    Assessment {
        document: doc,
        complexity,
        priority: 0,
        estimated_hours,
        auto_convertible_rate: auto_rate,
        manual_items,
    }
}

/// Manual-intervention checklist. Entry order is fixed (risk flags, external
/// connections, sub-workflow references, then the boilerplate items) so
/// batch output stays reproducible.
fn identify_manual_items(doc: &SourceDocument, complexity: &ComplexityScore) -> Vec<String> {
    let mut items = Vec::new();
    for flag in &complexity.risk_flags {
        items.push(format!("[manual] {flag} - alternative implementation required"));
    }
    for conn in &doc.external_connections {
        items.push(format!("[confirm] external connection: {conn}"));
    }
    for sub in &doc.sub_workflows {
        items.push(format!("[confirm] sub-workflow reference: {sub}"));
    }
    items.push("[manual] selectors will likely need re-validation".to_string());
    items.push("[manual] credentials must be re-entered in the target platform".to_string());
    items.push("[confirm] business requirements and workflow intent".to_string());
    items
}

/// Order a batch of assessments for migration and assign 1-based priorities:
/// easiest rank first, then highest automation rate, then lowest effort.
/// The sort is stable, so re-running on the same input (ties included)
/// yields an identical order.
pub fn prioritize(mut assessments: Vec<Assessment>) -> Vec<Assessment> {
    assessments.sort_by(|x, y| {
        x.complexity
            .rank
            .cmp(&y.complexity.rank)
            .then_with(|| {
                y.auto_convertible_rate
                    .total_cmp(&x.auto_convertible_rate)
            })
            .then_with(|| x.estimated_hours.total_cmp(&y.estimated_hours))
    });
    for (i, assessment) in assessments.iter_mut().enumerate() {
        assessment.priority = (i + 1) as u32;
    }
    assessments
}
