//! Structural complexity scoring over the action tree.

use crate::{
    error::{MigrateError, Result},
    model::{ActionNode, ComplexityScore, DifficultyRank, SourceDocument},
    vocab::{BRANCH_ACTION_SET, LOOP_ACTION_SET, RISK_ACTION_SET},
};
use std::collections::HashSet;
use tracing::info;

const STEP_WEIGHT: f64 = 1.0;
const BRANCH_WEIGHT: f64 = 5.0;
const LOOP_WEIGHT: f64 = 5.0;
const DEP_WEIGHT: f64 = 3.0;
const RISK_WEIGHT: f64 = 10.0;

/// Rank cutoffs: scores `<= a` rank A, `<= b` rank B, `<= c` rank C,
/// anything above ranks D. Construction rejects cutoffs that are not
/// strictly increasing since classification would be ambiguous otherwise.
#[derive(Debug, Clone, Copy)]
pub struct ComplexityThresholds {
    a: f64,
    b: f64,
    c: f64,
}

impl ComplexityThresholds {
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self> {
        if !(a < b && b < c) {
            return Err(MigrateError::InvalidThresholds { a, b, c });
        }
        Ok(ComplexityThresholds { a, b, c })
    }

    pub fn rank_for(&self, score: f64) -> DifficultyRank {
        if score <= self.a {
            DifficultyRank::A
        } else if score <= self.b {
            DifficultyRank::B
        } else if score <= self.c {
            DifficultyRank::C
        } else {
            DifficultyRank::D
        }
    }
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        ComplexityThresholds {
            a: 10.0,
            b: 30.0,
            c: 60.0,
        }
    }
}

/// Compute the weighted complexity score for an analyzed document. Expects
/// the dependency fields to be populated already.
pub fn analyze(doc: &SourceDocument, thresholds: &ComplexityThresholds) -> ComplexityScore {
    let step_count = count_steps(&doc.actions);
    let branch_depth = max_nesting_depth(&doc.actions, &BRANCH_ACTION_SET);
    let loop_depth = max_nesting_depth(&doc.actions, &LOOP_ACTION_SET);
    let external_deps = doc.external_connections.len() + doc.api_calls.len();
    let risk_flags = detect_risks(&doc.actions);

    let total_score = step_count as f64 * STEP_WEIGHT
        + branch_depth as f64 * BRANCH_WEIGHT
        + loop_depth as f64 * LOOP_WEIGHT
        + external_deps as f64 * DEP_WEIGHT
        + risk_flags.len() as f64 * RISK_WEIGHT;

    let rank = thresholds.rank_for(total_score);

    info!(
        document = %doc.name,
        score = total_score,
        rank = %rank,
        "complexity analysis finished"
    );

    ComplexityScore {
        step_count,
        branch_depth,
        loop_depth,
        external_deps,
        total_score,
        rank,
        risk_flags,
    }
}

/// Total node count over the whole forest.
fn count_steps(actions: &[ActionNode]) -> usize {
    actions
        .iter()
        .map(|a| 1 + count_steps(&a.children))
        .sum()
}

/// Maximum nesting depth over `target_types`. Only a node whose type is in
/// the set increments the depth; any other node passes the current depth
/// through to its children unchanged.
fn max_nesting_depth(actions: &[ActionNode], target_types: &HashSet<&str>) -> usize {
    calc_depth(actions, target_types, 0)
}

fn calc_depth(actions: &[ActionNode], target_types: &HashSet<&str>, current: usize) -> usize {
    let mut max_depth = current;
    for action in actions {
        let next = if target_types.contains(action.action_type.as_str()) {
            current + 1
        } else {
            current
        };
        max_depth = max_depth.max(calc_depth(&action.children, target_types, next));
    }
    max_depth
}

fn detect_risks(actions: &[ActionNode]) -> Vec<String> {
    let mut risks = Vec::new();
    for action in actions {
        if RISK_ACTION_SET.contains(action.action_type.as_str()) {
            risks.push(format!("{}: {}", action.action_type, action.name));
        }
        risks.extend(detect_risks(&action.children));
    }
    risks
}
