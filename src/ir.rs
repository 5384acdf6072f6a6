//! Canonical intermediate representation of control flow, plus the builder
//! that rewrites the source action tree into it.

use crate::model::{ActionNode, SourceDocument};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Control-flow classification of an IR node. Anything outside the fixed
/// control-flow vocabulary is a plain [`IrKind::Activity`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IrKind {
    Conditional,
    ConditionalBranch,
    ConditionalElse,
    Switch,
    SwitchCase,
    LoopForeach,
    LoopWhile,
    LoopGeneric,
    ErrorHandling,
    Activity,
}

/// Source identity carried through every rewrite so downstream consumers can
/// always recover where an IR node came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provenance {
    pub original_type: String,
    pub original_name: String,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrNode {
    pub kind: IrKind,
    pub name: String,
    pub properties: IndexMap<String, String>,
    pub children: Vec<IrNode>,
    pub provenance: Provenance,
}

impl IrNode {
    /// Node count of this subtree, itself included.
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(IrNode::count_nodes).sum::<usize>()
    }
}

fn classify_action_type(action_type: &str) -> IrKind {
    match action_type {
        "if" | "If" => IrKind::Conditional,
        "elseIf" | "ElseIf" => IrKind::ConditionalBranch,
        "else" | "Else" => IrKind::ConditionalElse,
        "switch" | "Switch" => IrKind::Switch,
        "case" | "Case" => IrKind::SwitchCase,
        "forEach" | "ForEach" => IrKind::LoopForeach,
        "while" | "While" => IrKind::LoopWhile,
        "loop" | "Loop" => IrKind::LoopGeneric,
        "tryCatch" | "TryCatch" => IrKind::ErrorHandling,
        _ => IrKind::Activity,
    }
}

/// Rewrite the whole action forest into IR. Total structural homomorphism:
/// exactly one IR node per action, same shape, never fails.
pub fn build_ir(doc: &SourceDocument) -> Vec<IrNode> {
    let nodes: Vec<IrNode> = doc.actions.iter().map(action_to_node).collect();
    debug!(document = %doc.name, roots = nodes.len(), "built IR forest");
    nodes
}

fn action_to_node(action: &ActionNode) -> IrNode {
    IrNode {
        kind: classify_action_type(&action.action_type),
        name: action.action_type.clone(),
        properties: action.properties.clone(),
        children: action.children.iter().map(action_to_node).collect(),
        provenance: Provenance {
            original_type: action.action_type.clone(),
            original_name: action.name.clone(),
            line: action.line,
        },
    }
}
