//! Rule-table driven rewrite of IR nodes into target-platform activities.
//! The table is an injected capability; lookup misses degrade to placeholder
//! activities and are collected, never raised.

use crate::{
    error::{MigrateError, Result},
    ir::IrNode,
    model::{TargetActivity, Variable, VariableDescriptor},
};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const COMMENT_ACTIVITY: &str = "AkaBot.Core.Activities.Comment";
const DEFAULT_VARIABLE_TYPE: &str = "System.String";

/// One rewrite rule. `akabot: null` marks a source action the target platform
/// has no equivalent for; the rule's note explains what to do instead.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActionRule {
    #[serde(default)]
    pub akabot: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Externally supplied mapping table: action rules plus variable-type
/// translations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MappingConfig {
    #[serde(default)]
    pub mappings: IndexMap<String, ActionRule>,
    #[serde(default)]
    pub variable_type_mapping: IndexMap<String, String>,
}

impl MappingConfig {
    /// Load a mapping table from disk, accepting JSON or YAML.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| MigrateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if let Ok(config) = serde_json::from_str::<Self>(&txt) {
            return Ok(config);
        }
        serde_yaml::from_str::<Self>(&txt).map_err(|e| MigrateError::MappingTable {
            message: format!("{} is neither valid JSON nor YAML: {e}", path.display()),
        })
    }
}

/// Applies a [`MappingConfig`] to IR nodes. Accumulates the deduplicated set
/// of source action types that fell back to placeholders.
pub struct MappingEngine {
    mappings: IndexMap<String, ActionRule>,
    lowercase_index: IndexMap<String, String>,
    type_mapping: IndexMap<String, String>,
    unresolved: IndexSet<String>,
}

impl MappingEngine {
    pub fn new(config: MappingConfig) -> Self {
        // Built once so case-insensitive lookups stay O(1) per node.
        let lowercase_index = config
            .mappings
            .keys()
            .map(|k| (k.to_lowercase(), k.clone()))
            .collect();
        MappingEngine {
            mappings: config.mappings,
            lowercase_index,
            type_mapping: config.variable_type_mapping,
            unresolved: IndexSet::new(),
        }
    }

    /// Rewrite one IR node into a target activity. Never fails: an action
    /// type without a usable rule collapses to a single Comment placeholder,
    /// children included.
    pub fn map_node(&mut self, node: &IrNode) -> TargetActivity {
        let original_type = node.provenance.original_type.as_str();
        let rule = self.lookup(original_type).cloned();

        let Some(rule) = rule else {
            warn!(action_type = original_type, "no mapping rule, emitting placeholder");
            self.unresolved.insert(original_type.to_string());
            return placeholder(
                format!("TODO: {original_type} (unmapped)"),
                format!("Manual conversion required: {original_type}"),
            );
        };

        let Some(target_type) = rule.akabot.clone() else {
            warn!(action_type = original_type, "rule marks action as unsupported");
            self.unresolved.insert(original_type.to_string());
            let note = rule
                .note
                .clone()
                .unwrap_or_else(|| "Manual conversion required".to_string());
            return placeholder(format!("TODO: {original_type}"), note);
        };

        let properties = map_properties(&node.properties, &rule.properties);
        let children = node.children.iter().map(|c| self.map_node(c)).collect();

        TargetActivity {
            activity_type: target_type,
            display_name: node.provenance.original_name.clone(),
            properties,
            children,
        }
    }

    /// Translate one source variable into a target declaration, falling back
    /// to `System.String` for unknown types.
    pub fn map_variable(&self, var: &Variable) -> VariableDescriptor {
        let var_type = self
            .type_mapping
            .get(&var.declared_type)
            .cloned()
            .unwrap_or_else(|| DEFAULT_VARIABLE_TYPE.to_string());
        VariableDescriptor {
            name: var.name.clone(),
            var_type,
            default_value: var.default_value.clone().unwrap_or_default(),
            scope: var.scope.clone(),
        }
    }

    /// Deduplicated source action types that hit the placeholder path, in
    /// first-hit order.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.unresolved.iter().map(String::as_str)
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }

    fn lookup(&self, original_type: &str) -> Option<&ActionRule> {
        if let Some(rule) = self.mappings.get(original_type) {
            return Some(rule);
        }
        self.lowercase_index
            .get(&original_type.to_lowercase())
            .and_then(|key| self.mappings.get(key))
    }
}

fn placeholder(display_name: String, text: String) -> TargetActivity {
    let mut properties = IndexMap::new();
    properties.insert("Text".to_string(), text);
    TargetActivity {
        activity_type: COMMENT_ACTIVITY.to_string(),
        display_name,
        properties,
        children: Vec::new(),
    }
}

/// Pure key rename using the rule's declared property map. Source properties
/// without a declared target key are dropped.
fn map_properties(
    source: &IndexMap<String, String>,
    rule_map: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut out = IndexMap::new();
    for (source_key, target_key) in rule_map {
        if let Some(value) = source.get(source_key) {
            out.insert(target_key.clone(), value.clone());
        }
    }
    out
}
