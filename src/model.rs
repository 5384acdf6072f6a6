use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One step in the source workflow. Children are owned, so the tree is
/// finite and acyclic by construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionNode {
    pub action_type: String,
    pub name: String,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
    #[serde(default)]
    pub children: Vec<ActionNode>,
    #[serde(default)]
    pub line: u32,
}

impl ActionNode {
    pub fn new(action_type: impl Into<String>, name: impl Into<String>) -> Self {
        ActionNode {
            action_type: action_type.into(),
            name: name.into(),
            properties: IndexMap::new(),
            children: Vec::new(),
            line: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variable {
    pub name: String,
    pub declared_type: String,
    #[serde(default)]
    pub default_value: Option<String>,
    pub scope: String,
}

/// Parsed source workflow plus the dependency fields filled in by
/// [`crate::deps::map_dependencies`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceDocument {
    pub name: String,
    pub actions: Vec<ActionNode>,
    pub variables: Vec<Variable>,
    pub sub_workflows: Vec<String>,
    #[serde(default)]
    pub external_connections: Vec<String>,
    #[serde(default)]
    pub file_paths: Vec<String>,
    #[serde(default)]
    pub api_calls: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DifficultyRank {
    A,
    B,
    C,
    D,
}

impl std::fmt::Display for DifficultyRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DifficultyRank::A => "A",
            DifficultyRank::B => "B",
            DifficultyRank::C => "C",
            DifficultyRank::D => "D",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityScore {
    pub step_count: usize,
    pub branch_depth: usize,
    pub loop_depth: usize,
    pub external_deps: usize,
    pub total_score: f64,
    pub rank: DifficultyRank,
    pub risk_flags: Vec<String>,
}

/// Output of the analysis phase. `priority` stays 0 until
/// [`crate::classify::prioritize`] assigns a 1-based position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub document: SourceDocument,
    pub complexity: ComplexityScore,
    pub priority: u32,
    pub estimated_hours: f64,
    pub auto_convertible_rate: f64,
    pub manual_items: Vec<String>,
}

/// One node of the generated target activity tree. A Comment activity may
/// stand in as an unresolved marker for a source action with no mapping rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetActivity {
    pub activity_type: String,
    pub display_name: String,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
    #[serde(default)]
    pub children: Vec<TargetActivity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableDescriptor {
    pub name: String,
    pub var_type: String,
    pub default_value: String,
    pub scope: String,
}

/// Output of the conversion phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversion {
    pub source_name: String,
    pub activities: Vec<TargetActivity>,
    pub variables: Vec<VariableDescriptor>,
    pub document_content: String,
    pub manifest_content: String,
    pub unresolved_items: Vec<String>,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Syntax,
    Naming,
    BestPractice,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(severity: Severity, category: Category, message: impl Into<String>) -> Self {
        ValidationIssue {
            severity,
            category,
            message: message.into(),
            location: None,
            suggestion: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Output of the validation phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub source_name: String,
    pub issues: Vec<ValidationIssue>,
    pub passed: bool,
    pub score: f64,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    Pending,
    Analyzing,
    Converting,
    Validating,
    Completed,
    ManualRequired,
    Failed,
}

/// Flat per-document record handed to the external record store after every
/// status transition. Keyed by `document_name`; upserts are idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub document_name: String,
    pub source_path: String,
    pub status: MigrationStatus,
    pub rank: DifficultyRank,
    pub complexity_score: f64,
    pub conversion_rate: f64,
    pub validation_score: f64,
    pub manual_items_text: String,
    #[serde(default)]
    pub failure: Option<String>,
}

impl MigrationRecord {
    pub fn new(document_name: impl Into<String>, source_path: impl Into<String>) -> Self {
        MigrationRecord {
            document_name: document_name.into(),
            source_path: source_path.into(),
            status: MigrationStatus::Pending,
            rank: DifficultyRank::A,
            complexity_score: 0.0,
            conversion_rate: 0.0,
            validation_score: 0.0,
            manual_items_text: String::new(),
            failure: None,
        }
    }
}
