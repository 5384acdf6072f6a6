//! Per-document orchestration of the three phases, batch processing with
//! failure isolation, and the record-store seam consumed by the excluded
//! persistence layer.

use crate::{
    classify, complexity,
    complexity::ComplexityThresholds,
    deps,
    error::{MigrateError, Result},
    generate, ir,
    mapping::{MappingConfig, MappingEngine},
    model::{
        Assessment, Conversion, MigrationRecord, MigrationStatus, SourceDocument, ValidationReport,
    },
    parser, validate,
    validate::NamingRules,
};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

/// Pipeline stage names, used to tag failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Analyze,
    Convert,
    Validate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Analyze => "analyze",
            Stage::Convert => "convert",
            Stage::Validate => "validate",
        };
        f.write_str(s)
    }
}

/// Analysis phase: parse, dependency mapping, complexity scoring, and
/// difficulty classification in one pass.
pub struct Analyzer {
    thresholds: ComplexityThresholds,
}

impl Analyzer {
    pub fn new(thresholds: ComplexityThresholds) -> Self {
        Analyzer { thresholds }
    }

    pub fn assess_str(&self, xml: &str, name: &str) -> Result<Assessment> {
        let doc = parser::parse_str(xml, name)?;
        Ok(self.assess_document(doc))
    }

    pub fn assess_path(&self, path: &Path) -> Result<Assessment> {
        let doc = parser::parse_path(path)?;
        Ok(self.assess_document(doc))
    }

    fn assess_document(&self, doc: SourceDocument) -> Assessment {
        let doc = deps::map_dependencies(doc);
        let score = complexity::analyze(&doc, &self.thresholds);
        classify::classify(doc, score)
    }

    /// Assess every workflow file under `dir` and return the batch in
    /// priority order. A file that fails to parse is logged and skipped;
    /// it never stops the batch.
    pub fn assess_dir(&self, dir: &Path) -> Vec<Assessment> {
        let files = find_workflow_files(dir);
        if files.is_empty() {
            warn!(dir = %dir.display(), "no workflow files found");
            return Vec::new();
        }
        info!(files = files.len(), "assessing directory");

        let mut assessments = Vec::new();
        for path in &files {
            match self.assess_path(path) {
                Ok(assessment) => assessments.push(assessment),
                Err(e) => error!(path = %path.display(), "assessment failed: {e}"),
            }
        }
        classify::prioritize(assessments)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::new(ComplexityThresholds::default())
    }
}

/// Conversion phase: IR construction, rule-table mapping, and document
/// generation.
pub struct Converter {
    config: MappingConfig,
}

impl Converter {
    pub fn new(config: MappingConfig) -> Self {
        Converter { config }
    }

    pub fn convert(&self, doc: &SourceDocument) -> Conversion {
        let ir_nodes = ir::build_ir(doc);

        let mut engine = MappingEngine::new(self.config.clone());
        let activities: Vec<_> = ir_nodes.iter().map(|n| engine.map_node(n)).collect();
        let variables: Vec<_> = doc.variables.iter().map(|v| engine.map_variable(v)).collect();

        let document_content = generate::generate_document(&activities, &variables, "Main");
        let manifest_content = generate::generate_manifest(
            &format!("PRJ_{}", doc.name),
            &format!("Migrated from source workflow: {}", doc.name),
            "Main.xaml",
        );
        let unresolved_items: Vec<String> = engine
            .unresolved()
            .map(|t| format!("Unmapped action '{t}' requires manual conversion"))
            .collect();

        // Rate over root nodes; the unresolved set is deduplicated across
        // the whole tree, so clamp to keep the value in [0, 1].
        let total = ir_nodes.len();
        let conversion_rate = if total == 0 {
            0.0
        } else {
            ((total as f64 - engine.unresolved_count() as f64) / total as f64).clamp(0.0, 1.0)
        };

        info!(
            document = %doc.name,
            rate = conversion_rate,
            unresolved = unresolved_items.len(),
            "conversion finished"
        );

        Conversion {
            source_name: doc.name.clone(),
            activities,
            variables,
            document_content,
            manifest_content,
            unresolved_items,
            conversion_rate,
        }
    }

    /// Write the generated artifacts under `{output_dir}/PRJ_{name}/`. The
    /// checklist is written only when there is something to list.
    pub fn save_output(&self, conversion: &Conversion, output_dir: &Path) -> Result<()> {
        let project_dir = output_dir.join(format!("PRJ_{}", conversion.source_name));
        let io_err = |path: &Path, source| MigrateError::Io {
            path: path.display().to_string(),
            source,
        };
        fs::create_dir_all(&project_dir).map_err(|e| io_err(&project_dir, e))?;

        let document_path = project_dir.join("Main.xaml");
        fs::write(&document_path, &conversion.document_content)
            .map_err(|e| io_err(&document_path, e))?;

        let manifest_path = project_dir.join("project.json");
        fs::write(&manifest_path, &conversion.manifest_content)
            .map_err(|e| io_err(&manifest_path, e))?;

        if let Some(checklist) = generate::generate_checklist(&conversion.unresolved_items) {
            let checklist_path = project_dir.join("TODO.md");
            fs::write(&checklist_path, checklist).map_err(|e| io_err(&checklist_path, e))?;
        }
        info!(dir = %project_dir.display(), "saved conversion output");
        Ok(())
    }
}

/// Store seam for the external run-tracking record store. Upserts are
/// keyed by document name and must be idempotent; concurrent writers for
/// different keys never conflict.
pub trait RecordStore {
    fn upsert(&mut self, record: &MigrationRecord) -> anyhow::Result<()>;
}

/// In-memory store, last-writer-wins per key. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, MigrationRecord>,
}

impl MemoryStore {
    pub fn get(&self, document_name: &str) -> Option<&MigrationRecord> {
        self.records.get(document_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn upsert(&mut self, record: &MigrationRecord) -> anyhow::Result<()> {
        self.records
            .insert(record.document_name.clone(), record.clone());
        Ok(())
    }
}

/// End-to-end pipeline: analyze, convert, validate, and record status after
/// every transition. One document's failure never stops a batch.
pub struct MigrationPipeline<S: RecordStore> {
    analyzer: Analyzer,
    converter: Converter,
    naming: NamingRules,
    max_nesting: usize,
    store: S,
}

impl<S: RecordStore> MigrationPipeline<S> {
    pub fn new(thresholds: ComplexityThresholds, mapping: MappingConfig, store: S) -> Self {
        MigrationPipeline {
            analyzer: Analyzer::new(thresholds),
            converter: Converter::new(mapping),
            naming: NamingRules::default(),
            max_nesting: validate::DEFAULT_MAX_NESTING,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Run analyze → convert → validate for one workflow file. A stage
    /// failure marks the record Failed and skips the remaining stages;
    /// earlier stages' results stay on the record.
    pub fn run_single(&mut self, path: &Path) -> MigrationRecord {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("workflow")
            .to_string();
        info!(document = %name, "pipeline started");
        let mut record = MigrationRecord::new(&name, path.display().to_string());

        record.status = MigrationStatus::Analyzing;
        self.persist(&record);
        let assessment = match self.analyzer.assess_path(path) {
            Ok(assessment) => assessment,
            Err(e) => return self.fail(record, Stage::Analyze, &name, e),
        };
        record.rank = assessment.complexity.rank;
        record.complexity_score = assessment.complexity.total_score;
        record.manual_items_text = assessment.manual_items.join("\n");
        self.persist(&record);

        record.status = MigrationStatus::Converting;
        self.persist(&record);
        let conversion = self.converter.convert(&assessment.document);
        record.conversion_rate = conversion.conversion_rate;
        self.persist(&record);

        record.status = MigrationStatus::Validating;
        self.persist(&record);
        let validation = self.validate(&assessment, &conversion);
        record.validation_score = validation.score;
        record.status = if validation.passed {
            MigrationStatus::Completed
        } else {
            MigrationStatus::ManualRequired
        };
        self.persist(&record);

        info!(document = %name, status = ?record.status, "pipeline finished");
        record
    }

    /// Run every workflow file under `dir`, isolating failures per document.
    pub fn run_batch(&mut self, dir: &Path) -> Vec<MigrationRecord> {
        let files = find_workflow_files(dir);
        if files.is_empty() {
            warn!(dir = %dir.display(), "no workflow files found");
            return Vec::new();
        }
        info!(files = files.len(), "batch pipeline started");
        files.iter().map(|path| self.run_single(path)).collect()
    }

    pub fn validate(
        &self,
        assessment: &Assessment,
        conversion: &Conversion,
    ) -> ValidationReport {
        validate::validate_with(assessment, conversion, &self.naming, self.max_nesting)
    }

    fn fail(
        &mut self,
        mut record: MigrationRecord,
        stage: Stage,
        document: &str,
        cause: MigrateError,
    ) -> MigrationRecord {
        let failure = MigrateError::Stage {
            stage,
            document: document.to_string(),
            message: cause.to_string(),
        };
        error!(document, %stage, "stage failed: {cause}");
        record.status = MigrationStatus::Failed;
        record.failure = Some(failure.to_string());
        self.persist(&record);
        record
    }

    // The store is an external collaborator; its failures are reported but
    // never abort the pipeline.
    fn persist(&mut self, record: &MigrationRecord) {
        if let Err(e) = self.store.upsert(record) {
            warn!(document = %record.document_name, "record store upsert failed: {e}");
        }
    }
}

fn find_workflow_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_workflow_files(dir, &mut files);
    files.sort();
    files
}

fn collect_workflow_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), "cannot read directory: {e}");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_workflow_files(&path, out);
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext == "xml" || ext == "robot" {
            out.push(path);
        }
    }
}
