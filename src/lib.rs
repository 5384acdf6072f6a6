//! Transpiler core for migrating legacy RPA workflow definitions into
//! aKaBot activity trees: parse, analyze, classify, build IR, map against a
//! rule table, generate the target document, and statically validate the
//! result.
#![forbid(unsafe_code)]

pub mod classify;
pub mod complexity;
pub mod deps;
pub mod error;
pub mod generate;
pub mod ir;
pub mod mapping;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod validate;
pub mod vocab;

pub use complexity::ComplexityThresholds;
pub use error::{MigrateError, Result};
pub use mapping::MappingConfig;
pub use pipeline::{Analyzer, Converter, MemoryStore, MigrationPipeline, RecordStore};

use crate::model::{Assessment, Conversion, SourceDocument};

/// Assess one workflow document with default complexity thresholds.
pub fn assess(xml: &str, name: &str) -> Result<Assessment> {
    Analyzer::default().assess_str(xml, name)
}

/// Convert one parsed workflow using the given mapping table.
pub fn convert(doc: &SourceDocument, config: MappingConfig) -> Conversion {
    Converter::new(config).convert(doc)
}

pub use validate::validate;
