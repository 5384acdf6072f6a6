use crate::pipeline::Stage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("XML parse error in '{document}': {message}")]
    Xml { document: String, message: String },
    #[error("Unsupported source file extension '{extension}' (expected .xml or .robot)")]
    UnsupportedFormat { extension: String },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Complexity thresholds must be strictly increasing, got A={a}, B={b}, C={c}")]
    InvalidThresholds { a: f64, b: f64, c: f64 },
    #[error("Malformed mapping table: {message}")]
    MappingTable { message: String },
    #[error("Stage {stage} failed for '{document}': {message}")]
    Stage {
        stage: Stage,
        document: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, MigrateError>;
