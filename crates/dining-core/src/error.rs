/// Error types for the normalization engine.
///
/// Only I/O and document-level failures are errors. Per-record problems
/// (missing name, empty name, ID collisions) are counted and logged instead,
/// so a partial restaurant list still reaches the later stages.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of records, found {0}")]
    NotAnArray(&'static str),
}
