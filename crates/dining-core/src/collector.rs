/// Raw record collection.
///
/// Accumulates extractor output in crawl order. Whole-document problems
/// (unreadable file, non-array JSON) are errors; a malformed element is
/// dropped and counted so one bad record never sinks the run.
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::RawRecord;

#[derive(Debug, Default)]
pub struct Collector {
    records: Vec<RawRecord>,
    dropped: usize,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    /// Parse a raw-output document (JSON array of record objects).
    ///
    /// Returns the number of records accepted from this document.
    pub fn ingest_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let document: Value = serde_json::from_str(json)?;
        let items = match document {
            Value::Array(items) => items,
            other => return Err(CoreError::NotAnArray(json_kind(&other))),
        };

        let mut accepted = 0;
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<RawRecord>(item) {
                Ok(record) => {
                    self.records.push(record);
                    accepted += 1;
                }
                Err(e) => {
                    warn!(index, error = %e, "malformed raw record, dropping");
                    self.dropped += 1;
                }
            }
        }
        Ok(accepted)
    }

    /// Read and ingest a raw-output file from disk.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let accepted = self.ingest_json(&content)?;
        info!(path = %path.display(), accepted, "loaded raw records");
        Ok(accepted)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of malformed elements dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn into_records(self) -> Vec<RawRecord> {
        self.records
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
