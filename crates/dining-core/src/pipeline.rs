/// Normalization driver: Collector -> Matcher -> Merger -> ID Assigner -> Writer.
///
/// Single-threaded and synchronous. All state lives in the values passed
/// between stages; no stage looks at a later stage's output.
use std::path::Path;

use tracing::{info, warn};

use crate::collector::Collector;
use crate::error::CoreError;
use crate::ids::IdAssigner;
use crate::matcher;
use crate::merger;
use crate::model::{CanonicalRecord, RawRecord};
use crate::writer;

/// Counters describing one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Records handed to the matcher
    pub raw: usize,
    /// Records skipped for having no usable name
    pub unmatched: usize,
    /// Canonical records produced (one per match group)
    pub restaurants: usize,
    /// Records whose derived ID needed a numeric suffix
    pub id_collisions: usize,
    /// Malformed raw elements dropped while collecting
    pub dropped: usize,
}

pub struct Normalized {
    pub records: Vec<CanonicalRecord>,
    pub report: NormalizeReport,
}

/// Deduplicate raw records into canonical restaurants, in first-seen order.
pub fn normalize(records: Vec<RawRecord>) -> Normalized {
    let raw = records.len();
    let partition = matcher::partition(records);

    let mut assigner = IdAssigner::new();
    let canonical: Vec<CanonicalRecord> = partition
        .groups
        .iter()
        .map(merger::merge)
        .map(|merged| assigner.assign(merged))
        .collect();

    let report = NormalizeReport {
        raw,
        unmatched: partition.unmatched.len(),
        restaurants: canonical.len(),
        id_collisions: assigner.collisions(),
        dropped: 0,
    };
    info!(
        raw = report.raw,
        restaurants = report.restaurants,
        unmatched = report.unmatched,
        id_collisions = report.id_collisions,
        "normalized restaurants"
    );

    Normalized {
        records: canonical,
        report,
    }
}

/// Read the raw file, normalize it and write the normalized file.
pub fn run(raw_path: &Path, output_path: &Path) -> Result<NormalizeReport, CoreError> {
    let mut collector = Collector::new();
    collector.load_file(raw_path)?;
    let dropped = collector.dropped();

    let normalized = normalize(collector.into_records());
    writer::write_canonical_file(output_path, &normalized.records)?;

    if dropped > 0 {
        warn!(dropped, "malformed raw records were dropped");
    }
    Ok(NormalizeReport {
        dropped,
        ..normalized.report
    })
}
