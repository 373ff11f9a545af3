//! Arrival-order record accumulation and per-run counters
//!
//! Records are appended once and never moved; ordering for display is done by
//! the timestamp sorter through an index over [`RecordCollector::records`].

use crate::app::models::ExposureRecord;
use crate::app::services::timestamp_sorter::SortIndex;

/// Counters for every way a directory entry can be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionStats {
    /// Files that produced a record
    pub accepted: usize,
    /// Recognized files that could not be opened
    pub rejected: usize,
    /// Entries whose name is not an exposure filename
    pub unrecognized: usize,
    /// Unreduced files skipped because the reduced file exists
    pub superseded: usize,
    /// Recognized names with a non-FITS extension
    pub ignored: usize,
}

impl CollectionStats {
    /// Entries that reached the collector in any way
    pub fn total_seen(&self) -> usize {
        self.accepted + self.rejected + self.unrecognized + self.superseded + self.ignored
    }

    pub fn summary(&self) -> String {
        format!(
            "{} accepted, {} rejected, {} superseded, {} unrecognized, {} ignored",
            self.accepted, self.rejected, self.superseded, self.unrecognized, self.ignored
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordCollector {
    records: Vec<ExposureRecord>,
    stats: CollectionStats,
}

impl RecordCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished record
    pub fn accept(&mut self, record: ExposureRecord) {
        self.records.push(record);
        self.stats.accepted += 1;
    }

    pub fn reject(&mut self) {
        self.stats.rejected += 1;
    }

    pub fn skip_unrecognized(&mut self) {
        self.stats.unrecognized += 1;
    }

    pub fn skip_superseded(&mut self) {
        self.stats.superseded += 1;
    }

    pub fn skip_ignored(&mut self) {
        self.stats.ignored += 1;
    }

    pub fn records(&self) -> &[ExposureRecord] {
        &self.records
    }

    pub fn stats(&self) -> CollectionStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Sort keys in record order
    pub fn mjd_keys(&self) -> Vec<f64> {
        self.records.iter().map(|record| record.mjd).collect()
    }

    /// Visiting order by observation time
    pub fn sort_index(&self) -> SortIndex {
        SortIndex::by_key(&self.mjd_keys())
    }
}
