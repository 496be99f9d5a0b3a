//! Result of a completed transfer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters reported once a job's items have been transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSummary {
    /// Item count reported by the job's statistics.
    pub expected_total: u64,
    /// Batch size chosen for the run, before any final-batch adjustment.
    pub batch_size: usize,
    /// Items read from the source.
    pub records_read: u64,
    /// Items handed to the search index in bulk writes.
    pub records_written: u64,
    /// Number of bulk write calls issued.
    pub bulk_writes: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TransferSummary {
    /// Whether the source yielded exactly as many items as its statistics promised.
    pub fn matches_expected(&self) -> bool {
        self.records_read == self.expected_total
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
