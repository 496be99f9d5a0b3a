//! Loader module for the job indexer pipeline.
//!
//! Buffers index actions into batches and writes each batch to the search
//! index in one bulk call.

mod batch;
mod batch_size;

pub use batch::{BatchState, BatchStep};
pub use batch_size::compute_batch_size;

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use job_indexer_repository::SearchIndexClient;
use job_indexer_shared::IndexAction;

/// Default starting batch size.
pub const DEFAULT_BASE_BATCH_SIZE: usize = 5_000;

/// Default upper bound for the batch size.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 20_000;

/// Configuration for the bulk loader.
#[derive(Debug, Clone, Copy)]
pub struct LoaderConfig {
    /// Batch size the sizing heuristic starts from.
    pub base_batch_size: usize,
    /// Batch size the heuristic never grows past.
    pub max_batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_batch_size: DEFAULT_BASE_BATCH_SIZE,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl LoaderConfig {
    pub fn new(base_batch_size: usize, max_batch_size: usize) -> Self {
        Self {
            base_batch_size,
            max_batch_size,
        }
    }

    /// Reject sizes the loader cannot work with.
    ///
    /// A maximum that is not a multiple of the base is allowed; the sizing
    /// then stops at the largest doubling that fits.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.base_batch_size == 0 {
            return Err(PipelineError::configuration("batch size must be positive"));
        }
        if self.max_batch_size < self.base_batch_size {
            return Err(PipelineError::configuration(format!(
                "max batch size {} is smaller than batch size {}",
                self.max_batch_size, self.base_batch_size
            )));
        }
        if self.max_batch_size % self.base_batch_size != 0 {
            warn!(
                base_batch_size = self.base_batch_size,
                max_batch_size = self.max_batch_size,
                "Max batch size is not a multiple of the batch size"
            );
        }
        Ok(())
    }

    /// Batch size for a job with `total_count` items.
    pub fn batch_size_for(&self, total_count: u64) -> usize {
        compute_batch_size(total_count, self.base_batch_size, self.max_batch_size)
    }
}

/// Counters kept by the loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Items handed to the search index.
    pub records_written: u64,
    /// Bulk calls issued.
    pub bulk_writes: u64,
}

/// Loader that writes index actions to the search index in bulk.
///
/// The loader is responsible for:
/// - Accumulating actions up to the current batch size
/// - Shrinking the last batch to land exactly on the job's item count
/// - Dispatching each batch as one bulk call, without retries
pub struct BulkLoader {
    client: Arc<SearchIndexClient>,
    state: BatchState,
    expected_total: u64,
    stats: LoaderStats,
}

impl BulkLoader {
    /// Create a loader for a job expected to produce `expected_total` items.
    pub fn new(client: Arc<SearchIndexClient>, batch_size: usize, expected_total: u64) -> Self {
        Self {
            client,
            state: BatchState::new(batch_size),
            expected_total,
            stats: LoaderStats::default(),
        }
    }

    pub fn stats(&self) -> LoaderStats {
        self.stats
    }

    /// Current target batch size.
    pub fn batch_size(&self) -> usize {
        self.state.target()
    }

    /// Buffer one action, flushing when the batch is complete.
    pub async fn load(&mut self, action: IndexAction) -> Result<(), PipelineError> {
        let remaining = self
            .expected_total
            .saturating_sub(self.stats.records_written);

        match self.state.push(action, remaining) {
            BatchStep::Flush => self.flush().await,
            BatchStep::Accumulate => Ok(()),
        }
    }

    /// Write all buffered actions in one bulk call.
    #[instrument(skip(self), fields(buffered = self.state.len()))]
    pub async fn flush(&mut self) -> Result<(), PipelineError> {
        if self.state.is_empty() {
            return Ok(());
        }

        let batch = self.state.take();
        let count = batch.len();

        debug!(count = count, "Flushing items to search index");

        if let Err(e) = self.client.bulk_write(&batch).await {
            error!(error = %e, count = count, "Bulk write failed");
            return Err(PipelineError::bulk_write(e.to_string()));
        }

        self.stats.records_written += count as u64;
        self.stats.bulk_writes += 1;

        info!(
            count = count,
            written = self.stats.records_written,
            expected = self.expected_total,
            "Bulk write completed"
        );
        Ok(())
    }
}
