//! Orchestrator module for the job indexer pipeline.
//!
//! Coordinates the source, processor, and loader components for a single job.

use std::sync::Arc;

use chrono::Utc;
use futures::TryStreamExt;
use tracing::{debug, info, instrument, warn};

use crate::errors::PipelineError;
use crate::loader::{BulkLoader, LoaderConfig};
use crate::processor::RecordProcessor;
use crate::source::JobSource;
use job_indexer_repository::SearchIndexClient;
use job_indexer_shared::{IndexTarget, JobId, TransferSummary};

/// Default document type attached to every write.
pub const DEFAULT_DOC_TYPE: &str = "product";

/// Configuration for a transfer.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Explicit index name. Derived from the job id when absent.
    pub index_name: Option<String>,
    /// Document type attached to every write.
    pub doc_type: String,
    pub loader: LoaderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            index_name: None,
            doc_type: DEFAULT_DOC_TYPE.to_string(),
            loader: LoaderConfig::default(),
        }
    }
}

/// Moves one job's items into a freshly created search index.
///
/// The pipeline:
/// - Recreates the target index when it is initialized
/// - Reads the job's reported item count to size its batches
/// - Streams items once, wrapping and writing them in bulk
pub struct TransferPipeline {
    source: Arc<dyn JobSource>,
    sink: Arc<SearchIndexClient>,
    processor: RecordProcessor,
    job_id: JobId,
    config: PipelineConfig,
}

impl TransferPipeline {
    /// Validate the configuration and recreate the target index, empty.
    ///
    /// No items are read here.
    #[instrument(skip(source, sink, config), fields(job = %job_id))]
    pub async fn initialize(
        source: Arc<dyn JobSource>,
        sink: SearchIndexClient,
        job_id: &str,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        let job_id = JobId::parse(job_id)?;
        config.loader.validate()?;

        let index_name = match &config.index_name {
            Some(name) if name.trim().is_empty() => {
                return Err(PipelineError::configuration("index name must not be empty"));
            }
            Some(name) => name.clone(),
            None => job_id.default_index_name(),
        };
        let target = IndexTarget::new(index_name, config.doc_type.clone());

        sink.recreate_index(&target)
            .await
            .map_err(|e| PipelineError::index_setup(e.to_string()))?;

        info!(index = %target.name, doc_type = %target.doc_type, "Index ready");

        Ok(Self {
            source,
            sink: Arc::new(sink),
            processor: RecordProcessor::new(target),
            job_id,
            config,
        })
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Index and document type every write is tagged with.
    pub fn target(&self) -> &IndexTarget {
        self.processor.target()
    }

    /// Number of items the job's crawler statistics report.
    pub async fn fetch_total_count(&self) -> Result<u64, PipelineError> {
        let metadata = self.source.job_metadata(&self.job_id).await?;

        metadata
            .item_scraped_count()
            .ok_or_else(|| PipelineError::missing_count(self.job_id.to_string()))
    }

    /// Stream every item of the job into the index.
    ///
    /// The reported item count only sizes the batches; every item the source
    /// yields is written, however many there are.
    #[instrument(skip(self), fields(job = %self.job_id, index = %self.target().name))]
    pub async fn transfer(&self) -> Result<TransferSummary, PipelineError> {
        let started_at = Utc::now();

        let total = self.fetch_total_count().await?;
        let batch_size = self.config.loader.batch_size_for(total);
        info!(total = total, batch_size = batch_size, "Starting transfer");

        let mut loader = BulkLoader::new(self.sink.clone(), batch_size, total);
        let mut records_read: u64 = 0;

        debug!("Getting items");
        let mut items = self.source.items(&self.job_id);
        while let Some(record) = items.try_next().await? {
            records_read += 1;
            loader.load(self.processor.process(record)).await?;
        }

        loader.flush().await?;

        let stats = loader.stats();
        if records_read != total {
            warn!(
                expected = total,
                read = records_read,
                "Item count differs from the job statistics"
            );
        }

        info!(
            written = stats.records_written,
            bulk_writes = stats.bulk_writes,
            "Transfer completed"
        );

        Ok(TransferSummary {
            expected_total: total,
            batch_size,
            records_read,
            records_written: stats.records_written,
            bulk_writes: stats.bulk_writes,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
