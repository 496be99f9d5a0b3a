//! In-memory job source for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{json, Value};

use crate::errors::PipelineError;
use crate::source::{JobMetadata, JobSource};
use job_indexer_shared::{JobId, Record};

/// Serves fixed metadata and a fixed list of items.
#[derive(Clone)]
pub(crate) struct MemoryJobSource {
    metadata: Vec<(String, Value)>,
    records: Vec<Record>,
    items_opened: Arc<AtomicBool>,
}

impl MemoryJobSource {
    /// A job whose statistics report `reported` items and which yields `actual` items.
    pub(crate) fn with_counts(reported: u64, actual: usize) -> Self {
        Self {
            metadata: vec![
                ("state".to_string(), json!("finished")),
                (
                    "scrapystats".to_string(),
                    json!({ "item_scraped_count": reported }),
                ),
            ],
            records: (0..actual)
                .map(|n| json!({ "sku": n }).as_object().cloned().unwrap())
                .collect(),
            items_opened: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A job with items but no crawler statistics.
    pub(crate) fn without_stats(actual: usize) -> Self {
        let mut source = Self::with_counts(0, actual);
        source.metadata.retain(|(category, _)| category != "scrapystats");
        source
    }

    pub(crate) fn items_opened(&self) -> bool {
        self.items_opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobSource for MemoryJobSource {
    async fn job_metadata(&self, _job: &JobId) -> Result<JobMetadata, PipelineError> {
        Ok(JobMetadata::new(self.metadata.clone()))
    }

    fn items(&self, _job: &JobId) -> BoxStream<'static, Result<Record, PipelineError>> {
        self.items_opened.store(true, Ordering::SeqCst);
        stream::iter(self.records.clone().into_iter().map(Ok)).boxed()
    }
}
