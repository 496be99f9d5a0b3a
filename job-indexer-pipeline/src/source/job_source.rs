//! Job source trait definition.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::errors::PipelineError;
use crate::source::JobMetadata;
use job_indexer_shared::{JobId, Record};

/// Abstracts the job storage service the items are read from.
///
/// Implementations must be `Send + Sync` so a pipeline can hold them behind an `Arc`.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch the job's metadata as `(category, data)` pairs.
    async fn job_metadata(&self, job: &JobId) -> Result<JobMetadata, PipelineError>;

    /// Open the job's items as a lazy stream.
    ///
    /// Nothing is requested until the stream is polled. The stream is a single
    /// forward pass; call `items` again to start over.
    fn items(&self, job: &JobId) -> BoxStream<'static, Result<Record, PipelineError>>;
}
