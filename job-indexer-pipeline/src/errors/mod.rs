//! Error types for the job indexer pipeline.

use job_indexer_shared::JobIdError;
use thiserror::Error;

/// Errors that can occur while transferring a job's items.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid job id, batch sizes or connection settings.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The job's metadata carries no scraped item count to size batches from.
    #[error("Job {job} has no scrapystats.item_scraped_count in its metadata")]
    MissingCount { job: String },

    /// Error from the job source.
    #[error("Source error: {0}")]
    SourceError(String),

    /// Checking, deleting or creating the target index failed.
    #[error("Index setup error: {0}")]
    IndexSetupError(String),

    /// A bulk write failed or reported failed items.
    #[error("Bulk write error: {0}")]
    BulkWriteError(String),

    /// Error parsing or decoding data.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl PipelineError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create a missing count error for the given job.
    pub fn missing_count(job: impl Into<String>) -> Self {
        Self::MissingCount { job: job.into() }
    }

    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create an index setup error.
    pub fn index_setup(msg: impl Into<String>) -> Self {
        Self::IndexSetupError(msg.into())
    }

    /// Create a bulk write error.
    pub fn bulk_write(msg: impl Into<String>) -> Self {
        Self::BulkWriteError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}

impl From<JobIdError> for PipelineError {
    fn from(err: JobIdError) -> Self {
        Self::ConfigurationError(err.to_string())
    }
}
