//! # Job Indexer
//!
//! Main library for the Scrapy Cloud job items indexer.
//!
//! This crate provides the command line, logging setup and dependency wiring
//! for running one transfer of a job's items into a search index.

pub mod cli;
pub mod config;
pub mod logging;

pub use cli::Cli;
pub use config::{Dependencies, IndexerSettings};

use thiserror::Error;
use tracing::info;

use job_indexer_shared::TransferSummary;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] job_indexer_pipeline::PipelineError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] job_indexer_repository::SearchIndexError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Wire up the pipeline for the configured job and transfer its items.
pub async fn run(settings: IndexerSettings) -> Result<TransferSummary, IndexingError> {
    let dependencies = Dependencies::new(&settings).await?;
    let summary = dependencies.pipeline.transfer().await?;

    info!(
        job = %dependencies.pipeline.job_id(),
        index = %dependencies.pipeline.target().name,
        read = summary.records_read,
        written = summary.records_written,
        bulk_writes = summary.bulk_writes,
        elapsed_ms = summary.elapsed_ms(),
        "Job indexed"
    );

    Ok(summary)
}
