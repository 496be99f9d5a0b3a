//! Search index client implementation.
//!
//! This module provides the main client for interacting with the search index.
//! The transfer pipeline uses it to recreate a job's index and to send bulk writes.

use tracing::{debug, instrument, warn};

use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::BatchOperationSummary;
use job_indexer_shared::{IndexAction, IndexTarget};

/// The main client for interacting with the search index.
pub struct SearchIndexClient {
    provider: Box<dyn SearchIndexProvider>,
    config: SearchIndexConfig,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient with default configuration.
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexConfig::default(),
        }
    }

    /// Create a new SearchIndexClient with custom configuration.
    pub fn with_config(provider: Box<dyn SearchIndexProvider>, config: SearchIndexConfig) -> Self {
        Self { provider, config }
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Drop the target index if it exists and create it again, empty.
    #[instrument(skip(self), fields(index = %target.name))]
    pub async fn recreate_index(&self, target: &IndexTarget) -> Result<(), SearchIndexError> {
        if target.name.trim().is_empty() {
            return Err(SearchIndexError::validation("index name is required"));
        }

        if self.provider.index_exists(&target.name).await? {
            warn!("Index already exists, deleting it");
            self.provider.delete_index(&target.name).await?;
        }

        self.provider.create_index(&target.name).await?;
        debug!("Index created");
        Ok(())
    }

    /// Send a batch of write requests as one bulk call.
    ///
    /// Any item the engine reports as failed turns the whole call into a single
    /// `BulkOperationError`; nothing is retried.
    ///
    /// The batch size is limited by the configured max_batch_size.
    #[instrument(skip(self, actions), fields(count = actions.len()))]
    pub async fn bulk_write(
        &self,
        actions: &[IndexAction],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if actions.is_empty() {
            return Ok(BatchOperationSummary::default());
        }

        self.validate_batch_size(actions.len())?;

        debug!("Bulk writing items");
        let summary = self.provider.bulk_index(actions).await?;

        if summary.has_failures() {
            return Err(SearchIndexError::bulk_operation(format!(
                "{} of {} items failed, first error: {}",
                summary.failed,
                summary.total,
                summary.first_error().unwrap_or("unknown")
            )));
        }

        Ok(summary)
    }

    /// Check if the search engine is healthy.
    pub async fn health_check(&self) -> Result<bool, SearchIndexError> {
        self.provider.health_check().await
    }
}
