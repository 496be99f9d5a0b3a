//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;
use job_indexer_shared::IndexAction;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into `SearchIndexClient` to enable dependency injection
/// and easy testing with mock implementations.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check whether an index with the given name exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Delete an index.
    ///
    /// An index that does not exist, or a request the engine rejects as bad,
    /// is not treated as a failure.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was deleted (or there was nothing to delete)
    /// * `Err(SearchIndexError)` - If the deletion fails for any other reason
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Create an empty index with default settings.
    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Send all actions in a single bulk request and return a per-item summary.
    ///
    /// # Arguments
    ///
    /// * `actions` - Write requests, in the order they should be applied
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Contains aggregate statistics and individual results
    /// * `Err(SearchIndexError)` - If the bulk request fails entirely
    async fn bulk_index(
        &self,
        actions: &[IndexAction],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster reports green or yellow
    /// * `Ok(false)` - If the cluster is unhealthy
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
