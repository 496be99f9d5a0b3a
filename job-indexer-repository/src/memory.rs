//! In-memory search index provider.
//!
//! Keeps indices and their documents in a `HashMap` so pipeline behaviour can
//! be exercised without a running search engine. Clones share state, which lets
//! a test keep a handle on the index while the client owns another.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BatchOperationResult, BatchOperationSummary};
use job_indexer_shared::{IndexAction, Record};

#[derive(Debug, Default)]
struct MemoryState {
    indices: HashMap<String, Vec<Record>>,
    operations: Vec<String>,
    bulk_sizes: Vec<usize>,
    fail_bulk_call: Option<usize>,
    reject_bulk: bool,
}

/// Search index provider backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySearchIndex {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an index with documents.
    pub async fn seed(&self, index: &str, documents: Vec<Record>) {
        self.state
            .lock()
            .await
            .indices
            .insert(index.to_string(), documents);
    }

    /// Make the bulk call with the given 1-based number report its last item as failed.
    pub async fn fail_bulk_call(&self, call: usize) {
        self.state.lock().await.fail_bulk_call = Some(call);
    }

    /// Make every bulk call fail at the transport level.
    pub async fn reject_bulk(&self) {
        self.state.lock().await.reject_bulk = true;
    }

    /// Names of all existing indices, sorted.
    pub async fn index_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().await.indices.keys().cloned().collect();
        names.sort();
        names
    }

    /// Documents stored in an index, or `None` if it does not exist.
    pub async fn documents(&self, index: &str) -> Option<Vec<Record>> {
        self.state.lock().await.indices.get(index).cloned()
    }

    /// Sizes of every bulk call received, in order.
    pub async fn bulk_sizes(&self) -> Vec<usize> {
        self.state.lock().await.bulk_sizes.clone()
    }

    /// Log of index-level operations such as `delete:name`, in order.
    pub async fn operations(&self) -> Vec<String> {
        self.state.lock().await.operations.clone()
    }
}

#[async_trait]
impl SearchIndexProvider for MemorySearchIndex {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let mut state = self.state.lock().await;
        state.operations.push(format!("exists:{}", index));
        Ok(state.indices.contains_key(index))
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().await;
        state.operations.push(format!("delete:{}", index));
        state.indices.remove(index);
        Ok(())
    }

    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().await;
        state.operations.push(format!("create:{}", index));
        if state.indices.contains_key(index) {
            return Err(SearchIndexError::index_setup(format!(
                "resource_already_exists_exception: index [{}] already exists",
                index
            )));
        }
        state.indices.insert(index.to_string(), Vec::new());
        Ok(())
    }

    async fn bulk_index(
        &self,
        actions: &[IndexAction],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let mut state = self.state.lock().await;
        if state.reject_bulk {
            return Err(SearchIndexError::bulk_operation("bulk endpoint unavailable"));
        }

        state.bulk_sizes.push(actions.len());
        let call = state.bulk_sizes.len();
        let failing = state.fail_bulk_call == Some(call);

        let mut results = Vec::with_capacity(actions.len());
        for (position, action) in actions.iter().enumerate() {
            if failing && position + 1 == actions.len() {
                results.push(BatchOperationResult {
                    position,
                    document_id: None,
                    success: false,
                    error: Some("mapper_parsing_exception".to_string()),
                });
                continue;
            }

            let documents = state.indices.entry(action.index.clone()).or_default();
            documents.push(action.document.clone());
            results.push(BatchOperationResult {
                position,
                document_id: Some(format!("{}-{}", action.index, documents.len())),
                success: true,
                error: None,
            });
        }

        Ok(BatchOperationSummary::from_results(results))
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        Ok(true)
    }
}
