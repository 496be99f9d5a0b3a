//! Response types for search index operations.

/// Result of a batch operation for a single item.
///
/// Represents the outcome of one write request within a bulk call, identified
/// by its position in the submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOperationResult {
    /// Position of the item in the submitted batch.
    pub position: usize,
    /// Document id assigned by the search engine, when reported.
    pub document_id: Option<String>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error reason if the operation failed.
    pub error: Option<String>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Lets callers see partial failures inside a bulk call that otherwise
/// completed at the transport level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// A summary where every one of `total` items succeeded.
    pub fn all_succeeded(total: usize) -> Self {
        Self {
            total,
            succeeded: total,
            failed: 0,
            results: (0..total)
                .map(|position| BatchOperationResult {
                    position,
                    document_id: None,
                    success: true,
                    error: None,
                })
                .collect(),
        }
    }

    /// Build a summary from individual results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// The first reported failure reason, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.results
            .iter()
            .find(|r| !r.success)
            .and_then(|r| r.error.as_deref())
    }
}
