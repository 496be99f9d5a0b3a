//! Record processor implementation.
//!
//! Turns items read from the source into index actions for the loader.

use job_indexer_shared::{IndexAction, IndexTarget, Record};

/// Wraps each record as an index request tagged with the target index and
/// document type. Record contents pass through untouched.
#[derive(Debug, Clone)]
pub struct RecordProcessor {
    target: IndexTarget,
}

impl RecordProcessor {
    pub fn new(target: IndexTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &IndexTarget {
        &self.target
    }

    /// Wrap a single record.
    pub fn process(&self, record: Record) -> IndexAction {
        IndexAction::index(&self.target, record)
    }
}
