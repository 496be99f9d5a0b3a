//! Index targets and the bulk write actions sent to the search index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An item scraped by a job. The indexer never looks inside it.
pub type Record = Map<String, Value>;

/// The index a job's items are written into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexTarget {
    /// Index name.
    pub name: String,
    /// Document type attached to every write request.
    pub doc_type: String,
}

impl IndexTarget {
    pub fn new(name: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc_type: doc_type.into(),
        }
    }
}

/// Bulk operation kinds. Only plain indexing is issued by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOperation {
    Index,
}

impl IndexOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexOperation::Index => "index",
        }
    }
}

/// A single write request inside a bulk call.
///
/// Shaped as `{operation, index, type, document}`; how it is laid out on the
/// wire is up to the search index provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexAction {
    pub operation: IndexOperation,
    pub index: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub document: Record,
}

impl IndexAction {
    /// Wrap a record as an index request against the given target.
    pub fn index(target: &IndexTarget, document: Record) -> Self {
        Self {
            operation: IndexOperation::Index,
            index: target.name.clone(),
            doc_type: target.doc_type.clone(),
            document,
        }
    }
}
