//! Bulk API request bodies and response parsing.
//!
//! The bulk endpoint takes newline-delimited JSON: one action line naming the
//! target index, followed by the document source. The source wraps the record
//! under a `doc` field unless flat documents are requested.

use serde_json::{json, Value};

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationResult, BatchOperationSummary};
use job_indexer_shared::IndexAction;

/// Field the record is nested under in the document source.
pub const DOCUMENT_FIELD: &str = "doc";

/// How bulk request lines are shaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkFormat {
    /// Emit `_type` in action lines. Only engines that still use mapping
    /// types (Elasticsearch 6 and older) accept it.
    pub legacy_doc_types: bool,
    /// Send the record itself as the source instead of `{"doc": record}`.
    pub flat_documents: bool,
}

/// Build the action and source lines for a bulk request.
///
/// By default each stored document is `{"doc": <record>}`.
pub fn bulk_lines(actions: &[IndexAction], format: BulkFormat) -> Vec<Value> {
    let mut lines = Vec::with_capacity(actions.len() * 2);

    for action in actions {
        let mut meta = serde_json::Map::new();
        meta.insert("_index".to_string(), json!(action.index));
        if format.legacy_doc_types {
            meta.insert("_type".to_string(), json!(action.doc_type));
        }

        let mut line = serde_json::Map::new();
        line.insert(action.operation.as_str().to_string(), Value::Object(meta));
        lines.push(Value::Object(line));

        let document = Value::Object(action.document.clone());
        if format.flat_documents {
            lines.push(document);
        } else {
            let mut source = serde_json::Map::new();
            source.insert(DOCUMENT_FIELD.to_string(), document);
            lines.push(Value::Object(source));
        }
    }

    lines
}

/// Turn a bulk response body into a per-item summary.
pub fn parse_bulk_response(
    body: &Value,
    submitted: usize,
) -> Result<BatchOperationSummary, SearchIndexError> {
    let has_errors = body.get("errors").and_then(Value::as_bool).unwrap_or(false);

    let items = match body.get("items").and_then(Value::as_array) {
        Some(items) => items,
        None if !has_errors => return Ok(BatchOperationSummary::all_succeeded(submitted)),
        None => {
            return Err(SearchIndexError::parse(
                "bulk response reported errors without an items array",
            ))
        }
    };

    let results = items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            // Each item is keyed by its operation name, e.g. {"index": {...}}
            let outcome = item
                .as_object()
                .and_then(|obj| obj.values().next())
                .cloned()
                .unwrap_or(Value::Null);

            let error = outcome.get("error").map(describe_item_error);
            BatchOperationResult {
                position,
                document_id: outcome
                    .get("_id")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                success: error.is_none(),
                error,
            }
        })
        .collect();

    Ok(BatchOperationSummary::from_results(results))
}

fn describe_item_error(error: &Value) -> String {
    match (
        error.get("type").and_then(Value::as_str),
        error.get("reason").and_then(Value::as_str),
    ) {
        (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
        (Some(kind), None) => kind.to_string(),
        _ => error.to_string(),
    }
}
