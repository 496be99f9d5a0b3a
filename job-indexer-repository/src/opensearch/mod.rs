//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch (or a compatible Elasticsearch) as the backend.

mod bulk;
mod client;

pub use bulk::{BulkFormat, DOCUMENT_FIELD};
pub use client::{normalize_url, OpenSearchClient};
