//! # Job Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search index a job's items are written into. It includes definitions for
//! errors, the provider interface, a client handling the index lifecycle and
//! bulk writes, and a concrete implementation for OpenSearch.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
#[cfg(any(test, feature = "mock"))]
pub mod memory;
pub mod opensearch;
pub mod types;

pub use client::SearchIndexClient;
pub use config::SearchIndexConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::{BulkFormat, OpenSearchClient};
pub use types::{BatchOperationResult, BatchOperationSummary};
