//! Error types for the job indexer repository.

mod search_index_error;

pub use search_index_error::SearchIndexError;
