//! Runtime configuration for the job indexer.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;

use crate::cli::Cli;
use crate::IndexingError;

/// Environment variable holding the Scrapy Cloud API key.
pub const API_KEY_VAR: &str = "SH_API_KEY";

/// Everything needed to run one transfer, gathered from the command line and
/// the environment.
#[derive(Debug, Clone)]
pub struct IndexerSettings {
    pub job_id: String,
    pub sink_url: String,
    pub index_name: Option<String>,
    pub doc_type: String,
    pub base_batch_size: usize,
    pub max_batch_size: usize,
    pub legacy_doc_types: bool,
    pub flat_documents: bool,
    pub storage_url: String,
    pub api_key: String,
}

impl IndexerSettings {
    /// Build settings from parsed arguments and `SH_API_KEY`.
    pub fn from_env(cli: Cli) -> Result<Self, IndexingError> {
        Self::with_api_key(cli, env::var(API_KEY_VAR).ok())
    }

    /// Build settings from parsed arguments and an explicit API key.
    pub fn with_api_key(cli: Cli, api_key: Option<String>) -> Result<Self, IndexingError> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| IndexingError::config(format!("{} is not set", API_KEY_VAR)))?;

        Ok(Self {
            job_id: cli.job_id,
            sink_url: cli.sink_url,
            index_name: cli.index_name,
            doc_type: cli.doc_type,
            base_batch_size: cli.batch_size,
            max_batch_size: cli.max_batch_size,
            legacy_doc_types: cli.legacy_doc_types,
            flat_documents: cli.flat_documents,
            storage_url: cli.storage_url,
            api_key,
        })
    }
}
