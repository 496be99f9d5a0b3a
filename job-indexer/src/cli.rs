//! Command line arguments.

use clap::Parser;

use job_indexer_pipeline::loader::{DEFAULT_BASE_BATCH_SIZE, DEFAULT_MAX_BATCH_SIZE};
use job_indexer_pipeline::orchestrator::DEFAULT_DOC_TYPE;
use job_indexer_pipeline::source::DEFAULT_STORAGE_URL;

/// Default search engine address.
pub const DEFAULT_SINK_URL: &str = "localhost:9200";

#[derive(Parser, Debug, Clone)]
#[command(name = "job-indexer")]
#[command(about = "Index the items of a Scrapy Cloud job into a fresh search index", long_about = None)]
pub struct Cli {
    /// Job to index, as organization/project/job
    #[arg(short = 'j', long)]
    pub job_id: String,

    /// Search engine address
    #[arg(short = 'e', long = "elasticsearch", default_value = DEFAULT_SINK_URL)]
    pub sink_url: String,

    /// Index name (defaults to the job id with `/` replaced by `_`)
    #[arg(short = 'i', long = "index")]
    pub index_name: Option<String>,

    /// Document type attached to every item
    #[arg(short = 't', long = "type", default_value = DEFAULT_DOC_TYPE)]
    pub doc_type: String,

    /// Starting batch size for bulk writes
    #[arg(long, default_value_t = DEFAULT_BASE_BATCH_SIZE)]
    pub batch_size: usize,

    /// Largest batch size the sizing may grow to
    #[arg(long, default_value_t = DEFAULT_MAX_BATCH_SIZE)]
    pub max_batch_size: usize,

    /// Send `_type` in bulk requests, for engines that still expect it
    #[arg(long)]
    pub legacy_doc_types: bool,

    /// Index each item as the whole document instead of under a `doc` field
    #[arg(long)]
    pub flat_documents: bool,

    /// Scrapy Cloud storage API address
    #[arg(long, default_value = DEFAULT_STORAGE_URL)]
    pub storage_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["job-indexer", "-j", "1/2/3"]).unwrap();

        assert_eq!(cli.job_id, "1/2/3");
        assert_eq!(cli.sink_url, "localhost:9200");
        assert_eq!(cli.index_name, None);
        assert_eq!(cli.doc_type, "product");
        assert_eq!(cli.batch_size, 5_000);
        assert_eq!(cli.max_batch_size, 20_000);
        assert!(!cli.legacy_doc_types);
        assert!(!cli.flat_documents);
        assert_eq!(cli.storage_url, "https://storage.scrapinghub.com");
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "job-indexer",
            "--job-id",
            "1/2/3",
            "--elasticsearch",
            "http://search:9200",
            "--index",
            "products",
            "--type",
            "offer",
            "--batch-size",
            "1000",
            "--max-batch-size",
            "8000",
            "--legacy-doc-types",
            "--flat-documents",
        ])
        .unwrap();

        assert_eq!(cli.sink_url, "http://search:9200");
        assert_eq!(cli.index_name.as_deref(), Some("products"));
        assert_eq!(cli.doc_type, "offer");
        assert_eq!(cli.batch_size, 1_000);
        assert_eq!(cli.max_batch_size, 8_000);
        assert!(cli.legacy_doc_types);
        assert!(cli.flat_documents);
    }

    #[test]
    fn test_short_flags() {
        let cli =
            Cli::try_parse_from(["job-indexer", "-j", "1/2/3", "-e", "es:9200", "-i", "x", "-t", "y"])
                .unwrap();

        assert_eq!(cli.sink_url, "es:9200");
        assert_eq!(cli.index_name.as_deref(), Some("x"));
        assert_eq!(cli.doc_type, "y");
    }

    #[test]
    fn test_job_id_required() {
        assert!(Cli::try_parse_from(["job-indexer"]).is_err());
    }

    #[test]
    fn test_batch_size_must_be_numeric() {
        assert!(Cli::try_parse_from(["job-indexer", "-j", "1/2/3", "--batch-size", "lots"]).is_err());
    }
}
