//! # Job Indexer Pipeline
//!
//! This crate provides the pipeline components for reading a Scrapy Cloud
//! job's items and indexing them into OpenSearch.
//!
//! ## Architecture
//!
//! The pipeline follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Reads job metadata and streams the job's items
//! 2. **Processor**: Wraps items into index write requests
//! 3. **Loader**: Batches requests and writes them in bulk
//! 4. **Orchestrator**: Recreates the index and drives one pass over the items

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod source;

pub use errors::PipelineError;
pub use loader::{compute_batch_size, BulkLoader, LoaderConfig};
pub use orchestrator::{PipelineConfig, TransferPipeline};
pub use processor::RecordProcessor;
pub use source::{JobMetadata, JobSource, ScrapyCloudClient, SourceConfig};
