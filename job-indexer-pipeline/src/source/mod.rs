//! Source module for the job indexer pipeline.
//!
//! Provides access to a job's metadata and a lazy, one-pass stream of the
//! items it scraped.

mod job_source;
mod metadata;
mod scrapy_cloud;

#[cfg(test)]
pub(crate) mod memory;

pub use job_source::JobSource;
pub use metadata::{JobMetadata, ITEM_SCRAPED_COUNT, SCRAPY_STATS_CATEGORY};
pub use scrapy_cloud::{ScrapyCloudClient, SourceConfig, DEFAULT_PAGE_SIZE, DEFAULT_STORAGE_URL};
