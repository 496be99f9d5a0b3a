//! Processor module for the job indexer pipeline.
//!
//! Wraps scraped items into bulk write requests.

mod record_processor;

pub use record_processor::RecordProcessor;
