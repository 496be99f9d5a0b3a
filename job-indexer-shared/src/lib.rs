//! # Job Indexer Shared
//!
//! Types shared between the source, the pipeline and the search index
//! repository: job identifiers, the opaque item records scraped by a job,
//! index targets and the bulk write actions built from them.

mod action;
mod job;
mod summary;

pub use action::{IndexAction, IndexOperation, IndexTarget, Record};
pub use job::{JobId, JobIdError};
pub use summary::TransferSummary;
