//! Job metadata as returned by the job storage service.

use serde_json::Value;

use crate::errors::PipelineError;

/// Metadata category holding the crawler's statistics.
pub const SCRAPY_STATS_CATEGORY: &str = "scrapystats";

/// Statistics field with the number of items the job scraped.
pub const ITEM_SCRAPED_COUNT: &str = "item_scraped_count";

/// A job's metadata: ordered `(category, data)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobMetadata {
    entries: Vec<(String, Value)>,
}

impl JobMetadata {
    pub fn new(entries: Vec<(String, Value)>) -> Self {
        Self { entries }
    }

    /// Build metadata from a JSON response body.
    ///
    /// Accepts either an object or an array of objects; every top-level key
    /// becomes one entry.
    pub fn from_value(value: Value) -> Result<Self, PipelineError> {
        let objects = match value {
            Value::Object(map) => vec![map],
            Value::Array(values) => values
                .into_iter()
                .map(|v| match v {
                    Value::Object(map) => Ok(map),
                    other => Err(PipelineError::parse(format!(
                        "expected metadata object, got {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            other => {
                return Err(PipelineError::parse(format!(
                    "expected metadata object, got {}",
                    other
                )))
            }
        };

        Ok(Self {
            entries: objects.into_iter().flatten().collect(),
        })
    }

    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Data stored under a category, first match wins.
    pub fn get(&self, category: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, data)| data)
    }

    /// Total number of items the job scraped, from its crawler statistics.
    pub fn item_scraped_count(&self) -> Option<u64> {
        self.get(SCRAPY_STATS_CATEGORY)?
            .get(ITEM_SCRAPED_COUNT)?
            .as_u64()
    }
}
