//! Job identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobIdError {
    /// The identifier was empty or only whitespace.
    #[error("job id is empty")]
    Empty,

    /// The identifier did not have the `organization/project/job` shape.
    #[error("job id '{0}' must have the form organization/project/job")]
    Malformed(String),
}

/// Composite key of a scraping job: `organization/project/job`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId {
    organization: String,
    project: String,
    job: String,
}

impl JobId {
    /// Parse a slash-delimited job identifier.
    pub fn parse(raw: &str) -> Result<Self, JobIdError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(JobIdError::Empty);
        }

        let parts: Vec<&str> = raw.split('/').collect();
        match parts.as_slice() {
            [organization, project, job]
                if !organization.is_empty() && !project.is_empty() && !job.is_empty() =>
            {
                Ok(Self {
                    organization: organization.to_string(),
                    project: project.to_string(),
                    job: job.to_string(),
                })
            }
            _ => Err(JobIdError::Malformed(raw.to_string())),
        }
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    /// Index name derived from the job key, with `/` replaced by `_`.
    pub fn default_index_name(&self) -> String {
        format!("{}_{}_{}", self.organization, self.project, self.job)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.organization, self.project, self.job)
    }
}

impl FromStr for JobId {
    type Err = JobIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for JobId {
    type Error = JobIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.to_string()
    }
}
