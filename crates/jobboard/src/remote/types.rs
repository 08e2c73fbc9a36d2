//! Wire shapes exchanged with the job-management service.

use serde::{Deserialize, Serialize};

/// A job row as returned by `GET /jobs`.
///
/// `status` and `source` are kept as raw tags; they are normalized when the
/// row becomes a [`JobRecord`](crate::board::JobRecord).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteJob {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default)]
    pub applicants: u32,
    #[serde(default)]
    pub posted_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

/// Full processed-record fields, used for re-fetch-and-merge.
///
/// Every field is optional: only what the service returns is merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedJob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// Response of `POST /jobs/process`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    #[serde(default)]
    pub original_job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_job: Option<ProcessedJob>,
}

/// Generic acknowledgement. A body with `success: false` is a refusal even
/// under a 2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    /// Returns the refusal message, if this ack is a refusal.
    pub fn refusal(&self) -> Option<String> {
        match self.success {
            Some(false) => Some(
                self.error
                    .clone()
                    .or_else(|| self.message.clone())
                    .unwrap_or_else(|| "request refused".to_string()),
            ),
            _ => None,
        }
    }
}

/// `GET /jobs` answers with either a bare array or `{ "jobs": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum JobList {
    Bare(Vec<RemoteJob>),
    Wrapped { jobs: Vec<RemoteJob> },
}

impl JobList {
    pub fn into_jobs(self) -> Vec<RemoteJob> {
        match self {
            JobList::Bare(jobs) | JobList::Wrapped { jobs } => jobs,
        }
    }
}

/// `GET /processed-jobs/:id` answers with the record or `{ "job": {...} }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProcessedEnvelope {
    Wrapped { job: ProcessedJob },
    Bare(ProcessedJob),
}

impl ProcessedEnvelope {
    pub fn into_job(self) -> ProcessedJob {
        match self {
            ProcessedEnvelope::Wrapped { job } | ProcessedEnvelope::Bare(job) => job,
        }
    }
}
