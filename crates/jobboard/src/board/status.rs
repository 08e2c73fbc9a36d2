//! Board stages and record provenance.

use serde::{Deserialize, Serialize};

/// Stage of a job on the board. Each stage is also a column id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    /// New, unprocessed request.
    JobRequest,
    /// Reviewed and processed, not yet hiring.
    Approved,
    /// Actively hiring.
    Hiring,
    /// Terminal.
    Closed,
}

impl JobStatus {
    /// Board columns in display order.
    pub const COLUMNS: [JobStatus; 4] = [
        JobStatus::JobRequest,
        JobStatus::Approved,
        JobStatus::Hiring,
        JobStatus::Closed,
    ];

    /// Canonical column id.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::JobRequest => "job-request",
            JobStatus::Approved => "approved",
            JobStatus::Hiring => "hiring",
            JobStatus::Closed => "closed",
        }
    }

    /// Parses a canonical column id or one of its legacy synonyms.
    pub fn parse(tag: &str) -> Option<JobStatus> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "job-request" | "inactive" => Some(JobStatus::JobRequest),
            "approved" | "processed" => Some(JobStatus::Approved),
            "hiring" | "active" => Some(JobStatus::Hiring),
            "closed" => Some(JobStatus::Closed),
            _ => None,
        }
    }

    /// Normalizes a raw status tag read from the remote service.
    ///
    /// Unknown tags land in `job-request`, the one stage that grants no
    /// extra transitions.
    pub fn normalize(tag: &str, job_id: &str) -> JobStatus {
        JobStatus::parse(tag).unwrap_or_else(|| {
            log::warn!(
                "Unknown job status '{}' for job {}, defaulting to job-request",
                tag,
                job_id
            );
            JobStatus::JobRequest
        })
    }

    /// Lifecycle tag used by the processed-jobs endpoint.
    /// `job-request` has no processed representation.
    pub fn processed_tag(&self) -> Option<&'static str> {
        match self {
            JobStatus::JobRequest => None,
            JobStatus::Approved => Some("processed"),
            JobStatus::Hiring => Some("active"),
            JobStatus::Closed => Some("closed"),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Closed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::parse(s).ok_or_else(|| {
            format!(
                "unknown column '{}' (expected job-request, approved, hiring or closed)",
                s
            )
        })
    }
}

/// Which backing collection owns the authoritative row.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobSource {
    #[default]
    Original,
    Processed,
}

impl JobSource {
    pub fn normalize(tag: Option<&str>, job_id: &str) -> JobSource {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("original") => JobSource::Original,
            Some("processed") => JobSource::Processed,
            Some(other) => {
                log::warn!(
                    "Unknown job source '{}' for job {}, defaulting to original",
                    other,
                    job_id
                );
                JobSource::Original
            }
        }
    }
}
