//! The job record shown on the board.

use serde::{Deserialize, Serialize};

use super::status::{JobSource, JobStatus};
use crate::remote::{ProcessedJob, RemoteJob};

/// A job on the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Opaque identifier, stable for the lifetime of the record.
    pub id: String,
    /// Current stage (and therefore column).
    pub status: JobStatus,
    /// Which backing collection owns the row.
    pub source: JobSource,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub applicants: u32,
    pub posted_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

impl JobRecord {
    /// Creates a bare record with empty display attributes.
    pub fn new(id: &str, status: JobStatus, source: JobSource) -> Self {
        Self {
            id: id.to_string(),
            status,
            source,
            title: String::new(),
            company: String::new(),
            salary: None,
            priority: None,
            applicants: 0,
            posted_days: 0,
            description: None,
            requirements: None,
            responsibilities: None,
            benefits: None,
            skills: Vec::new(),
        }
    }

    /// Converts a wire row, normalizing legacy status and source tags.
    pub fn from_remote(row: RemoteJob) -> Self {
        let status = JobStatus::normalize(&row.status, &row.id);
        let source = JobSource::normalize(row.source.as_deref(), &row.id);

        Self {
            status,
            source,
            id: row.id,
            title: row.title,
            company: row.company,
            salary: row.salary,
            priority: row.priority,
            applicants: row.applicants,
            posted_days: row.posted_days,
            description: row.description,
            requirements: row.requirements,
            responsibilities: row.responsibilities,
            benefits: row.benefits,
            skills: row.skills,
        }
    }

    /// Processed-class records have left the "new" stage for good.
    pub fn is_processed_class(&self) -> bool {
        self.source == JobSource::Processed
            || matches!(self.status, JobStatus::Approved | JobStatus::Hiring)
    }

    /// Merges the content fields present in `processed`.
    ///
    /// Identity, status and source belong to the transition that triggered
    /// the merge and are never taken from the payload.
    pub fn merge_processed(&mut self, processed: &ProcessedJob) {
        if let Some(title) = &processed.title {
            self.title = title.clone();
        }
        if processed.description.is_some() {
            self.description = processed.description.clone();
        }
        if processed.requirements.is_some() {
            self.requirements = processed.requirements.clone();
        }
        if processed.responsibilities.is_some() {
            self.responsibilities = processed.responsibilities.clone();
        }
        if processed.benefits.is_some() {
            self.benefits = processed.benefits.clone();
        }
        if let Some(skills) = &processed.skills {
            self.skills = skills.clone();
        }
        if processed.priority.is_some() {
            self.priority = processed.priority.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_remote_normalizes() {
        let row = RemoteJob {
            id: "9".to_string(),
            status: "active".to_string(),
            source: Some("processed".to_string()),
            title: "Chat Support Agent".to_string(),
            applicants: 4,
            ..Default::default()
        };

        let record = JobRecord::from_remote(row);
        assert_eq!(record.status, JobStatus::Hiring);
        assert_eq!(record.source, JobSource::Processed);
        assert_eq!(record.title, "Chat Support Agent");
        assert_eq!(record.applicants, 4);
    }

    #[test]
    fn test_processed_class() {
        let new = JobRecord::new("1", JobStatus::JobRequest, JobSource::Original);
        assert!(!new.is_processed_class());

        let by_source = JobRecord::new("2", JobStatus::JobRequest, JobSource::Processed);
        assert!(by_source.is_processed_class());

        let by_status = JobRecord::new("3", JobStatus::Approved, JobSource::Original);
        assert!(by_status.is_processed_class());
    }

    #[test]
    fn test_merge_keeps_fields_not_returned() {
        let mut record = JobRecord::new("1", JobStatus::Approved, JobSource::Processed);
        record.title = "Old title".to_string();
        record.company = "Acme BPO".to_string();
        record.description = Some("Old description".to_string());

        let processed = ProcessedJob {
            status: Some("closed".to_string()),
            title: Some("Team Lead".to_string()),
            skills: Some(vec!["coaching".to_string()]),
            ..Default::default()
        };
        record.merge_processed(&processed);

        assert_eq!(record.title, "Team Lead");
        assert_eq!(record.skills, vec!["coaching".to_string()]);
        assert_eq!(record.description.as_deref(), Some("Old description"));
        assert_eq!(record.company, "Acme BPO");
        assert_eq!(record.status, JobStatus::Approved);
    }
}
