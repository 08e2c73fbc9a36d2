//! Builders for board records and wire rows.

#![allow(dead_code)]

use jobboard::remote::{ProcessedJob, RemoteJob};
use jobboard::{JobRecord, JobSource, JobStatus};

/// A record still in original storage.
pub fn original(id: &str, status: JobStatus) -> JobRecord {
    JobRecord::new(id, status, JobSource::Original)
}

/// A record in processed storage.
pub fn processed(id: &str, status: JobStatus) -> JobRecord {
    JobRecord::new(id, status, JobSource::Processed)
}

/// A titled record, for checks that display fields survive a move.
pub fn titled(mut record: JobRecord, title: &str, company: &str) -> JobRecord {
    record.title = title.to_string();
    record.company = company.to_string();
    record
}

/// A `GET /jobs` row with raw status and source tags.
pub fn remote_job(id: &str, status: &str, source: Option<&str>) -> RemoteJob {
    RemoteJob {
        id: id.to_string(),
        status: status.to_string(),
        source: source.map(str::to_string),
        title: format!("Job {}", id),
        company: "Acme".to_string(),
        ..RemoteJob::default()
    }
}

/// Processed payload as returned with a promotion.
pub fn processed_payload(id: &str, status: &str) -> ProcessedJob {
    ProcessedJob {
        id: Some(id.to_string()),
        status: Some(status.to_string()),
        source: Some("processed".to_string()),
        ..ProcessedJob::default()
    }
}
