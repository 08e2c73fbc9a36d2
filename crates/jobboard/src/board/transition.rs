//! Transition matrix for drag-and-drop moves.

use serde::Serialize;

use super::record::JobRecord;
use super::status::{JobSource, JobStatus};

/// Why a move was refused before anything was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    NotFound,
    /// Closed records never move again.
    Closed,
    /// Processed records never return to `job-request`.
    ReturnToNew,
    /// `closed` is only reachable from `hiring`.
    CloseRequiresHiring,
    /// Processed record dropped back on its own column.
    SameColumn,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Rejection::NotFound => "record not on the board",
            Rejection::Closed => "record is closed",
            Rejection::ReturnToNew => "processed records cannot return to job-request",
            Rejection::CloseRequiresHiring => "only hiring records can be closed",
            Rejection::SameColumn => "record is already in that column",
        };
        f.write_str(text)
    }
}

/// What a valid move does locally and remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Original record enters processed storage, as `approved` or directly
    /// as `hiring` when `activate` is set.
    Promote { activate: bool },
    /// Original record changes status without leaving original storage.
    StatusMove { to: JobStatus },
    /// Processed record moves between `approved` and `hiring`.
    ProcessedUpdate { to: JobStatus },
    /// Processed `hiring` record becomes `closed`.
    Close,
}

impl Transition {
    /// Stage the record shows once the move is applied.
    pub fn target(&self) -> JobStatus {
        match self {
            Transition::Promote { activate: true } => JobStatus::Hiring,
            Transition::Promote { activate: false } => JobStatus::Approved,
            Transition::StatusMove { to } | Transition::ProcessedUpdate { to } => *to,
            Transition::Close => JobStatus::Closed,
        }
    }

    /// Whether a successful move is followed by a best-effort re-fetch of
    /// the processed record.
    pub fn refetches(&self) -> bool {
        matches!(
            self,
            Transition::Promote { activate: false } | Transition::ProcessedUpdate { .. }
        )
    }

    /// Applies the optimistic local effect to `record`.
    pub fn apply(&self, record: &mut JobRecord, default_priority: &str) {
        match self {
            Transition::Promote { .. } => {
                record.source = JobSource::Processed;
                record.status = self.target();
                if record.priority.as_deref().map_or(true, str::is_empty) {
                    record.priority = Some(default_priority.to_string());
                }
            }
            Transition::StatusMove { to } => record.status = *to,
            Transition::ProcessedUpdate { to } => {
                record.status = *to;
                record.source = JobSource::Processed;
            }
            Transition::Close => record.status = JobStatus::Closed,
        }
    }
}

/// Validates a move of `record` to `destination`.
///
/// Checks run in a fixed order and stop at the first failure.
pub fn plan_move(record: &JobRecord, destination: JobStatus) -> Result<Transition, Rejection> {
    if record.status.is_terminal() {
        return Err(Rejection::Closed);
    }

    let processed = record.is_processed_class();

    if processed && destination == JobStatus::JobRequest {
        return Err(Rejection::ReturnToNew);
    }

    if destination == JobStatus::Closed && record.status != JobStatus::Hiring {
        return Err(Rejection::CloseRequiresHiring);
    }

    if !processed {
        // Only non-terminal original stage left is job-request.
        return Ok(match destination {
            JobStatus::Approved => Transition::Promote { activate: false },
            JobStatus::Hiring => Transition::Promote { activate: true },
            other => Transition::StatusMove { to: other },
        });
    }

    match (record.status, destination) {
        (JobStatus::Hiring, JobStatus::Closed) => Ok(Transition::Close),
        (from, to) if from == to => Err(Rejection::SameColumn),
        (_, to) => Ok(Transition::ProcessedUpdate { to }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: JobStatus, source: JobSource) -> JobRecord {
        JobRecord::new("r", status, source)
    }

    #[test]
    fn test_closed_rejects_every_destination() {
        for source in [JobSource::Original, JobSource::Processed] {
            let closed = record(JobStatus::Closed, source);
            for dest in JobStatus::COLUMNS {
                assert_eq!(plan_move(&closed, dest), Err(Rejection::Closed));
            }
        }
    }

    #[test]
    fn test_processed_class_never_returns_to_new() {
        let cases = [
            record(JobStatus::Approved, JobSource::Processed),
            record(JobStatus::Hiring, JobSource::Processed),
            record(JobStatus::Approved, JobSource::Original),
            record(JobStatus::JobRequest, JobSource::Processed),
        ];
        for rec in &cases {
            assert_eq!(
                plan_move(rec, JobStatus::JobRequest),
                Err(Rejection::ReturnToNew),
                "{:?}",
                rec
            );
        }
    }

    #[test]
    fn test_close_only_from_hiring() {
        for status in [JobStatus::JobRequest, JobStatus::Approved] {
            for source in [JobSource::Original, JobSource::Processed] {
                assert_eq!(
                    plan_move(&record(status, source), JobStatus::Closed),
                    Err(Rejection::CloseRequiresHiring)
                );
            }
        }
        assert_eq!(
            plan_move(&record(JobStatus::Hiring, JobSource::Processed), JobStatus::Closed),
            Ok(Transition::Close)
        );
    }

    #[test]
    fn test_original_transitions() {
        let rec = record(JobStatus::JobRequest, JobSource::Original);
        assert_eq!(
            plan_move(&rec, JobStatus::Approved),
            Ok(Transition::Promote { activate: false })
        );
        assert_eq!(
            plan_move(&rec, JobStatus::Hiring),
            Ok(Transition::Promote { activate: true })
        );
        assert_eq!(
            plan_move(&rec, JobStatus::JobRequest),
            Ok(Transition::StatusMove {
                to: JobStatus::JobRequest
            })
        );
    }

    #[test]
    fn test_processed_transitions() {
        let approved = record(JobStatus::Approved, JobSource::Processed);
        assert_eq!(
            plan_move(&approved, JobStatus::Hiring),
            Ok(Transition::ProcessedUpdate {
                to: JobStatus::Hiring
            })
        );
        assert_eq!(
            plan_move(&approved, JobStatus::Approved),
            Err(Rejection::SameColumn)
        );

        let hiring = record(JobStatus::Hiring, JobSource::Processed);
        assert_eq!(
            plan_move(&hiring, JobStatus::Approved),
            Ok(Transition::ProcessedUpdate {
                to: JobStatus::Approved
            })
        );
    }

    #[test]
    fn test_promote_applies_defaults() {
        let mut rec = record(JobStatus::JobRequest, JobSource::Original);
        Transition::Promote { activate: false }.apply(&mut rec, "medium");
        assert_eq!(rec.source, JobSource::Processed);
        assert_eq!(rec.status, JobStatus::Approved);
        assert_eq!(rec.priority.as_deref(), Some("medium"));

        let mut urgent = record(JobStatus::JobRequest, JobSource::Original);
        urgent.priority = Some("high".to_string());
        Transition::Promote { activate: true }.apply(&mut urgent, "medium");
        assert_eq!(urgent.status, JobStatus::Hiring);
        assert_eq!(urgent.priority.as_deref(), Some("high"));
    }

    #[test]
    fn test_refetch_policy() {
        assert!(Transition::Promote { activate: false }.refetches());
        assert!(!Transition::Promote { activate: true }.refetches());
        assert!(Transition::ProcessedUpdate {
            to: JobStatus::Hiring
        }
        .refetches());
        assert!(!Transition::Close.refetches());
        assert!(!Transition::StatusMove {
            to: JobStatus::JobRequest
        }
        .refetches());
    }
}
