//! Kanban board: job records grouped by stage, moved optimistically.
//!
//! [`JobBoard`] owns the record list. A move is validated, applied locally and
//! sent to the [`JobService`] in one go; if the service does not confirm it,
//! the list goes back to the value it had just before the move. When other
//! changes landed on the list while the move was pending, only the moved
//! record is put back.

pub mod events;
pub mod in_flight;
pub mod optimistic;
pub mod record;
pub mod status;
pub mod transition;

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::config::BoardConfig;
use crate::error::{BoardError, RemoteError, Result};
use crate::remote::{JobService, ProcessedJob};

pub use events::{BoardEvent, BoardEventBroadcaster, BoardEventKind};
pub use in_flight::{InFlight, InFlightGuard};
pub use optimistic::{OptimisticCell, Snapshot};
pub use record::JobRecord;
pub use status::{JobSource, JobStatus};
pub use transition::{plan_move, Rejection, Transition};

/// How an [`JobBoard::attempt_move`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The service confirmed the move.
    Committed,
    /// The service failed or refused; the record is back to its pre-move value.
    RolledBack,
    /// The move was invalid; nothing changed and no request was sent.
    Rejected(Rejection),
    /// Another move on the same record is still pending.
    Busy,
}

/// Records of one column, in board order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub status: JobStatus,
    pub jobs: Vec<JobRecord>,
}

/// Number of records per column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCounts {
    pub job_request: usize,
    pub approved: usize,
    pub hiring: usize,
    pub closed: usize,
}

impl BoardCounts {
    pub fn total(&self) -> usize {
        self.job_request + self.approved + self.hiring + self.closed
    }
}

enum Refusal {
    Rejected(Rejection),
    Busy,
}

/// Puts `job_id` back to its value in `before`, leaving every other record
/// as it is now. A record missing from the list is re-inserted at its old
/// position.
fn restore_record(records: &mut Vec<JobRecord>, before: Vec<JobRecord>, job_id: &str) {
    let Some((position, previous)) = before
        .into_iter()
        .enumerate()
        .find(|(_, r)| r.id == job_id)
    else {
        return;
    };
    match records.iter_mut().find(|r| r.id == job_id) {
        Some(current) => *current = previous,
        None => records.insert(position.min(records.len()), previous),
    }
}

/// Owns the board's records and reconciles moves with the remote service.
pub struct JobBoard {
    records: OptimisticCell<Vec<JobRecord>>,
    service: Arc<dyn JobService>,
    in_flight: InFlight,
    events: BoardEventBroadcaster,
    default_priority: String,
}

impl JobBoard {
    /// Creates an empty board with default settings.
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self::with_config(service, &BoardConfig::default())
    }

    pub fn with_config(service: Arc<dyn JobService>, config: &BoardConfig) -> Self {
        Self {
            records: OptimisticCell::new(Vec::new()),
            service,
            in_flight: InFlight::new(),
            events: BoardEventBroadcaster::new(config.event_capacity),
            default_priority: config.default_priority.clone(),
        }
    }

    /// Creates a board seeded with `records`.
    pub fn from_records(service: Arc<dyn JobService>, records: Vec<JobRecord>) -> Self {
        let board = Self::new(service);
        board.replace_all(records);
        board
    }

    /// Replaces every record. Duplicate ids keep their first occurrence.
    pub fn replace_all(&self, records: Vec<JobRecord>) -> usize {
        let mut seen = HashSet::new();
        let records: Vec<JobRecord> = records
            .into_iter()
            .filter(|r| {
                let fresh = seen.insert(r.id.clone());
                if !fresh {
                    warn!("Duplicate job id {} dropped from the board", r.id);
                }
                fresh
            })
            .collect();
        let count = records.len();
        self.records.replace(records);
        count
    }

    /// Fetches every job from the service and replaces the board with it.
    pub async fn load(&self) -> Result<usize> {
        let rows = self.service.list_jobs().await?;
        let count = self.replace_all(rows.into_iter().map(JobRecord::from_remote).collect());
        info!("Loaded {} jobs onto the board", count);
        self.events.send(BoardEvent::new(BoardEventKind::Loaded, ""));
        Ok(count)
    }

    pub fn records(&self) -> Vec<JobRecord> {
        self.records.get()
    }

    pub fn get(&self, job_id: &str) -> Option<JobRecord> {
        self.records
            .read(|records| records.iter().find(|r| r.id == job_id).cloned())
    }

    pub fn len(&self) -> usize {
        self.records.read(|records| records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records currently shown in `status`'s column.
    pub fn column(&self, status: JobStatus) -> Vec<JobRecord> {
        self.records.read(|records| {
            records
                .iter()
                .filter(|r| r.status == status)
                .cloned()
                .collect()
        })
    }

    pub fn columns(&self) -> Vec<ColumnView> {
        let records = self.records.get();
        JobStatus::COLUMNS
            .iter()
            .map(|&status| ColumnView {
                status,
                jobs: records.iter().filter(|r| r.status == status).cloned().collect(),
            })
            .collect()
    }

    pub fn counts(&self) -> BoardCounts {
        self.records.read(|records| {
            let mut counts = BoardCounts::default();
            for record in records {
                match record.status {
                    JobStatus::JobRequest => counts.job_request += 1,
                    JobStatus::Approved => counts.approved += 1,
                    JobStatus::Hiring => counts.hiring += 1,
                    JobStatus::Closed => counts.closed += 1,
                }
            }
            counts
        })
    }

    /// True while a move or delete on `job_id` awaits the service.
    pub fn is_busy(&self, job_id: &str) -> bool {
        self.in_flight.is_busy(job_id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Moves `job_id` to `destination`, optimistically.
    ///
    /// Never fails: the record ends either committed or rolled back to its
    /// value from just before the move. Invalid moves change nothing and send
    /// nothing.
    pub async fn attempt_move(&self, job_id: &str, destination: JobStatus) -> MoveOutcome {
        let span = tracing::info_span!("board.move", job_id = %job_id, to = %destination);
        self.run_move(job_id, destination).instrument(span).await
    }

    async fn run_move(&self, job_id: &str, destination: JobStatus) -> MoveOutcome {
        // Validation, claim and optimistic mutation share one lock acquisition.
        let prepared = self.records.try_apply(|records| {
            let record = records
                .iter_mut()
                .find(|r| r.id == job_id)
                .ok_or(Refusal::Rejected(Rejection::NotFound))?;
            let transition = plan_move(record, destination).map_err(Refusal::Rejected)?;
            let guard = self.in_flight.try_claim(job_id).ok_or(Refusal::Busy)?;
            let from = record.status;
            transition.apply(record, &self.default_priority);
            Ok::<_, Refusal>((transition, from, guard))
        });

        let ((transition, from, _guard), snapshot) = match prepared {
            Ok(prepared) => prepared,
            Err(Refusal::Rejected(reason)) => {
                debug!("Move of job {} to {} rejected: {}", job_id, destination, reason);
                return MoveOutcome::Rejected(reason);
            }
            Err(Refusal::Busy) => {
                debug!("Move of job {} to {} skipped: job is busy", job_id, destination);
                return MoveOutcome::Busy;
            }
        };

        let to = transition.target();
        self.events.send(BoardEvent::moved(
            BoardEventKind::MoveApplied,
            job_id,
            from,
            to,
        ));

        let effect = self.send_transition(job_id, transition);
        let restore = |records: &mut Vec<JobRecord>, before: Vec<JobRecord>| {
            restore_record(records, before, job_id)
        };
        match self.records.reconcile(snapshot, effect, restore).await {
            Ok(processed) => {
                self.confirm(job_id, transition, processed.as_ref());
                info!("Moved job {} from {} to {}", job_id, from, to);
                self.events.send(BoardEvent::moved(
                    BoardEventKind::MoveCommitted,
                    job_id,
                    from,
                    to,
                ));

                if transition.refetches() {
                    let processed_id = processed
                        .as_ref()
                        .and_then(|p| p.id.as_deref())
                        .unwrap_or(job_id);
                    self.enrich(job_id, processed_id).await;
                }
                MoveOutcome::Committed
            }
            Err(e) => {
                error!(
                    "Move of job {} from {} to {} failed, rolled back: {}",
                    job_id, from, to, e
                );
                self.events.send(
                    BoardEvent::moved(BoardEventKind::MoveRolledBack, job_id, from, to)
                        .with_error(&e),
                );
                MoveOutcome::RolledBack
            }
        }
    }

    /// Issues the primary remote call for `transition`.
    async fn send_transition(
        &self,
        job_id: &str,
        transition: Transition,
    ) -> std::result::Result<Option<ProcessedJob>, RemoteError> {
        match transition {
            Transition::Promote { activate } => {
                let response = self.service.process_job(job_id, activate).await?;
                if !response.original_job_id.is_empty() && response.original_job_id != job_id {
                    warn!(
                        "Process response for job {} names original job {}",
                        job_id, response.original_job_id
                    );
                }
                Ok(response.processed_job)
            }
            Transition::StatusMove { to } => {
                self.service.move_job(job_id, to).await?;
                Ok(None)
            }
            Transition::ProcessedUpdate { .. } | Transition::Close => {
                let target = transition.target();
                let Some(tag) = target.processed_tag() else {
                    return Err(RemoteError::rejected(
                        "update processed job",
                        format!("{} has no processed status", target),
                    ));
                };
                self.service.update_processed_job(job_id, tag).await?;
                Ok(None)
            }
        }
    }

    /// Re-asserts the confirmed state on the record and merges any processed
    /// payload returned with the confirmation.
    fn confirm(&self, job_id: &str, transition: Transition, processed: Option<&ProcessedJob>) {
        let found = self.records.update(|records| {
            let Some(record) = records.iter_mut().find(|r| r.id == job_id) else {
                return false;
            };
            transition.apply(record, &self.default_priority);
            if let Some(processed) = processed {
                record.merge_processed(processed);
            }
            true
        });
        if !found {
            warn!("Job {} left the board before its move was confirmed", job_id);
        }
    }

    /// Best-effort merge of the full processed record. Failures are logged
    /// and reported as events; the move stays committed.
    async fn enrich(&self, job_id: &str, processed_id: &str) {
        match self.service.get_processed_job(processed_id).await {
            Ok(processed) => {
                let merged = self.records.update(|records| {
                    records
                        .iter_mut()
                        .find(|r| r.id == job_id)
                        .map(|record| record.merge_processed(&processed))
                        .is_some()
                });
                if merged {
                    debug!("Merged processed fields into job {}", job_id);
                } else {
                    debug!("Job {} left the board before enrichment", job_id);
                }
            }
            Err(e) => {
                warn!("Enrichment of job {} skipped: {}", job_id, e);
                self.events.send(
                    BoardEvent::new(BoardEventKind::EnrichmentSkipped, job_id).with_error(&e),
                );
            }
        }
    }

    /// Removes `job_id` locally and asks the service to delete it.
    ///
    /// Unlike moves, failures are returned: the record is restored and the
    /// caller gets the remote error.
    pub async fn delete(&self, job_id: &str) -> Result<()> {
        let span = tracing::info_span!("board.delete", job_id = %job_id);
        self.run_delete(job_id).instrument(span).await
    }

    async fn run_delete(&self, job_id: &str) -> Result<()> {
        let (_guard, snapshot) = self.records.try_apply(|records| {
            let position = records
                .iter()
                .position(|r| r.id == job_id)
                .ok_or_else(|| BoardError::JobNotFound(job_id.to_string()))?;
            let guard = self
                .in_flight
                .try_claim(job_id)
                .ok_or_else(|| BoardError::JobBusy(job_id.to_string()))?;
            records.remove(position);
            Ok::<_, BoardError>(guard)
        })?;

        let effect = self.service.delete_job(job_id);
        let restore = |records: &mut Vec<JobRecord>, before: Vec<JobRecord>| {
            restore_record(records, before, job_id)
        };
        match self.records.reconcile(snapshot, effect, restore).await {
            Ok(()) => {
                info!("Deleted job {}", job_id);
                self.events
                    .send(BoardEvent::new(BoardEventKind::Deleted, job_id));
                Ok(())
            }
            Err(e) => {
                error!("Delete of job {} failed, restored: {}", job_id, e);
                self.events.send(
                    BoardEvent::new(BoardEventKind::DeleteRolledBack, job_id).with_error(&e),
                );
                Err(e.into())
            }
        }
    }
}
