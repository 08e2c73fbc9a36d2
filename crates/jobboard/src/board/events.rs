//! Board event broadcaster for re-rendering and user feedback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::status::JobStatus;

/// What happened on the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoardEventKind {
    /// The record list was replaced from the remote service.
    Loaded,
    /// An optimistic move was applied locally.
    MoveApplied,
    /// The remote service confirmed a move.
    MoveCommitted,
    /// The remote call failed and the board was restored.
    MoveRolledBack,
    /// A committed move could not be enriched with processed fields.
    EnrichmentSkipped,
    Deleted,
    DeleteRolledBack,
}

/// Event emitted by [`JobBoard`](super::JobBoard).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEvent {
    pub kind: BoardEventKind,
    /// Affected record; empty for board-wide events.
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl BoardEvent {
    pub fn new(kind: BoardEventKind, job_id: &str) -> Self {
        Self {
            kind,
            job_id: job_id.to_string(),
            from: None,
            to: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn moved(kind: BoardEventKind, job_id: &str, from: JobStatus, to: JobStatus) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::new(kind, job_id)
        }
    }

    pub fn with_error(mut self, error: impl std::fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Broadcasts board events to any number of subscribers.
#[derive(Clone)]
pub struct BoardEventBroadcaster {
    sender: Arc<broadcast::Sender<BoardEvent>>,
}

impl BoardEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, event: BoardEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.sender.subscribe()
    }
}

impl Default for BoardEventBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}
