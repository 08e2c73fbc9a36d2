//! Job listing and board operations.

use jobboard::{
    BoardCounts, BoardEventKind, ColumnView, JobBoard, JobRecord, JobStatus, MoveOutcome,
};
use serde::Serialize;
use tokio::sync::broadcast::error::TryRecvError;

use super::ApiResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsResponse {
    pub columns: Vec<ColumnView>,
    pub counts: BoardCounts,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub job_id: String,
    pub to: JobStatus,
    pub outcome: MoveOutcome,
    /// The record after the move settled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub job_id: String,
}

pub fn list_jobs(board: &JobBoard) -> ApiResponse<Vec<JobRecord>> {
    ApiResponse::ok(board.records())
}

pub fn get_columns(board: &JobBoard) -> ApiResponse<ColumnsResponse> {
    ApiResponse::ok(ColumnsResponse {
        columns: board.columns(),
        counts: board.counts(),
    })
}

pub async fn move_job(board: &JobBoard, job_id: &str, to: JobStatus) -> ApiResponse<MoveResponse> {
    let mut events = board.subscribe();
    let outcome = board.attempt_move(job_id, to).await;

    let response = MoveResponse {
        job_id: job_id.to_string(),
        to,
        outcome,
        job: board.get(job_id),
    };

    match outcome {
        MoveOutcome::Committed => ApiResponse::ok(response),
        MoveOutcome::RolledBack => {
            let reason = loop {
                match events.try_recv() {
                    Ok(event)
                        if event.kind == BoardEventKind::MoveRolledBack
                            && event.job_id == job_id =>
                    {
                        break event.error;
                    }
                    Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break None,
                }
            };
            let reason = reason.unwrap_or_else(|| "Move was rolled back".to_string());
            ApiResponse::failed(response, reason)
        }
        MoveOutcome::Rejected(reason) => {
            ApiResponse::failed(response, format!("Move rejected: {}", reason))
        }
        MoveOutcome::Busy => ApiResponse::failed(response, "Job has a move in flight"),
    }
}

pub async fn delete_job(board: &JobBoard, job_id: &str) -> ApiResponse<DeleteResponse> {
    match board.delete(job_id).await {
        Ok(()) => ApiResponse::ok(DeleteResponse {
            job_id: job_id.to_string(),
        }),
        Err(e) => ApiResponse::err(e.to_string()),
    }
}
