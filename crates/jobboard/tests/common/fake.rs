//! Recording in-memory `JobService`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jobboard::remote::{JobService, ProcessResponse, ProcessedJob, RemoteJob};
use jobboard::{JobStatus, RemoteError};
use tokio::sync::Notify;

use super::builders::processed_payload;

/// One call received by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Move { id: String, to: JobStatus },
    Process { id: String, activate: bool },
    GetProcessed { id: String },
    UpdateProcessed { id: String, status: String },
    Delete { id: String },
}

impl Call {
    fn operation(&self) -> &'static str {
        match self {
            Call::List => "list_jobs",
            Call::Move { .. } => "move_job",
            Call::Process { .. } => "process_job",
            Call::GetProcessed { .. } => "get_processed_job",
            Call::UpdateProcessed { .. } => "update_processed_job",
            Call::Delete { .. } => "delete_job",
        }
    }

    fn job_id(&self) -> Option<&str> {
        match self {
            Call::List => None,
            Call::Move { id, .. }
            | Call::Process { id, .. }
            | Call::GetProcessed { id }
            | Call::UpdateProcessed { id, .. }
            | Call::Delete { id } => Some(id),
        }
    }
}

/// In-memory service with scripted failures.
///
/// Failures are keyed by trait method name (`"move_job"`, `"process_job"`,
/// ...). A gate set for an id holds mutating calls on that id until notified.
#[derive(Default)]
pub struct FakeJobService {
    jobs: Mutex<Vec<RemoteJob>>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, RemoteError>>,
    processed: Mutex<HashMap<String, ProcessedJob>>,
    process_responses: Mutex<HashMap<String, ProcessResponse>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeJobService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_jobs(jobs: Vec<RemoteJob>) -> Arc<Self> {
        let service = Self::default();
        *service.jobs.lock().unwrap() = jobs;
        Arc::new(service)
    }

    /// Makes every call to `operation` fail with `error`.
    pub fn fail(&self, operation: &'static str, error: RemoteError) {
        self.failures.lock().unwrap().insert(operation, error);
    }

    pub fn fail_network(&self, operation: &'static str) {
        self.fail(operation, RemoteError::network(operation, "connection reset"));
    }

    pub fn heal(&self, operation: &'static str) {
        self.failures.lock().unwrap().remove(operation);
    }

    /// Full record returned by `get_processed_job(id)`.
    pub fn set_processed(&self, id: &str, job: ProcessedJob) {
        self.processed.lock().unwrap().insert(id.to_string(), job);
    }

    /// Response of `process_job(id, _)`. Defaults to echoing the id.
    pub fn set_process_response(&self, id: &str, response: ProcessResponse) {
        self.process_responses
            .lock()
            .unwrap()
            .insert(id.to_string(), response);
    }

    /// Holds mutating calls on `id` until `notify_one` is called on the
    /// returned gate.
    pub fn gate(&self, id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(id.to_string(), Arc::clone(&notify));
        notify
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than `list_jobs`.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::List)
            .collect()
    }

    async fn record(&self, call: Call, gated: bool) -> Result<(), RemoteError> {
        let operation = call.operation();
        let gate = match call.job_id() {
            Some(id) if gated => self.gates.lock().unwrap().get(id).cloned(),
            _ => None,
        };
        self.calls.lock().unwrap().push(call);

        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.failures.lock().unwrap().get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl JobService for FakeJobService {
    async fn list_jobs(&self) -> Result<Vec<RemoteJob>, RemoteError> {
        self.record(Call::List, false).await?;
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn move_job(&self, id: &str, to: JobStatus) -> Result<(), RemoteError> {
        self.record(
            Call::Move {
                id: id.to_string(),
                to,
            },
            true,
        )
        .await
    }

    async fn process_job(&self, id: &str, activate: bool) -> Result<ProcessResponse, RemoteError> {
        self.record(
            Call::Process {
                id: id.to_string(),
                activate,
            },
            true,
        )
        .await?;

        if let Some(response) = self.process_responses.lock().unwrap().get(id) {
            return Ok(response.clone());
        }
        let status = if activate { "active" } else { "processed" };
        Ok(ProcessResponse {
            original_job_id: id.to_string(),
            processed_job: Some(processed_payload(id, status)),
        })
    }

    async fn get_processed_job(&self, id: &str) -> Result<ProcessedJob, RemoteError> {
        self.record(Call::GetProcessed { id: id.to_string() }, false)
            .await?;
        self.processed
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RemoteError::Status {
                operation: "fetch processed job".to_string(),
                status: 404,
                body: "not found".to_string(),
            })
    }

    async fn update_processed_job(&self, id: &str, status: &str) -> Result<(), RemoteError> {
        self.record(
            Call::UpdateProcessed {
                id: id.to_string(),
                status: status.to_string(),
            },
            true,
        )
        .await
    }

    async fn delete_job(&self, id: &str) -> Result<(), RemoteError> {
        self.record(Call::Delete { id: id.to_string() }, true).await
    }
}
