//! Remote job-management service.
//!
//! The board only talks to the service through [`JobService`], so tests and
//! embedders can swap the HTTP client for anything else.

pub mod http;
pub mod types;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::board::JobStatus;
use crate::error::RemoteError;

pub use http::HttpJobService;
pub use types::{ProcessResponse, ProcessedJob, RemoteJob};

/// Request/response operations the board needs from the backing store.
#[async_trait]
pub trait JobService: Send + Sync {
    /// `GET /jobs`
    async fn list_jobs(&self) -> Result<Vec<RemoteJob>, RemoteError>;

    /// Pure status change on an original record.
    async fn move_job(&self, id: &str, to: JobStatus) -> Result<(), RemoteError>;

    /// Promotes an original record into processed storage, optionally
    /// activating it directly.
    async fn process_job(&self, id: &str, activate: bool) -> Result<ProcessResponse, RemoteError>;

    /// Full processed-record fields.
    async fn get_processed_job(&self, id: &str) -> Result<ProcessedJob, RemoteError>;

    /// Lifecycle update of a processed record. `status` is a processed tag
    /// (`processed`, `active`, `closed`).
    async fn update_processed_job(&self, id: &str, status: &str) -> Result<(), RemoteError>;

    async fn delete_job(&self, id: &str) -> Result<(), RemoteError>;
}

/// Source of the bearer credential sent with every request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<SecretString, RemoteError>;
}

/// A fixed token, typically resolved from config at startup.
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: SecretString) -> Self {
        Self(token)
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> Result<SecretString, RemoteError> {
        Ok(SecretString::from(self.0.expose_secret().to_string()))
    }
}
