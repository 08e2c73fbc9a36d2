use std::path::PathBuf;
use thiserror::Error;

use crate::secrets::SecretError;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job {0} has a change in flight")]
    JobBusy(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Failed to resolve API token: {0}")]
    Secret(#[from] SecretError),
}

/// Errors returned by a [`JobService`](crate::remote::JobService).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced a response (connect failure, timeout, reset).
    #[error("{operation} failed: {message}")]
    Network { operation: String, message: String },

    /// The service answered with a non-2xx status.
    #[error("{operation} failed ({status}): {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    /// The service answered 2xx but refused the change.
    #[error("{operation} rejected: {message}")]
    Rejected { operation: String, message: String },

    #[error("Failed to decode {operation} response: {message}")]
    Decode { operation: String, message: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl RemoteError {
    pub fn network(operation: &str, message: impl Into<String>) -> Self {
        RemoteError::Network {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn rejected(operation: &str, message: impl Into<String>) -> Self {
        RemoteError::Rejected {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
