pub mod board;
pub mod config;
pub mod error;
pub mod logging;
pub mod remote;
pub mod secrets;

pub use board::{
    BoardCounts, BoardEvent, BoardEventKind, ColumnView, JobBoard, JobRecord, JobSource,
    JobStatus, MoveOutcome, Rejection,
};
pub use config::{load_config, Config};
pub use error::{BoardError, ConfigError, RemoteError, Result};
pub use remote::{HttpJobService, JobService, StaticToken, TokenProvider};
pub use secrets::{resolve_secret, SecretError, SecretRef};
