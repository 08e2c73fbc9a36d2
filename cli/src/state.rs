//! Board construction from configuration.

use std::sync::Arc;

use jobboard::{Config, HttpJobService, JobBoard, StaticToken};
use log::info;

/// Builds the HTTP-backed board and loads it from the remote service.
pub async fn connect(config: &Config) -> jobboard::Result<JobBoard> {
    let token = config.api.resolve_token()?;
    let service = HttpJobService::from_config(&config.api, Arc::new(StaticToken::new(token)))?;
    info!("Using job service at {}", service.base_url());

    let board = JobBoard::with_config(Arc::new(service), &config.board);
    board.load().await?;
    Ok(board)
}
