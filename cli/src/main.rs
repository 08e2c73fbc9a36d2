//! jobboard - kanban admin for the job board service.

mod commands;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jobboard::JobStatus;
use log::error;

use commands::ApiResponse;

/// Inspect and move jobs on the job board.
#[derive(Parser, Debug)]
#[command(name = "jobboard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "jobboard.json")]
    config: PathBuf,

    /// Log level, overrides the config (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every job on the board
    #[command(alias = "ls")]
    List,

    /// Show the board grouped into columns, with counts
    Columns,

    /// Move a job to another column
    Move {
        /// Job id
        job_id: String,

        /// Destination column (job-request, approved, hiring, closed)
        column: JobStatus,
    },

    /// Delete a job
    Delete {
        /// Job id
        job_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match jobboard::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => return print_response(&ApiResponse::<()>::err(e.to_string())),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Err(e) = jobboard::logging::init_logging(&config.logging) {
        eprintln!("{}", e);
    }

    let board = match state::connect(&config).await {
        Ok(board) => board,
        Err(e) => {
            error!("Failed to load the board: {}", e);
            return print_response(&ApiResponse::<()>::err(e.to_string()));
        }
    };

    match cli.command {
        Commands::List => print_response(&commands::list_jobs(&board)),
        Commands::Columns => print_response(&commands::get_columns(&board)),
        Commands::Move { job_id, column } => {
            print_response(&commands::move_job(&board, &job_id, column).await)
        }
        Commands::Delete { job_id } => {
            print_response(&commands::delete_job(&board, &job_id).await)
        }
    }
}

fn print_response<T: serde::Serialize>(response: &ApiResponse<T>) -> ExitCode {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize response: {}", e);
            return ExitCode::FAILURE;
        }
    }
    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
