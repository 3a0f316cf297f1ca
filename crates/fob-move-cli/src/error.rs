//! Errors of the `fob-move` binary.
//!
//! Library failures keep their [`fob_move::MoveError`] diagnostics (codes and
//! help text); everything the binary adds on top is a [`CliError`].

use std::path::PathBuf;

use fob_move::MoveError;
use miette::Report;
use thiserror::Error;

/// Top-level CLI error.
#[derive(Debug, Error)]
pub enum CliError {
    /// The move itself failed; the workspace is untouched.
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The workspace root does not exist or is not a directory
    #[error("Workspace root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Writing staged changes to disk failed
    #[error("Failed to write changes: {0}")]
    Flush(#[source] std::io::Error),

    /// The configured formatter could not be run or exited with an error
    #[error("Formatter failed: {0}")]
    Formatter(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading `fob-move.toml` and `FOB_MOVE_*` variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}\n\nHint: Pass an existing file to --config or drop the flag", .0.display())]
    NotFound(PathBuf),

    #[error("{0}\n\nHint: Check fob-move.toml and FOB_MOVE_* variables")]
    Invalid(String),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a [`CliError`] into a report, keeping library diagnostics intact.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Move(err) => Report::new(err),
        CliError::Config(err) => miette::miette!("Configuration error: {}", err),
        other => miette::miette!("{}", other),
    }
}
