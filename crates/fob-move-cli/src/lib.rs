//! Command-line front end for [`fob_move`].
//!
//! - [`cli`] - argument definitions
//! - [`config`] - `fob-move.toml` and `FOB_MOVE_*` settings
//! - [`commands`] - the move itself: load, run, flush, format
//! - [`formatter`] - external formatter invoked over touched files
//! - [`error`] - CLI errors and their miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal output
//!
//! # Example
//!
//! ```rust,no_run
//! use clap::Parser;
//! use fob_move_cli::{cli::Cli, commands};
//!
//! # #[tokio::main]
//! # async fn main() -> fob_move_cli::Result<()> {
//! let args = Cli::parse_from(["fob-move", "libs/a/src/lib/x.ts", "--project", "b", "--dry-run"]);
//! let summary = commands::execute(args).await?;
//! println!("{} file(s) would move", summary.moved.len());
//! # Ok(()) }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatter;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result};
