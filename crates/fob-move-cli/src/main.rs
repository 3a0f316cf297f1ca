//! fob-move - move modules between monorepo projects.
//!
//! Parses arguments, sets up logging and colors, runs the move and reports
//! failures as miette diagnostics.

use clap::Parser;
use fob_move_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    commands::execute(args)
        .await
        .map(|_| ())
        .map_err(error::cli_error_to_miette)
}
