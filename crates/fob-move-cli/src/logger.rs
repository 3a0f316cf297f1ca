//! Logging setup for the `fob-move` binary.
//!
//! The library logs through `tracing`; this module installs the subscriber.
//!
//! Filter precedence:
//! 1. `--verbose`: debug for the fob-move crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. info for the fob-move crates
//!
//! ```rust,no_run
//! use fob_move_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("moving files");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "fob_move=debug,fob_move_cli=debug";
const QUIET_FILTER: &str = "fob_move=error,fob_move_cli=error";
const DEFAULT_FILTER: &str = "fob_move=info,fob_move_cli=info";

/// Build the filter for the given flags.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before anything logs.
///
/// Log lines go to stderr so stdout carries only the move summary.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}

/// Whether stderr should be colored: `NO_COLOR` disables, `FORCE_COLOR`
/// enables, otherwise the terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
