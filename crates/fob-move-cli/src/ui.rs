//! Terminal output.
//!
//! Status messages go to stderr; the move summary goes to stdout so it can be
//! piped. Colors follow `--no-color`, `NO_COLOR`, `FORCE_COLOR` and the
//! terminal.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};

use fob_move::{ChangeKind, MoveSummary};
use owo_colors::OwoColorize;

static COLORS: AtomicBool = AtomicBool::new(true);

/// Decide once whether output is colored.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && crate::logger::should_use_colors(), Ordering::Relaxed);
}

fn colors() -> bool {
    COLORS.load(Ordering::Relaxed)
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if colors() { style(text) } else { text.to_string() }
}

pub fn success(message: &str) {
    eprintln!("{} {}", paint("✓", |s| s.green().bold().to_string()), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", paint("ℹ", |s| s.blue().bold().to_string()), message);
}

pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        paint("⚠", |s| s.yellow().bold().to_string()),
        paint(message, |s| s.yellow().to_string())
    );
}

/// Human-readable summary of a move.
pub fn render_summary(summary: &MoveSummary, dry_run: bool) -> String {
    let mut out = String::new();
    let verb = if dry_run { "Would move" } else { "Moved" };

    for moved in &summary.moved {
        let _ = writeln!(
            out,
            "{verb} {} → {} ({})",
            moved.source,
            paint(&moved.target, |s| s.bold().to_string()),
            paint(&moved.strategy.to_string(), |s| s.dimmed().to_string()),
        );
    }

    if !summary.changes.is_empty() {
        let _ = writeln!(out);
        for change in &summary.changes {
            let marker = match change.kind {
                ChangeKind::Create => paint("CREATE", |s| s.green().to_string()),
                ChangeKind::Update => paint("UPDATE", |s| s.cyan().to_string()),
                ChangeKind::Delete => paint("DELETE", |s| s.red().to_string()),
            };
            let _ = writeln!(out, "{marker} {}", change.path);
        }
    }

    for project in &summary.removed_projects {
        let _ = writeln!(out, "Removed empty project {}", paint(project, |s| s.bold().to_string()));
    }

    out
}

/// Print the summary (stdout) and its status line (stderr).
pub fn print_summary(summary: &MoveSummary, dry_run: bool) {
    print!("{}", render_summary(summary, dry_run));

    if summary.warnings > 0 {
        warning(&format!(
            "{} warning(s), rerun with --verbose for details",
            summary.warnings
        ));
    }
    if dry_run {
        info("Dry run: no changes were written");
    } else {
        success(&format!("Moved {} file(s)", summary.moved.len()));
    }
}
