//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use fob_move::MoveOptions;

/// Move modules between the projects of a monorepo
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fob-move",
    version,
    about = "Move modules between monorepo projects",
    long_about = "Moves JavaScript and TypeScript files into another project and rewrites\n\
                  relative imports, alias imports and entrypoint re-exports to match.\n\
                  Nothing is written unless every file of the request can be moved."
)]
pub struct Cli {
    /// Files to move
    ///
    /// Comma-separated workspace-relative paths and glob patterns.
    ///
    /// Examples:
    ///   fob-move libs/a/src/lib/helper.ts --project b
    ///   fob-move "libs/a/src/lib/*.ts,libs/a/src/util.ts" --project b
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Project to move the files into
    #[arg(short, long, value_name = "PROJECT")]
    pub project: String,

    /// Directory below the target project's lib/app folder
    #[arg(long, value_name = "DIR", conflicts_with = "derive_project_directory")]
    pub project_directory: Option<String>,

    /// Keep each file's directory relative to the source project's lib/app folder
    #[arg(long)]
    pub derive_project_directory: bool,

    /// Never add the moved file to the target entrypoint
    #[arg(long)]
    pub skip_export: bool,

    /// Do not run the configured formatter afterwards
    #[arg(long)]
    pub skip_format: bool,

    /// Accept non-ASCII characters in paths and project names
    #[arg(long)]
    pub allow_unicode: bool,

    /// Remove source projects left without code
    #[arg(long)]
    pub remove_empty_project: bool,

    /// Report the changes without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Project graph JSON export, relative to the workspace root
    ///
    /// Without one, project dependencies are derived by scanning imports.
    #[arg(long, value_name = "FILE")]
    pub graph: Option<String>,

    /// Workspace root
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub cwd: PathBuf,

    /// Settings file (default: <cwd>/fob-move.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    pub fn move_options(&self) -> MoveOptions {
        MoveOptions {
            project_directory: self.project_directory.clone(),
            derive_project_directory: self.derive_project_directory,
            skip_export: self.skip_export,
            skip_format: self.skip_format,
            allow_unicode: self.allow_unicode,
            remove_empty_project: self.remove_empty_project,
            ..MoveOptions::new(&self.file, &self.project)
        }
    }
}
