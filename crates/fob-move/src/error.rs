//! Error types for module moves.
//!
//! Every failure that can abort a move is raised before the first write, so a
//! returned error always means the workspace is untouched. Advisory conditions
//! (an alias import that may not be reachable, a project that could not be
//! removed, a formatter that failed) are logged with `tracing::warn!` instead.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while resolving or executing a move.
#[derive(Debug, Error, Diagnostic)]
pub enum MoveError {
    /// An option value contains characters outside the allowed set.
    #[error("Invalid value for '{option}': {value:?} ({reason})")]
    #[diagnostic(
        code(fob_move::invalid_input),
        help("Paths may contain letters, digits, '_', '@', '.', '/', '-' and spaces")
    )]
    InvalidInput {
        option: String,
        value: String,
        reason: String,
    },

    /// Two options that cannot be combined were both supplied.
    #[error("Conflicting options: {0}")]
    #[diagnostic(code(fob_move::conflicting_options))]
    ConflictingOptions(String),

    /// The file to move does not exist.
    #[error("Source file not found: {0}")]
    #[diagnostic(code(fob_move::source_not_found))]
    SourceNotFound(String),

    /// The computed destination is already occupied.
    #[error("Target file already exists: {0}")]
    #[diagnostic(
        code(fob_move::target_exists),
        help("Choose another --project-directory or remove the existing file first")
    )]
    TargetExists(String),

    /// Two files of the same batch resolve to the same destination.
    #[error("Files '{first}' and '{second}' would both be moved to '{target}'")]
    #[diagnostic(code(fob_move::duplicate_target))]
    DuplicateTarget {
        first: String,
        second: String,
        target: String,
    },

    /// No project with the given name exists in the workspace.
    #[error("Project '{0}' not found in workspace")]
    #[diagnostic(code(fob_move::project_not_found))]
    ProjectNotFound(String),

    /// The file is not located under any project's root.
    #[error("Could not determine the project owning '{0}'")]
    #[diagnostic(code(fob_move::owning_project_not_found))]
    OwningProjectNotFound(String),

    /// A glob pattern did not match a single file.
    #[error("Glob pattern '{0}' did not match any files")]
    #[diagnostic(code(fob_move::pattern_matched_nothing))]
    PatternMatchedNothing(String),

    /// A glob pattern could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    #[diagnostic(code(fob_move::invalid_pattern))]
    InvalidPattern { pattern: String, reason: String },

    /// The project graph provider failed.
    #[error("Project graph unavailable: {0}")]
    #[diagnostic(code(fob_move::graph_unavailable))]
    GraphUnavailable(String),

    /// Workspace configuration could not be read.
    #[error("Invalid workspace configuration in '{path}': {reason}")]
    #[diagnostic(code(fob_move::config))]
    Config { path: String, reason: String },

    /// A collaborator (formatter, project removal) failed.
    #[error("{collaborator} failed: {reason}")]
    #[diagnostic(code(fob_move::collaborator))]
    Collaborator {
        collaborator: &'static str,
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(fob_move::io))]
    Io(#[from] std::io::Error),
}

impl MoveError {
    /// Create an InvalidInput error.
    pub fn invalid_input(
        option: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            option: option.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Config error.
    pub fn config(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for move operations.
pub type Result<T> = std::result::Result<T, MoveError>;
