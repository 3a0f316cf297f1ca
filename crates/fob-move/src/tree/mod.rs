//! Virtual file system abstraction.
//!
//! The mover never touches the disk directly. It works against a [`Tree`],
//! which lets the same code run over an in-memory workspace in tests and over
//! a staged, flush-at-the-end view of a real checkout in the CLI.
//!
//! ```text
//! MoveFileGenerator
//!        │
//!        ▼
//!   ┌──────────┐      ┌────────────┐
//!   │ Workspace│─────▶│ dyn Tree   │── MemoryTree (tests, dry runs)
//!   │  caches  │      └────────────┘── FsTree     (staged over disk)
//!   └──────────┘
//! ```

mod memory;
mod native;
mod walk;

pub use memory::MemoryTree;
pub use native::FsTree;
pub use walk::{IgnoreMatcher, visit_not_ignored_files};

/// Kind of a staged change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

/// A staged change to one file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
}

/// Synchronous file system view over a workspace.
///
/// Paths are workspace-relative and `/`-separated. Writes are infallible from
/// the caller's point of view: implementations either apply them in memory or
/// stage them until an explicit flush.
pub trait Tree: Send + Sync {
    /// Read a file as UTF-8 text. Returns `None` for missing or binary files.
    fn read(&self, path: &str) -> Option<String>;

    /// Create or overwrite a file.
    fn write(&mut self, path: &str, content: &str);

    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Whether `path` is a file.
    fn is_file(&self, path: &str) -> bool;

    /// Delete a file. Deleting a missing file is a no-op.
    fn delete(&mut self, path: &str);

    /// Names of the direct children of a directory, sorted.
    fn children(&self, dir: &str) -> Vec<String>;

    /// Changes made through this tree so far, sorted by path.
    fn changes(&self) -> Vec<FileChange>;
}
