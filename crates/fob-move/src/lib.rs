#![cfg_attr(docsrs, feature(doc_cfg))]

//! # fob-move
//!
//! Move JavaScript and TypeScript modules between the projects of a monorepo
//! while keeping every import consistent.
//!
//! A move relocates one or more files into a target project and then
//! rewrites the workspace around them:
//!
//! - **Relative imports** of the moved file are recomputed for its new home.
//! - **Alias imports** (`@scope/lib`) in dependent projects are pointed at the
//!   target project's alias, found through the project dependency graph.
//! - **Entrypoint re-exports** are removed from the source project and added
//!   to the target project when the file was public.
//! - **Emptied projects** can be removed afterwards.
//!
//! Every file of a batch is resolved against the untouched workspace before
//! the first write, so a failed request leaves nothing half done.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fob_move::{FsTree, JsonGraphProvider, MoveFileGenerator, MoveOptions, Workspace, WorkspaceSettings};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = FsTree::new(".");
//! let summary = {
//!     let mut workspace = Workspace::open(&mut tree, WorkspaceSettings::default());
//!     let graph = JsonGraphProvider::new("dist/project-graph.json");
//!     MoveFileGenerator::new(&graph)
//!         .run(&mut workspace, &MoveOptions::new("libs/a/src/lib/helper.ts", "b"))
//!         .await?
//! };
//! tree.flush()?;
//! println!("moved {} file(s)", summary.moved.len());
//! # Ok(()) }
//! ```

pub mod batch;
pub mod cache;
pub mod collaborators;
pub mod context;
pub mod error;
pub mod exports;
pub mod graph;
pub mod imports;
pub mod options;
pub mod paths;
pub mod project;
pub mod security;
pub mod settings;
pub mod strategy;
pub mod syntax;
pub mod tree;
pub mod workspace;

// Fixtures (available in test builds and when the test-utils feature is enabled)
#[cfg(any(test, doctest, feature = "test-utils"))]
pub mod test_utils;

pub use batch::{MoveFileGenerator, MoveSummary, MovedFile, expand_patterns};
pub use cache::{CacheStats, MoveCaches};
pub use collaborators::{DeleteProjectFiles, Formatter, NoopFormatter, ProjectRemover};
pub use context::{MoveContext, resolve_context};
pub use error::{MoveError, Result};
pub use exports::{EMPTY_MODULE_MARKER, ExportLedger};
pub use graph::{
    ImportScanGraphProvider, JsonGraphProvider, ProjectEdge, ProjectGraphProvider, ReverseDependencyGraph,
    StaticGraphProvider,
};
pub use options::MoveOptions;
pub use project::{PathAliases, Project, ProjectKind, Projects};
pub use settings::WorkspaceSettings;
pub use strategy::MoveStrategy;
pub use tree::{ChangeKind, FileChange, FsTree, MemoryTree, Tree};
pub use workspace::Workspace;
