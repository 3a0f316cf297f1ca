//! Batch orchestration: expand the request, resolve every file, then move.
//!
//! ```text
//! "a.ts, libs/x/**/*.ts"
//!        │ expand + dedupe
//!        ▼
//!  [file, file, …] ── resolve_context (read-only, one snapshot)
//!        │
//!        ▼
//!  per file: strategy ── write target, rewrite references, exports
//!        │
//!        ▼
//!  delete sources ─▶ remove emptied projects ─▶ format
//! ```

use std::sync::Arc;

use globset::GlobBuilder;
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collaborators::{DeleteProjectFiles, Formatter, NoopFormatter, ProjectRemover};
use crate::context::{MoveContext, resolve_context};
use crate::error::{MoveError, Result};
use crate::graph::{LazyGraph, ProjectGraphProvider};
use crate::options::MoveOptions;
use crate::paths;
use crate::security;
use crate::strategy::{Executor, MoveStrategy};
use crate::tree::FileChange;
use crate::workspace::Workspace;

/// One relocated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedFile {
    pub source: String,
    pub target: String,
    pub strategy: MoveStrategy,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveSummary {
    pub moved: Vec<MovedFile>,
    /// Source projects removed because they were left without code
    pub removed_projects: Vec<String>,
    /// Advisory conditions logged during the run
    pub warnings: usize,
    /// Every file created, updated or deleted
    pub changes: Vec<FileChange>,
}

/// Moves files between projects.
///
/// # Example
///
/// ```
/// use fob_move::{MemoryTree, MoveFileGenerator, MoveOptions, StaticGraphProvider, Workspace, WorkspaceSettings};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut tree = MemoryTree::with_files([
///     ("libs/a/project.json", r#"{"name": "a", "sourceRoot": "libs/a/src"}"#),
///     ("libs/a/src/index.ts", "export {};\n"),
///     ("libs/a/src/lib/helper.ts", "export const h = 1;\n"),
///     ("libs/b/project.json", r#"{"name": "b", "sourceRoot": "libs/b/src"}"#),
///     ("libs/b/src/index.ts", "export {};\n"),
/// ]);
/// let mut workspace = Workspace::open(&mut tree, WorkspaceSettings::default());
/// let graph = StaticGraphProvider::default();
/// let summary = MoveFileGenerator::new(&graph)
///     .run(&mut workspace, &MoveOptions::new("libs/a/src/lib/helper.ts", "b"))
///     .await?;
/// assert_eq!(summary.moved[0].target, "libs/b/src/lib/helper.ts");
/// # Ok(()) }
/// ```
pub struct MoveFileGenerator<'p> {
    graph: &'p dyn ProjectGraphProvider,
    remover: Arc<dyn ProjectRemover>,
    formatter: Arc<dyn Formatter>,
}

impl<'p> MoveFileGenerator<'p> {
    pub fn new(graph: &'p dyn ProjectGraphProvider) -> Self {
        Self {
            graph,
            remover: Arc::new(DeleteProjectFiles),
            formatter: Arc::new(NoopFormatter),
        }
    }

    pub fn with_remover(mut self, remover: Arc<dyn ProjectRemover>) -> Self {
        self.remover = remover;
        self
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Run one move request against `workspace`.
    ///
    /// Every error is raised before the first write. Failures of the
    /// project cleanup and of the formatter are logged and counted in
    /// [`MoveSummary::warnings`].
    pub async fn run(&self, workspace: &mut Workspace<'_>, options: &MoveOptions) -> Result<MoveSummary> {
        options.validate()?;

        let files = expand_patterns(workspace, options)?;
        let contexts = resolve_all(workspace, &files, options)?;
        let strategies: Vec<MoveStrategy> = contexts.iter().map(MoveStrategy::select).collect();

        let mut graph = LazyGraph::new(self.graph);
        if strategies.iter().any(|strategy| strategy.needs_graph()) {
            graph.ensure_fetched(workspace.tree()).await?;
        }

        let mut executor = Executor {
            workspace: &mut *workspace,
            batch: &contexts,
            options,
            graph,
            warnings: 0,
        };
        let mut summary = MoveSummary::default();
        for (context, strategy) in contexts.iter().zip(&strategies) {
            info!(
                source = %context.source,
                target = %context.target,
                %strategy,
                "moving file"
            );
            executor.execute(context, *strategy).await?;
            summary.moved.push(MovedFile {
                source: context.source.clone(),
                target: context.target.clone(),
                strategy: *strategy,
            });
        }
        summary.warnings = executor.warnings;
        debug!(graph_fetched = executor.graph.is_fetched(), "strategies applied");

        for context in &contexts {
            workspace.delete(&context.source);
        }

        if options.remove_empty_project {
            summary.removed_projects = self.remove_empty_projects(workspace, &contexts, &mut summary.warnings).await;
        }

        if !options.skip_format {
            if let Err(err) = self.formatter.format(workspace.tree_mut()).await {
                warn!(%err, "formatting failed, changes are kept unformatted");
                summary.warnings += 1;
            }
        }

        debug!(caches = %workspace.caches().report(), "cache statistics");
        summary.changes = workspace.tree().changes();
        Ok(summary)
    }

    /// Remove every source project left with nothing but its entrypoints.
    /// Failures are logged and counted, never raised.
    async fn remove_empty_projects(
        &self,
        workspace: &mut Workspace<'_>,
        contexts: &[MoveContext],
        warnings: &mut usize,
    ) -> Vec<String> {
        let mut candidates: IndexSet<&str> = IndexSet::new();
        for context in contexts {
            let is_target = contexts
                .iter()
                .any(|other| other.target_project.name == context.source_project.name);
            if !is_target {
                candidates.insert(&context.source_project.name);
            }
        }

        let mut removed = Vec::new();
        for name in candidates {
            let Some(project) = workspace.projects().get(name).cloned() else {
                continue;
            };
            match workspace.is_project_empty(&project) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    warn!(project = %name, %err, "could not check whether project is empty");
                    *warnings += 1;
                    continue;
                }
            }
            match self.remover.remove(workspace.tree_mut(), &project).await {
                Ok(()) => {
                    info!(project = %name, "removed empty project");
                    removed.push(name.to_string());
                }
                Err(err) => {
                    warn!(project = %name, %err, "failed to remove empty project");
                    *warnings += 1;
                }
            }
        }
        removed
    }
}

/// Expand comma-separated paths and globs into a de-duplicated file list.
pub fn expand_patterns(workspace: &Workspace<'_>, options: &MoveOptions) -> Result<Vec<String>> {
    let mut files: IndexSet<String> = IndexSet::new();
    for entry in options.file_entries() {
        if !security::is_glob(&entry) {
            files.insert(security::sanitize_path("file", &entry)?);
            continue;
        }

        let pattern = entry.replace('\\', "/");
        let glob = GlobBuilder::new(pattern.trim_start_matches("./"))
            .literal_separator(true)
            .build()
            .map_err(|err| MoveError::InvalidPattern {
                pattern: entry.clone(),
                reason: err.to_string(),
            })?
            .compile_matcher();

        let base = glob_base(&pattern);
        let matches: Vec<String> = workspace
            .source_files(&base)
            .into_iter()
            .filter(|file| glob.is_match(file))
            .collect();
        if matches.is_empty() {
            return Err(MoveError::PatternMatchedNothing(entry));
        }
        debug!(pattern = %entry, count = matches.len(), "expanded glob");
        files.extend(matches);
    }
    Ok(files.into_iter().collect())
}

/// Longest leading directory of a glob without metacharacters.
fn glob_base(pattern: &str) -> String {
    let literal: Vec<&str> = pattern
        .split('/')
        .take_while(|part| !security::is_glob(part))
        .collect();
    // The last literal part may be a file name rather than a directory.
    let dirs = if literal.len() == pattern.split('/').count() {
        &literal[..literal.len().saturating_sub(1)]
    } else {
        &literal[..]
    };
    paths::normalize(&dirs.join("/"))
}

/// Resolve every file before anything is written.
fn resolve_all(workspace: &mut Workspace<'_>, files: &[String], options: &MoveOptions) -> Result<Vec<MoveContext>> {
    let mut contexts = Vec::with_capacity(files.len());
    let mut targets: FxHashMap<String, String> = FxHashMap::default();
    for file in files {
        let context = resolve_context(workspace, file, options)?;
        if let Some(first) = targets.insert(context.target.clone(), context.source.clone()) {
            return Err(MoveError::DuplicateTarget {
                first,
                second: context.source,
                target: context.target,
            });
        }
        contexts.push(context);
    }
    Ok(contexts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_base_stops_at_first_metacharacter() {
        assert_eq!(glob_base("libs/a/src/**/*.ts"), "libs/a/src");
        assert_eq!(glob_base("libs/a/src/lib/*.ts"), "libs/a/src/lib");
        assert_eq!(glob_base("*.ts"), "");
    }
}
