//! Collaborators invoked at the end of a move: formatting and project removal.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::project::Project;
use crate::tree::{IgnoreMatcher, Tree, visit_not_ignored_files};

/// Formats the files touched by a move.
#[async_trait]
pub trait Formatter: Send + Sync {
    async fn format(&self, tree: &mut dyn Tree) -> Result<()>;
}

/// Leaves every file as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

#[async_trait]
impl Formatter for NoopFormatter {
    async fn format(&self, _tree: &mut dyn Tree) -> Result<()> {
        Ok(())
    }
}

/// Removes a project from the workspace.
#[async_trait]
pub trait ProjectRemover: Send + Sync {
    async fn remove(&self, tree: &mut dyn Tree, project: &Project) -> Result<()>;
}

/// Deletes every file below the project root.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteProjectFiles;

#[async_trait]
impl ProjectRemover for DeleteProjectFiles {
    async fn remove(&self, tree: &mut dyn Tree, project: &Project) -> Result<()> {
        let mut files = Vec::new();
        visit_not_ignored_files(&*tree, &IgnoreMatcher::empty(), &project.root, &mut |path| {
            files.push(path.to_string());
        });
        debug!(project = %project.name, files = files.len(), "deleting project files");
        for file in files {
            tree.delete(&file);
        }
        Ok(())
    }
}
