//! The workspace a move runs against: tree, projects, settings and caches.
//!
//! All file access of the mover goes through [`Workspace`]. Reads are served
//! from the caches; [`Workspace::write`] and [`Workspace::delete`] are the only
//! mutation paths and invalidate the caches for the touched path in the same
//! call.

use std::sync::Arc;

use tracing::trace;

use crate::cache::MoveCaches;
use crate::error::{MoveError, Result};
use crate::paths;
use crate::project::{self, PathAliases, Project, Projects, discover_projects, load_path_aliases};
use crate::settings::WorkspaceSettings;
use crate::syntax::ModuleSyntax;
use crate::tree::{IgnoreMatcher, Tree, visit_not_ignored_files};

pub struct Workspace<'t> {
    tree: &'t mut dyn Tree,
    settings: WorkspaceSettings,
    ignore: IgnoreMatcher,
    projects: Projects,
    caches: MoveCaches,
}

impl<'t> Workspace<'t> {
    /// Open a workspace, discovering projects from their manifests.
    pub fn open(tree: &'t mut dyn Tree, settings: WorkspaceSettings) -> Self {
        let ignore = IgnoreMatcher::from_tree(&*tree);
        let projects = discover_projects(&*tree, &ignore, &settings);
        Self {
            tree,
            settings,
            ignore,
            projects,
            caches: MoveCaches::new(),
        }
    }

    /// Open a workspace with an explicit project set.
    pub fn with_projects(tree: &'t mut dyn Tree, settings: WorkspaceSettings, projects: Projects) -> Self {
        let ignore = IgnoreMatcher::from_tree(&*tree);
        Self {
            tree,
            settings,
            ignore,
            projects,
            caches: MoveCaches::new(),
        }
    }

    pub fn tree(&self) -> &dyn Tree {
        &*self.tree
    }

    /// Direct tree access for collaborators. Every cache is cleared first,
    /// since writes made through the returned reference bypass invalidation.
    pub fn tree_mut(&mut self) -> &mut dyn Tree {
        self.caches.clear();
        &mut *self.tree
    }

    pub fn settings(&self) -> &WorkspaceSettings {
        &self.settings
    }

    pub fn ignore(&self) -> &IgnoreMatcher {
        &self.ignore
    }

    pub fn projects(&self) -> &Projects {
        &self.projects
    }

    /// Look up a project by name.
    pub fn project(&self, name: &str) -> Result<&Project> {
        self.projects
            .get(name)
            .ok_or_else(|| MoveError::ProjectNotFound(name.to_string()))
    }

    pub fn caches(&self) -> &MoveCaches {
        &self.caches
    }

    pub fn caches_mut(&mut self) -> &mut MoveCaches {
        &mut self.caches
    }

    pub fn exists(&self, path: &str) -> bool {
        self.tree.exists(path)
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.tree.is_file(path)
    }

    /// File content through the content cache.
    pub fn read(&mut self, path: &str) -> Option<Arc<str>> {
        if let Some(cached) = self.caches.content.get(path) {
            return cached;
        }
        let content: Option<Arc<str>> = self.tree.read(path).map(Arc::from);
        self.caches.content.set(path, content.clone());
        content
    }

    /// Parsed module digest through the syntax cache.
    pub fn syntax(&mut self, path: &str) -> Option<Arc<ModuleSyntax>> {
        if let Some(cached) = self.caches.syntax.get(path) {
            return cached;
        }
        let syntax = self
            .read(path)
            .and_then(|content| ModuleSyntax::parse(path, &content))
            .map(Arc::new);
        self.caches.syntax.set(path, syntax.clone());
        syntax
    }

    /// Write a file and invalidate every cache entry derived from it.
    pub fn write(&mut self, path: &str, content: &str) {
        trace!(path, "write");
        self.tree.write(path, content);
        self.caches.invalidate_path(path);
    }

    /// Delete a file and invalidate every cache entry derived from it.
    pub fn delete(&mut self, path: &str) {
        trace!(path, "delete");
        self.tree.delete(path);
        self.caches.invalidate_path(path);
    }

    /// Every non-ignored file under `dir`.
    pub fn files(&self, dir: &str) -> Vec<String> {
        let mut files = Vec::new();
        visit_not_ignored_files(&*self.tree, &self.ignore, dir, &mut |path| {
            files.push(path.to_string());
        });
        files
    }

    /// Every non-ignored module file under `dir`.
    pub fn source_files(&self, dir: &str) -> Vec<String> {
        let mut files = self.files(dir);
        files.retain(|path| paths::is_source_file(path));
        files
    }

    /// The existing file a module key designates: the key itself, the key
    /// with a module extension, or an `index` file in the key's directory.
    pub fn resolve_module(&self, key: &str) -> Option<String> {
        if self.tree.is_file(key) {
            return Some(key.to_string());
        }
        let with_extension = paths::SOURCE_EXTENSIONS
            .iter()
            .map(|ext| format!("{key}.{ext}"));
        let as_directory = paths::SOURCE_EXTENSIONS
            .iter()
            .map(|ext| paths::join(key, &format!("index.{ext}")));
        with_extension
            .chain(as_directory)
            .find(|candidate| self.tree.is_file(candidate))
    }

    /// The path-alias table, loaded once per workspace.
    pub fn path_aliases(&mut self) -> Result<Arc<PathAliases>> {
        if let Some(aliases) = self.caches.aliases.get() {
            return Ok(aliases);
        }
        let aliases = Arc::new(load_path_aliases(&*self.tree, &self.settings)?);
        self.caches.aliases.set(Arc::clone(&aliases));
        Ok(aliases)
    }

    pub fn project_alias(&mut self, project: &Project) -> Result<Option<String>> {
        let aliases = self.path_aliases()?;
        Ok(project::project_alias(&*self.tree, project, &aliases))
    }

    pub fn entrypoints(&mut self, project: &Project) -> Result<Vec<String>> {
        let aliases = self.path_aliases()?;
        Ok(project::entrypoint_candidates(&*self.tree, project, &aliases))
    }

    pub fn primary_entrypoint(&mut self, project: &Project) -> Result<Option<String>> {
        let aliases = self.path_aliases()?;
        Ok(project::primary_entrypoint(&*self.tree, project, &aliases))
    }

    pub fn is_project_empty(&mut self, project: &Project) -> Result<bool> {
        let aliases = self.path_aliases()?;
        Ok(project::is_project_empty(&*self.tree, &self.ignore, project, &aliases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    #[test]
    fn write_invalidates_content_and_syntax() {
        let mut tree = MemoryTree::with_files([("a.ts", "export const a = 1;")]);
        let mut workspace = Workspace::with_projects(&mut tree, WorkspaceSettings::default(), Projects::new());

        let before = workspace.syntax("a.ts").unwrap();
        assert_eq!(before.named_exports, vec!["a"]);
        // Served from cache
        workspace.syntax("a.ts").unwrap();
        assert_eq!(workspace.caches().syntax.stats().hits, 1);

        workspace.write("a.ts", "export const b = 2;");
        assert_eq!(&*workspace.read("a.ts").unwrap(), "export const b = 2;");
        assert_eq!(workspace.syntax("a.ts").unwrap().named_exports, vec!["b"]);
    }

    #[test]
    fn missing_files_are_cached_as_absent() {
        let mut tree = MemoryTree::new();
        let mut workspace = Workspace::with_projects(&mut tree, WorkspaceSettings::default(), Projects::new());
        assert!(workspace.read("nope.ts").is_none());
        assert!(workspace.read("nope.ts").is_none());
        assert_eq!(workspace.caches().content.stats().hits, 1);

        workspace.write("nope.ts", "x");
        assert_eq!(workspace.read("nope.ts").as_deref(), Some("x"));
    }

    #[test]
    fn open_discovers_projects_and_respects_gitignore() {
        let mut tree = MemoryTree::with_files([
            (".gitignore", "dist\n"),
            ("libs/a/project.json", r#"{"name": "a"}"#),
            ("libs/a/src/index.ts", "export {};"),
            ("dist/libs/a/project.json", r#"{"name": "a-build"}"#),
        ]);
        let workspace = Workspace::open(&mut tree, WorkspaceSettings::default());
        assert_eq!(workspace.projects().names().collect::<Vec<_>>(), vec!["a"]);
        assert!(matches!(workspace.project("zzz"), Err(MoveError::ProjectNotFound(_))));
    }

    #[test]
    fn alias_table_is_loaded_once() {
        let mut tree = MemoryTree::with_files([(
            "tsconfig.base.json",
            r#"{"compilerOptions": {"paths": {"@acme/a": ["libs/a/src/index.ts"]}}}"#,
        )]);
        let mut workspace = Workspace::with_projects(&mut tree, WorkspaceSettings::default(), Projects::new());
        workspace.path_aliases().unwrap();
        workspace.write("tsconfig.base.json", "{}");
        assert_eq!(workspace.path_aliases().unwrap().len(), 1);
        assert_eq!(workspace.caches().aliases.stats().hits, 1);
    }
}
