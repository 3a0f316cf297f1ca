//! Projects of a workspace and their path aliases.

mod aliases;
mod analysis;
mod discovery;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use aliases::{PathAlias, PathAliases, load_path_aliases};
pub use analysis::{entrypoint_candidates, is_project_empty, primary_entrypoint, project_alias};
pub use discovery::discover_projects;

use crate::paths;

/// Kind of project; decides the conventional base subdirectory for moved files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    #[default]
    Library,
    Application,
}

impl ProjectKind {
    /// `lib` for libraries, `app` for applications.
    pub fn base_dir(self) -> &'static str {
        match self {
            ProjectKind::Library => "lib",
            ProjectKind::Application => "app",
        }
    }
}

/// One independently buildable unit of the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub name: String,
    /// Directory holding the project manifest
    pub root: String,
    /// Directory holding the project's sources (defaults to `root`)
    pub source_root: String,
    pub kind: ProjectKind,
}

impl Project {
    pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
        let root = paths::normalize(&root.into());
        Self {
            name: name.into(),
            source_root: root.clone(),
            root,
            kind: ProjectKind::Library,
        }
    }

    pub fn with_source_root(mut self, source_root: impl Into<String>) -> Self {
        self.source_root = paths::normalize(&source_root.into());
        self
    }

    pub fn with_kind(mut self, kind: ProjectKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether `path` lies inside this project.
    pub fn contains(&self, path: &str) -> bool {
        paths::is_within(path, &self.root) || paths::is_within(path, &self.source_root)
    }

    /// Length of the longest project directory that contains `path`.
    fn match_len(&self, path: &str) -> Option<usize> {
        [&self.source_root, &self.root]
            .into_iter()
            .filter(|dir| paths::is_within(path, dir))
            .map(|dir| dir.len())
            .max()
    }
}

/// All projects of a workspace, keyed by name in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Projects {
    by_name: IndexMap<String, Project>,
}

impl Projects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, project: Project) {
        self.by_name.insert(project.name.clone(), project);
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.by_name.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.by_name.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// The project owning `path`: the one whose root or source root is the
    /// longest prefix of it.
    pub fn owning(&self, path: &str) -> Option<&Project> {
        self.iter()
            .filter_map(|project| project.match_len(path).map(|len| (len, project)))
            .max_by_key(|(len, _)| *len)
            .map(|(_, project)| project)
    }
}

impl FromIterator<Project> for Projects {
    fn from_iter<I: IntoIterator<Item = Project>>(iter: I) -> Self {
        let mut projects = Projects::new();
        for project in iter {
            projects.insert(project);
        }
        projects
    }
}
