//! Project dependency graph: providers and reverse traversal.

use std::collections::VecDeque;

use async_trait::async_trait;
use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{MoveError, Result};
use crate::imports::resolve_relative;
use crate::paths;
use crate::project::{Projects, load_path_aliases, project_alias};
use crate::settings::WorkspaceSettings;
use crate::syntax::ModuleSyntax;
use crate::tree::{IgnoreMatcher, Tree, visit_not_ignored_files};

/// `source` depends on `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectEdge {
    pub source: String,
    pub target: String,
}

impl ProjectEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Source of project-to-project dependency edges.
#[async_trait]
pub trait ProjectGraphProvider: Send + Sync {
    async fn fetch(&self, tree: &dyn Tree) -> Result<Vec<ProjectEdge>>;
}

/// A fixed edge list.
#[derive(Debug, Clone, Default)]
pub struct StaticGraphProvider {
    edges: Vec<ProjectEdge>,
}

impl StaticGraphProvider {
    pub fn new(edges: impl IntoIterator<Item = ProjectEdge>) -> Self {
        Self {
            edges: edges.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ProjectGraphProvider for StaticGraphProvider {
    async fn fetch(&self, _tree: &dyn Tree) -> Result<Vec<ProjectEdge>> {
        Ok(self.edges.clone())
    }
}

/// Reads an exported project graph:
/// `{"graph": {"dependencies": {"<project>": [{"source": …, "target": …}]}}}`
/// or the same object without the `graph` wrapper.
#[derive(Debug, Clone)]
pub struct JsonGraphProvider {
    path: String,
}

impl JsonGraphProvider {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: paths::normalize(&path.into()),
        }
    }

    fn parse(&self, content: &str) -> Result<Vec<ProjectEdge>> {
        let value: Value = serde_json::from_str(content)
            .map_err(|err| MoveError::GraphUnavailable(format!("{}: {err}", self.path)))?;
        let root = value.get("graph").unwrap_or(&value);
        let dependencies = root
            .get("dependencies")
            .and_then(Value::as_object)
            .ok_or_else(|| MoveError::GraphUnavailable(format!("{}: missing 'dependencies'", self.path)))?;

        let mut edges = Vec::new();
        for (project, deps) in dependencies {
            let deps: Vec<ProjectEdge> = serde_json::from_value(deps.clone()).map_err(|err| {
                MoveError::GraphUnavailable(format!("{}: dependencies of '{project}': {err}", self.path))
            })?;
            edges.extend(deps);
        }
        Ok(edges)
    }
}

#[async_trait]
impl ProjectGraphProvider for JsonGraphProvider {
    async fn fetch(&self, tree: &dyn Tree) -> Result<Vec<ProjectEdge>> {
        let content = tree
            .read(&self.path)
            .ok_or_else(|| MoveError::GraphUnavailable(format!("{} does not exist", self.path)))?;
        self.parse(&content)
    }
}

/// Derives edges by scanning every project's module files: a file of A that
/// imports B's alias, or a file of B through a relative path, makes A depend
/// on B.
#[derive(Debug, Clone)]
pub struct ImportScanGraphProvider {
    projects: Projects,
    settings: WorkspaceSettings,
}

impl ImportScanGraphProvider {
    pub fn new(projects: Projects, settings: WorkspaceSettings) -> Self {
        Self { projects, settings }
    }
}

#[async_trait]
impl ProjectGraphProvider for ImportScanGraphProvider {
    async fn fetch(&self, tree: &dyn Tree) -> Result<Vec<ProjectEdge>> {
        let aliases = load_path_aliases(tree, &self.settings)?;
        let ignore = IgnoreMatcher::from_tree(tree);

        let project_aliases: Vec<(String, &str)> = self
            .projects
            .iter()
            .filter_map(|p| project_alias(tree, p, &aliases).map(|alias| (alias, p.name.as_str())))
            .collect();

        let mut edges: IndexSet<ProjectEdge> = IndexSet::new();
        for project in self.projects.iter() {
            let mut files = Vec::new();
            visit_not_ignored_files(tree, &ignore, &project.root, &mut |path| {
                if paths::is_source_file(path) {
                    files.push(path.to_string());
                }
            });

            for file in files {
                let Some(syntax) = tree.read(&file).and_then(|content| ModuleSyntax::parse(&file, &content))
                else {
                    continue;
                };
                for occurrence in &syntax.specifiers {
                    let target = match resolve_relative(&file, &occurrence.value) {
                        Some(resolved) => self.projects.owning(&resolved).map(|p| p.name.as_str()),
                        None => project_aliases
                            .iter()
                            .find(|(alias, _)| {
                                occurrence.value == *alias
                                    || occurrence
                                        .value
                                        .strip_prefix(alias.as_str())
                                        .is_some_and(|rest| rest.starts_with('/'))
                            })
                            .map(|(_, name)| *name),
                    };
                    if let Some(target) = target.filter(|target| *target != project.name) {
                        edges.insert(ProjectEdge::new(&project.name, target));
                    }
                }
            }
        }

        debug!(edges = edges.len(), "derived project graph from imports");
        Ok(edges.into_iter().collect())
    }
}

/// A provider whose graph is fetched on first use and then kept.
pub struct LazyGraph<'p> {
    provider: &'p dyn ProjectGraphProvider,
    graph: Option<ReverseDependencyGraph>,
}

impl<'p> LazyGraph<'p> {
    pub fn new(provider: &'p dyn ProjectGraphProvider) -> Self {
        Self { provider, graph: None }
    }

    pub fn is_fetched(&self) -> bool {
        self.graph.is_some()
    }

    /// Fetch the graph unless it is already held.
    pub async fn ensure_fetched(&mut self, tree: &dyn Tree) -> Result<()> {
        if self.graph.is_none() {
            let edges = self.provider.fetch(tree).await?;
            debug!(edges = edges.len(), "fetched project graph");
            self.graph = Some(ReverseDependencyGraph::from_edges(&edges));
        }
        Ok(())
    }

    /// Transitive dependents of `project`, fetching the graph if needed.
    pub async fn dependents_of(&mut self, tree: &dyn Tree, project: &str) -> Result<Vec<String>> {
        self.ensure_fetched(tree).await?;
        Ok(self
            .graph
            .as_ref()
            .map(|graph| graph.dependents_of(project))
            .unwrap_or_default())
    }
}

/// For every project, the projects that depend on it directly.
#[derive(Debug, Clone, Default)]
pub struct ReverseDependencyGraph {
    dependents: FxHashMap<String, Vec<String>>,
}

impl ReverseDependencyGraph {
    pub fn from_edges<'e>(edges: impl IntoIterator<Item = &'e ProjectEdge>) -> Self {
        let mut dependents: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for edge in edges {
            let entry = dependents.entry(edge.target.clone()).or_default();
            if !entry.contains(&edge.source) {
                entry.push(edge.source.clone());
            }
        }
        Self { dependents }
    }

    pub fn direct_dependents(&self, project: &str) -> &[String] {
        self.dependents.get(project).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every project depending on `project` directly or transitively, in
    /// breadth-first order, without `project` itself.
    pub fn dependents_of(&self, project: &str) -> Vec<String> {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        visited.insert(project);
        queue.push_back(project);

        while let Some(current) = queue.pop_front() {
            for dependent in self.direct_dependents(current) {
                if visited.insert(dependent.as_str()) {
                    order.push(dependent.clone());
                    queue.push_back(dependent.as_str());
                }
            }
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;
    use crate::tree::MemoryTree;
    use proptest::prelude::*;

    fn chain(names: &[&str]) -> Vec<ProjectEdge> {
        names.windows(2).map(|w| ProjectEdge::new(w[0], w[1])).collect()
    }

    #[test]
    fn dependents_of_chain_end_are_all_upstream_projects() {
        let graph = ReverseDependencyGraph::from_edges(&chain(&["a", "b", "c", "d"]));
        assert_eq!(graph.dependents_of("d"), vec!["c", "b", "a"]);
        assert!(graph.dependents_of("a").is_empty());
    }

    #[test]
    fn cycles_terminate_and_exclude_the_start() {
        let edges = vec![
            ProjectEdge::new("a", "b"),
            ProjectEdge::new("b", "c"),
            ProjectEdge::new("c", "a"),
        ];
        let graph = ReverseDependencyGraph::from_edges(&edges);
        assert_eq!(graph.dependents_of("a"), vec!["c", "b"]);
    }

    #[test]
    fn unknown_project_has_no_dependents() {
        let graph = ReverseDependencyGraph::default();
        assert!(graph.dependents_of("ghost").is_empty());
    }

    proptest! {
        #[test]
        fn chain_dependents_are_exactly_the_prefix(len in 2usize..12) {
            let names: Vec<String> = (0..len).map(|i| format!("p{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let graph = ReverseDependencyGraph::from_edges(&chain(&refs));

            let mut found = graph.dependents_of(&names[len - 1]);
            found.sort();
            let mut expected: Vec<String> = names[..len - 1].to_vec();
            expected.sort();
            prop_assert_eq!(found, expected);
        }
    }

    #[tokio::test]
    async fn json_provider_reads_wrapped_and_bare_shapes() {
        let tree = MemoryTree::with_files([
            (
                "graph.json",
                r#"{"graph": {"nodes": {}, "dependencies": {"c": [{"source": "c", "target": "a", "type": "static"}], "a": []}}}"#,
            ),
            ("bare.json", r#"{"dependencies": {"b": [{"source": "b", "target": "a"}]}}"#),
        ]);
        let edges = JsonGraphProvider::new("graph.json").fetch(&tree).await.unwrap();
        assert_eq!(edges, vec![ProjectEdge::new("c", "a")]);

        let edges = JsonGraphProvider::new("bare.json").fetch(&tree).await.unwrap();
        assert_eq!(edges, vec![ProjectEdge::new("b", "a")]);
    }

    #[tokio::test]
    async fn lazy_graph_fetches_on_first_query() {
        let provider = StaticGraphProvider::new(chain(&["a", "b"]));
        let mut graph = LazyGraph::new(&provider);
        assert!(!graph.is_fetched());
        let tree = MemoryTree::new();
        assert_eq!(graph.dependents_of(&tree, "b").await.unwrap(), vec!["a"]);
        assert!(graph.is_fetched());
    }

    #[tokio::test]
    async fn prefetched_graph_answers_queries() {
        let provider = StaticGraphProvider::new(chain(&["a", "b", "c"]));
        let mut graph = LazyGraph::new(&provider);
        let tree = MemoryTree::new();
        graph.ensure_fetched(&tree).await.unwrap();
        assert!(graph.is_fetched());
        assert_eq!(graph.dependents_of(&tree, "c").await.unwrap(), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn json_provider_reports_missing_file() {
        let err = JsonGraphProvider::new("nope.json")
            .fetch(&MemoryTree::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MoveError::GraphUnavailable(_)));
    }

    #[tokio::test]
    async fn import_scan_finds_alias_and_relative_edges() {
        let tree = MemoryTree::with_files([
            (
                "tsconfig.base.json",
                r#"{"compilerOptions": {"paths": {"@acme/a": ["libs/a/src/index.ts"]}}}"#,
            ),
            ("libs/a/src/index.ts", "export const a = 1;"),
            ("libs/b/src/index.ts", "import { a } from '@acme/a';\nexport const b = a;"),
            ("libs/c/src/index.ts", "export * from '../../b/src/index';"),
        ]);
        let projects: Projects = ["a", "b", "c"]
            .into_iter()
            .map(|name| Project::new(name, format!("libs/{name}")).with_source_root(format!("libs/{name}/src")))
            .collect();

        let edges = ImportScanGraphProvider::new(projects, WorkspaceSettings::default())
            .fetch(&tree)
            .await
            .unwrap();
        assert_eq!(edges, vec![ProjectEdge::new("b", "a"), ProjectEdge::new("c", "b")]);
    }
}
