//! Project discovery from manifest files.

use serde::Deserialize;
use tracing::{debug, warn};

use super::{Project, ProjectKind, Projects};
use crate::paths;
use crate::settings::WorkspaceSettings;
use crate::tree::{IgnoreMatcher, Tree, visit_not_ignored_files};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    name: Option<String>,
    source_root: Option<String>,
    #[serde(default)]
    project_type: ProjectKind,
}

/// Find every project manifest in the workspace.
///
/// The manifest's directory is the project root. Manifests that fail to parse
/// are skipped with a warning.
pub fn discover_projects(tree: &dyn Tree, ignore: &IgnoreMatcher, settings: &WorkspaceSettings) -> Projects {
    let mut manifests = Vec::new();
    visit_not_ignored_files(tree, ignore, "", &mut |path| {
        if paths::basename(path) == settings.project_manifest {
            manifests.push(path.to_string());
        }
    });

    let mut projects = Projects::new();
    for manifest_path in manifests {
        let Some(content) = tree.read(&manifest_path) else {
            continue;
        };
        let manifest: Manifest = match serde_json::from_str(&content) {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!(path = %manifest_path, %err, "skipping malformed project manifest");
                continue;
            }
        };

        let root = paths::dirname(&manifest_path).to_string();
        let name = manifest
            .name
            .unwrap_or_else(|| paths::basename(&root).to_string());
        let mut project = Project::new(name, root).with_kind(manifest.project_type);
        if let Some(source_root) = manifest.source_root {
            project = project.with_source_root(source_root);
        }

        if let Some(existing) = projects.get(&project.name) {
            warn!(
                name = %project.name,
                first = %existing.root,
                second = %project.root,
                "duplicate project name, keeping the first"
            );
            continue;
        }
        debug!(name = %project.name, root = %project.root, "discovered project");
        projects.insert(project);
    }

    projects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    #[test]
    fn reads_name_source_root_and_kind() {
        let tree = MemoryTree::with_files([
            (
                "apps/web/project.json",
                r#"{"name": "web", "sourceRoot": "apps/web/src", "projectType": "application"}"#,
            ),
            ("libs/util/project.json", r#"{"sourceRoot": "libs/util/src"}"#),
            ("libs/broken/project.json", "{"),
            ("node_modules/pkg/project.json", r#"{"name": "vendored"}"#),
        ]);

        let projects = discover_projects(&tree, &IgnoreMatcher::empty(), &WorkspaceSettings::default());
        let names: Vec<&str> = projects.names().collect();
        assert_eq!(names, vec!["web", "util"]);

        let web = projects.get("web").unwrap();
        assert_eq!(web.root, "apps/web");
        assert_eq!(web.source_root, "apps/web/src");
        assert_eq!(web.kind, ProjectKind::Application);

        let util = projects.get("util").unwrap();
        assert_eq!(util.kind, ProjectKind::Library);
    }

    #[test]
    fn source_root_defaults_to_root() {
        let tree = MemoryTree::with_files([("libs/plain/project.json", r#"{"name": "plain"}"#)]);
        let projects = discover_projects(&tree, &IgnoreMatcher::empty(), &WorkspaceSettings::default());
        assert_eq!(projects.get("plain").unwrap().source_root, "libs/plain");
    }
}
