//! Move context resolution.
//!
//! A [`MoveContext`] is the validated description of one file's relocation.
//! Resolution only reads the workspace, so every context of a batch is
//! computed against the same pre-move snapshot.

use std::sync::Arc;

use tracing::debug;

use crate::error::{MoveError, Result};
use crate::exports;
use crate::imports::{key_matches_file, mentions_any, module_key, refers_to, specifier_candidates};
use crate::options::MoveOptions;
use crate::paths;
use crate::project::Project;
use crate::security;
use crate::workspace::Workspace;

/// Everything needed to move one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveContext {
    /// Current location
    pub source: String,
    /// Destination
    pub target: String,
    pub source_project: Project,
    pub target_project: Project,
    /// Content of the source at resolution time
    pub content: Arc<str>,
    /// Whether a source entrypoint re-exports the file
    pub is_exported: bool,
    pub source_alias: Option<String>,
    pub target_alias: Option<String>,
    pub source_entrypoints: Vec<String>,
    /// Entrypoint new re-exports are appended to
    pub target_entrypoint: Option<String>,
    /// Whether files of the target project already import the source
    pub target_references_source: bool,
    pub same_project: bool,
}

impl MoveContext {
    /// Whether the moved file should end up re-exported from the target
    /// entrypoint.
    pub fn should_export(&self, options: &MoveOptions) -> bool {
        !options.skip_export && (self.is_exported || self.target_references_source)
    }
}

/// Resolve the move of `file` described by `options`.
pub fn resolve_context(workspace: &mut Workspace<'_>, file: &str, options: &MoveOptions) -> Result<MoveContext> {
    security::validate_input("file", file, options.allow_unicode, false)?;
    let source = security::sanitize_path("file", file)?;

    let Some(content) = workspace.read(&source) else {
        return Err(MoveError::SourceNotFound(source));
    };

    let target_project = workspace.project(&options.project)?.clone();
    let source_project = workspace
        .projects()
        .owning(&source)
        .cloned()
        .ok_or_else(|| MoveError::OwningProjectNotFound(source.clone()))?;

    let target = target_path(&source, &source_project, &target_project, options)?;
    if workspace.exists(&target) {
        return Err(MoveError::TargetExists(target));
    }

    let same_project = source_project.name == target_project.name;
    let source_alias = workspace.project_alias(&source_project)?;
    let target_alias = workspace.project_alias(&target_project)?;
    let source_entrypoints = workspace.entrypoints(&source_project)?;
    let target_entrypoint = workspace.primary_entrypoint(&target_project)?;
    let is_exported = exports::is_exported(workspace, &source_entrypoints, &source);

    let target_references_source = !same_project
        && project_references(
            workspace,
            &target_project,
            &source,
            is_exported.then_some(source_alias.as_deref()).flatten(),
        )?;

    let context = MoveContext {
        source,
        target,
        source_project,
        target_project,
        content,
        is_exported,
        source_alias,
        target_alias,
        source_entrypoints,
        target_entrypoint,
        target_references_source,
        same_project,
    };
    debug!(
        source = %context.source,
        target = %context.target,
        exported = context.is_exported,
        referenced_by_target = context.target_references_source,
        "resolved move context"
    );
    Ok(context)
}

/// `<target source root>/<lib|app>/<subdirectory>/<file name>`.
fn target_path(source: &str, source_project: &Project, target_project: &Project, options: &MoveOptions) -> Result<String> {
    let base = paths::join(&target_project.source_root, target_project.kind.base_dir());
    let subdirectory = match &options.project_directory {
        Some(dir) => security::sanitize_path("projectDirectory", dir)?,
        None if options.derive_project_directory => derived_subdirectory(source, source_project),
        None => String::new(),
    };
    Ok(paths::join(&paths::join(&base, &subdirectory), paths::basename(source)))
}

/// Directory of `source` relative to its project's `lib`/`app` folder (or
/// source root when it lives outside of it).
fn derived_subdirectory(source: &str, project: &Project) -> String {
    let base = paths::join(&project.source_root, project.kind.base_dir());
    let dir = paths::dirname(source);
    if paths::is_within(dir, &base) {
        paths::relative(&base, dir)
    } else {
        paths::relative(&project.source_root, dir)
    }
}

/// Whether a file of `project` imports `file`, either relatively, through an
/// alias mapping straight to it, or through `exported_alias` when given.
pub fn project_references(
    workspace: &mut Workspace<'_>,
    project: &Project,
    file: &str,
    exported_alias: Option<&str>,
) -> Result<bool> {
    let aliases = workspace.path_aliases()?;
    let mut needles = specifier_candidates(file);
    needles.extend(exported_alias.map(str::to_string));

    for importer in workspace.source_files(&project.root) {
        if importer == file {
            continue;
        }
        let Some(content) = workspace.read(&importer) else {
            continue;
        };
        if !mentions_any(&content, &needles) {
            continue;
        }
        let Some(syntax) = workspace.syntax(&importer) else {
            continue;
        };
        let found = syntax.specifiers.iter().any(|occurrence| {
            refers_to(&importer, &occurrence.value, file)
                || exported_alias == Some(occurrence.value.as_str())
                || aliases
                    .targets_for(&occurrence.value)
                    .iter()
                    .any(|target| key_matches_file(&module_key(target), file))
        });
        if found {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ProjectKind, Projects};
    use crate::settings::WorkspaceSettings;
    use crate::tree::MemoryTree;

    fn projects() -> Projects {
        [
            Project::new("a", "libs/a").with_source_root("libs/a/src"),
            Project::new("b", "libs/b").with_source_root("libs/b/src"),
            Project::new("web", "apps/web")
                .with_source_root("apps/web/src")
                .with_kind(ProjectKind::Application),
        ]
        .into_iter()
        .collect()
    }

    fn tree() -> MemoryTree {
        MemoryTree::with_files([
            (
                "tsconfig.base.json",
                r#"{"compilerOptions": {"paths": {"@acme/a": ["libs/a/src/index.ts"], "@acme/b": ["libs/b/src/index.ts"]}}}"#,
            ),
            ("libs/a/src/index.ts", "export * from './lib/exported';\n"),
            ("libs/a/src/lib/exported.ts", "export const e = 1;\n"),
            ("libs/a/src/lib/utils/helper.ts", "export const h = 1;\n"),
            ("libs/b/src/index.ts", "export {};\n"),
            ("libs/b/src/lib/user.ts", "import { e } from '@acme/a';\n"),
        ])
    }

    fn resolve(tree: &mut MemoryTree, file: &str, options: &MoveOptions) -> Result<MoveContext> {
        let mut workspace = Workspace::with_projects(tree, WorkspaceSettings::default(), projects());
        resolve_context(&mut workspace, file, options)
    }

    #[test]
    fn non_exported_file_lands_in_target_lib() {
        let mut tree = tree();
        let ctx = resolve(&mut tree, "libs/a/src/lib/utils/helper.ts", &MoveOptions::new("", "b")).unwrap();
        assert_eq!(ctx.target, "libs/b/src/lib/helper.ts");
        assert_eq!(ctx.source_project.name, "a");
        assert!(!ctx.is_exported);
        assert!(!ctx.target_references_source);
        assert_eq!(ctx.source_alias.as_deref(), Some("@acme/a"));
        assert_eq!(ctx.target_alias.as_deref(), Some("@acme/b"));
        assert!(!ctx.same_project);
    }

    #[test]
    fn derived_and_explicit_subdirectories() {
        let mut tree = tree();
        let derived = MoveOptions {
            derive_project_directory: true,
            ..MoveOptions::new("", "web")
        };
        let ctx = resolve(&mut tree, "libs/a/src/lib/utils/helper.ts", &derived).unwrap();
        assert_eq!(ctx.target, "apps/web/src/app/utils/helper.ts");

        let explicit = MoveOptions {
            project_directory: Some("shared/tools".into()),
            ..MoveOptions::new("", "b")
        };
        let ctx = resolve(&mut tree, "libs/a/src/lib/utils/helper.ts", &explicit).unwrap();
        assert_eq!(ctx.target, "libs/b/src/lib/shared/tools/helper.ts");
    }

    #[test]
    fn exported_file_referenced_through_alias_by_target() {
        let mut tree = tree();
        let ctx = resolve(&mut tree, "libs/a/src/lib/exported.ts", &MoveOptions::new("", "b")).unwrap();
        assert!(ctx.is_exported);
        assert!(ctx.target_references_source);
        assert!(ctx.should_export(&MoveOptions::new("", "b")));
        assert!(!ctx.should_export(&MoveOptions {
            skip_export: true,
            ..MoveOptions::new("", "b")
        }));
    }

    #[test]
    fn resolution_errors() {
        let mut tree = tree();
        let options = MoveOptions::new("", "b");
        assert!(matches!(
            resolve(&mut tree, "libs/a/src/lib/missing.ts", &options),
            Err(MoveError::SourceNotFound(_))
        ));
        assert!(matches!(
            resolve(&mut tree, "libs/a/src/lib/utils/helper.ts", &MoveOptions::new("", "zzz")),
            Err(MoveError::ProjectNotFound(_))
        ));
        assert!(matches!(
            resolve(&mut tree, "tsconfig.base.json", &options),
            Err(MoveError::OwningProjectNotFound(_))
        ));
        assert!(matches!(
            resolve(&mut tree, "libs/b/src/lib/user.ts", &options),
            Err(MoveError::TargetExists(_))
        ));
        assert!(matches!(
            resolve(&mut tree, "../outside.ts", &options),
            Err(MoveError::InvalidInput { .. })
        ));
    }

    #[test]
    fn resolution_never_writes() {
        let mut tree = tree();
        resolve(&mut tree, "libs/a/src/lib/exported.ts", &MoveOptions::new("", "b")).unwrap();
        assert!(crate::tree::Tree::changes(&tree).is_empty());
    }
}
