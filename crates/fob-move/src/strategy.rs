//! The four ways a file can move, and how each one rewrites the workspace.
//!
//! ```text
//!                     same project? ── yes ──▶ SameProject
//!                           │ no
//!        exported and both aliases known? ── yes ──▶ ExportedCrossProject
//!                           │ no
//!                 target alias known? ── yes ──▶ NonExportedAlias
//!                           │ no
//!                           ▼
//!                        Fallback
//! ```
//!
//! After the strategy-specific rewrites, every move fixes relative imports of
//! the file inside the target project, turns alias imports of it inside the
//! target project into relative ones, and adds the file to the target
//! entrypoint when it was exported or already used there.

use std::fmt;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::context::MoveContext;
use crate::error::{MoveError, Result};
use crate::exports;
use crate::graph::LazyGraph;
use crate::imports::{
    is_relative, key_matches_file, module_key, rebase_relative, refers_to, relative_specifier,
    relative_specifier_like, rewrite_file, rewrite_specifiers, specifier_candidates,
};
use crate::options::MoveOptions;
use crate::paths;
use crate::project::{self, PathAliases, Project};
use crate::security::escape_regex;
use crate::syntax::{ModuleSyntax, SpecifierOccurrence};
use crate::workspace::Workspace;

/// How a single file is moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveStrategy {
    /// Source and target project are the same.
    SameProject,
    /// The file is re-exported and both projects have an alias.
    ExportedCrossProject,
    /// The target project has an alias; the file is not re-exported.
    NonExportedAlias,
    /// No alias to rewrite to; references become relative paths.
    Fallback,
}

impl MoveStrategy {
    pub fn select(context: &MoveContext) -> Self {
        if context.same_project {
            MoveStrategy::SameProject
        } else if context.is_exported && context.source_alias.is_some() && context.target_alias.is_some() {
            MoveStrategy::ExportedCrossProject
        } else if context.target_alias.is_some() {
            MoveStrategy::NonExportedAlias
        } else {
            MoveStrategy::Fallback
        }
    }

    /// Whether executing the strategy consults the project graph.
    pub fn needs_graph(self) -> bool {
        matches!(self, MoveStrategy::ExportedCrossProject)
    }
}

impl fmt::Display for MoveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveStrategy::SameProject => "same-project",
            MoveStrategy::ExportedCrossProject => "exported-cross-project",
            MoveStrategy::NonExportedAlias => "non-exported-alias",
            MoveStrategy::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Runs strategies for the files of one batch.
pub(crate) struct Executor<'r, 't> {
    pub workspace: &'r mut Workspace<'t>,
    /// Every context of the batch
    pub batch: &'r [MoveContext],
    pub options: &'r MoveOptions,
    pub graph: LazyGraph<'r>,
    pub warnings: usize,
}

impl Executor<'_, '_> {
    pub async fn execute(&mut self, context: &MoveContext, strategy: MoveStrategy) -> Result<()> {
        let aliases = self.workspace.path_aliases()?;
        let target_entrypoint = context.target_entrypoint.clone();
        let will_export = context.should_export(self.options) && target_entrypoint.is_some();

        self.write_moved_file(context, &aliases);

        if context.is_exported && !context.same_project && strategy != MoveStrategy::ExportedCrossProject {
            // The source entrypoint would otherwise point at a deleted file.
            exports::remove_export(self.workspace, &context.source_entrypoints, &context.source);
        }

        match strategy {
            MoveStrategy::SameProject => {
                self.rewrite_relative_references(context, &context.source_project, |importer, occurrence| {
                    relative_specifier_like(importer, &context.target, &occurrence.value)
                });
            }
            MoveStrategy::ExportedCrossProject => {
                let (Some(source_alias), Some(target_alias)) = (&context.source_alias, &context.target_alias) else {
                    return Ok(());
                };
                let moved_exports = exported_names(&context.content, &context.source);
                let mut aliased = 0;
                for name in self.dependents(context, source_alias).await? {
                    let Some(dependent) = self.workspace.projects().get(&name).cloned() else {
                        continue;
                    };
                    let is_target = dependent.name == context.target_project.name;
                    let rewritten =
                        self.rewrite_alias_references(&dependent, context, source_alias, moved_exports.as_deref(), |importer| {
                            if is_target {
                                relative_specifier(importer, &context.target)
                            } else {
                                target_alias.clone()
                            }
                        });
                    if !is_target {
                        aliased += rewritten;
                    }
                }
                if aliased > 0 && !will_export {
                    warn!(
                        alias = %target_alias,
                        file = %context.target,
                        files = aliased,
                        "dependents now import an alias that does not export the moved file"
                    );
                    self.warnings += aliased;
                }
                exports::remove_export(self.workspace, &context.source_entrypoints, &context.source);
                self.rewrite_to_alias(context, target_alias, will_export);
            }
            MoveStrategy::NonExportedAlias => {
                if let Some(target_alias) = &context.target_alias {
                    self.rewrite_to_alias(context, target_alias, will_export);
                }
            }
            MoveStrategy::Fallback => {
                self.rewrite_relative_references(context, &context.source_project, |importer, occurrence| {
                    relative_specifier_like(importer, &context.target, &occurrence.value)
                });
            }
        }

        if !context.same_project {
            self.rewrite_relative_references(context, &context.target_project, |importer, occurrence| {
                relative_specifier_like(importer, &context.target, &occurrence.value)
            });
        }

        if context.target_references_source {
            self.rewrite_target_alias_references(context, &aliases);
        }

        if context.should_export(self.options) {
            match &target_entrypoint {
                Some(entrypoint) => {
                    exports::ensure_exported(self.workspace, entrypoint, &context.target);
                }
                None => {
                    warn!(
                        project = %context.target_project.name,
                        file = %context.target,
                        "target project has no entrypoint, the moved file is not exported"
                    );
                    self.warnings += 1;
                }
            }
        }

        Ok(())
    }

    /// Write the moved file at its destination with its own specifiers
    /// re-anchored to the new location.
    fn write_moved_file(&mut self, context: &MoveContext, aliases: &PathAliases) {
        let content = self
            .workspace
            .read(&context.source)
            .unwrap_or_else(|| context.content.clone());
        let updated = match self.workspace.syntax(&context.source) {
            Some(syntax) => {
                let workspace = &mut *self.workspace;
                let batch = self.batch;
                let warnings = &mut self.warnings;
                rewrite_specifiers(&content, &syntax, |occurrence| {
                    retarget_own_specifier(workspace, batch, aliases, context, occurrence, warnings)
                })
                .unwrap_or_else(|| content.to_string())
            }
            None => content.to_string(),
        };
        debug!(source = %context.source, target = %context.target, "writing moved file");
        self.workspace.write(&context.target, &updated);
    }

    /// Replace relative imports of the moved file inside `project`.
    fn rewrite_relative_references(
        &mut self,
        context: &MoveContext,
        project: &Project,
        mut replacement: impl FnMut(&str, &SpecifierOccurrence) -> String,
    ) -> usize {
        let needles = specifier_candidates(&context.source);
        let mut rewritten = 0;
        for file in self.workspace.source_files(&project.root) {
            if self.is_pending(&file) || file == context.target {
                continue;
            }
            let changed = rewrite_file(self.workspace, &file, &needles, |occurrence| {
                refers_to(&file, &occurrence.value, &context.source).then(|| replacement(&file, occurrence))
            });
            if changed {
                rewritten += 1;
            }
        }
        rewritten
    }

    /// Point relative imports of the moved file in the source project at the
    /// target alias.
    fn rewrite_to_alias(&mut self, context: &MoveContext, target_alias: &str, will_export: bool) {
        let source_project = context.source_project.clone();
        let rewritten = self.rewrite_relative_references(context, &source_project, |_, _| target_alias.to_string());
        if rewritten > 0 && !will_export {
            warn!(
                alias = %target_alias,
                file = %context.target,
                files = rewritten,
                "imports now use an alias that does not export the moved file"
            );
            self.warnings += rewritten;
        }
    }

    /// Replace `source_alias` imports in `project` that may use the moved file.
    /// Returns the number of files written.
    fn rewrite_alias_references(
        &mut self,
        project: &Project,
        context: &MoveContext,
        source_alias: &str,
        moved_exports: Option<&[String]>,
        mut replacement: impl FnMut(&str) -> String,
    ) -> usize {
        let needles = vec![source_alias.to_string()];
        let mut partial = Vec::new();
        let mut rewritten = 0;
        for file in self.workspace.source_files(&project.root) {
            if self.is_pending(&file) || file == context.target {
                continue;
            }
            let changed = rewrite_file(self.workspace, &file, &needles, |occurrence| {
                if occurrence.value != source_alias {
                    return None;
                }
                match (&occurrence.imported, moved_exports) {
                    (Some(imported), Some(exported)) => {
                        let used = imported.iter().filter(|name| exported.contains(name)).count();
                        if used == 0 {
                            return None;
                        }
                        if used < imported.len() {
                            partial.push(file.clone());
                        }
                        Some(replacement(&file))
                    }
                    _ => Some(replacement(&file)),
                }
            });
            if changed {
                rewritten += 1;
            }
        }
        for file in partial {
            warn!(
                %file,
                alias = %source_alias,
                "import mixes names of the moved file with other exports of the alias"
            );
            self.warnings += 1;
        }
        rewritten
    }

    /// Turn alias imports that resolve to the moved file inside the target
    /// project into relative imports.
    fn rewrite_target_alias_references(&mut self, context: &MoveContext, aliases: &PathAliases) {
        let exported_alias = context
            .is_exported
            .then_some(context.source_alias.as_deref())
            .flatten();
        let target_project = context.target_project.clone();
        for file in self.workspace.source_files(&target_project.root) {
            if self.is_pending(&file) || file == context.target {
                continue;
            }
            rewrite_file(self.workspace, &file, &[], |occurrence| {
                if is_relative(&occurrence.value) {
                    return None;
                }
                let direct = aliases
                    .targets_for(&occurrence.value)
                    .iter()
                    .any(|target| key_matches_file(&module_key(target), &context.source));
                (direct || exported_alias == Some(occurrence.value.as_str()))
                    .then(|| relative_specifier(&file, &context.target))
            });
        }
    }

    /// Projects that may import the moved file through `source_alias`.
    async fn dependents(&mut self, context: &MoveContext, source_alias: &str) -> Result<Vec<String>> {
        let dependents = self
            .graph
            .dependents_of(self.workspace.tree(), &context.source_project.name)
            .await?;
        if !dependents.is_empty() {
            return Ok(dependents);
        }

        debug!(alias = %source_alias, "no dependents in project graph, scanning every project");
        let pattern = format!(r#"['"`]{}['"`]"#, escape_regex(source_alias));
        let literal = Regex::new(&pattern).map_err(|err| MoveError::InvalidPattern {
            pattern: pattern.clone(),
            reason: err.to_string(),
        })?;

        let projects: Vec<Project> = self.workspace.projects().iter().cloned().collect();
        let mut found = Vec::new();
        for project in projects {
            if project.name == context.source_project.name {
                continue;
            }
            let mentions = self
                .workspace
                .source_files(&project.root)
                .iter()
                .any(|file| self.workspace.read(file).is_some_and(|content| literal.is_match(&content)));
            if mentions {
                found.push(project.name);
            }
        }
        Ok(found)
    }

    /// Whether `file` is a batch source that has not been deleted yet.
    fn is_pending(&self, file: &str) -> bool {
        self.batch.iter().any(|context| context.source == file)
    }
}

/// Names exported by the moved module, `None` when it re-exports other
/// modules and the full set is unknown.
fn exported_names(content: &str, path: &str) -> Option<Vec<String>> {
    let syntax = ModuleSyntax::parse(path, content)?;
    if !syntax.reexports.is_empty() {
        return None;
    }
    let mut names = syntax.named_exports;
    if syntax.default_export.is_some() {
        names.push("default".to_string());
    }
    Some(names)
}

/// New value for a specifier of the moved file itself.
fn retarget_own_specifier(
    workspace: &mut Workspace<'_>,
    batch: &[MoveContext],
    aliases: &PathAliases,
    context: &MoveContext,
    occurrence: &SpecifierOccurrence,
    warnings: &mut usize,
) -> Option<String> {
    let specifier = occurrence.value.as_str();
    if !is_relative(specifier) {
        return None;
    }
    let absolute = paths::join(paths::dirname(&context.source), specifier);
    let key = module_key(&absolute);

    if let Some(other) = batch.iter().find(|other| key_matches_file(&key, &other.source)) {
        if other.source == context.source {
            return None;
        }
        if other.target_project.name == context.target_project.name {
            return Some(relative_specifier_like(&context.target, &other.target, specifier));
        }
        return Some(
            project::project_alias(workspace.tree(), &other.target_project, aliases)
                .unwrap_or_else(|| relative_specifier_like(&context.target, &other.target, specifier)),
        );
    }

    let owner = workspace.projects().owning(&absolute).cloned();
    match owner {
        Some(owner) if owner.name != context.target_project.name => {
            let Some(alias) = project::project_alias(workspace.tree(), &owner, aliases) else {
                return rebase_relative(&context.source, &context.target, specifier);
            };
            let entrypoints = project::entrypoint_candidates(workspace.tree(), &owner, aliases);
            let reachable = match workspace.resolve_module(&key) {
                Some(file) => {
                    entrypoints.contains(&file) || exports::is_exported(workspace, &entrypoints, &file)
                }
                None => false,
            };
            if !reachable {
                warn!(
                    file = %context.target,
                    specifier,
                    %alias,
                    "rewritten import may not be reachable through the alias"
                );
                *warnings += 1;
            }
            Some(alias)
        }
        _ => rebase_relative(&context.source, &context.target, specifier),
    }
}
