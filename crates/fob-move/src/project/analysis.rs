//! Questions about a single project: its entrypoints, its alias, whether it
//! still holds any code.

use tracing::debug;

use super::{PathAliases, Project};
use crate::paths::{self, SOURCE_EXTENSIONS};
use crate::tree::{IgnoreMatcher, Tree, visit_not_ignored_files};

const ENTRYPOINT_STEM: &str = "index";

/// The alias under which other projects import `project`, if any.
///
/// Exact aliases with an existing target inside the project win, then exact
/// aliases whose target is a conventionally named entrypoint; shorter aliases
/// are preferred. Failing that, a wildcard alias such as `@scope/*` is
/// instantiated with the project's directory name. That last step is a
/// heuristic and may produce an alias the alias table would resolve elsewhere.
pub fn project_alias(tree: &dyn Tree, project: &Project, aliases: &PathAliases) -> Option<String> {
    let exact = aliases
        .iter()
        .filter(|entry| !entry.is_wildcard())
        .filter_map(|entry| {
            let inside: Vec<&String> = entry.targets.iter().filter(|t| project.contains(t)).collect();
            let rank = if inside.iter().any(|t| tree.is_file(t)) {
                0
            } else if inside.iter().any(|t| paths::file_stem(t) == ENTRYPOINT_STEM) {
                1
            } else {
                return None;
            };
            Some(((rank, entry.alias.split('/').count()), entry))
        })
        .min_by_key(|(key, _)| *key);
    if let Some((_, entry)) = exact {
        return Some(entry.alias.clone());
    }

    let dir_name = paths::basename(&project.root);
    if dir_name.is_empty() {
        return None;
    }
    for entry in aliases.iter().filter(|entry| entry.is_wildcard()) {
        for target in &entry.targets {
            let candidate = paths::normalize(&target.replacen('*', dir_name, 1));
            if project.contains(&candidate)
                && (tree.exists(&candidate) || paths::file_stem(&candidate) == ENTRYPOINT_STEM)
            {
                let alias = entry.alias.replacen('*', dir_name, 1);
                debug!(project = %project.name, %alias, pattern = %entry.alias, "derived alias from wildcard entry");
                return Some(alias);
            }
        }
    }
    None
}

/// Every existing entrypoint file of `project`.
///
/// Targets of the project's alias come first, followed by `index.*` files in
/// the source root, `<root>/src` and the root.
pub fn entrypoint_candidates(tree: &dyn Tree, project: &Project, aliases: &PathAliases) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let push = |path: String, candidates: &mut Vec<String>| {
        if tree.is_file(&path) && !candidates.contains(&path) {
            candidates.push(path);
        }
    };

    if let Some(alias) = project_alias(tree, project, aliases) {
        for target in aliases.targets_for(&alias) {
            if project.contains(&target) {
                push(target, &mut candidates);
            }
        }
    }

    let src = paths::join(&project.root, "src");
    let mut dirs: Vec<&str> = vec![&project.source_root, &src, &project.root];
    dirs.dedup();
    for dir in dirs {
        for ext in SOURCE_EXTENSIONS {
            push(paths::join(dir, &format!("{ENTRYPOINT_STEM}.{ext}")), &mut candidates);
        }
    }

    candidates
}

/// The entrypoint new exports are appended to.
pub fn primary_entrypoint(tree: &dyn Tree, project: &Project, aliases: &PathAliases) -> Option<String> {
    entrypoint_candidates(tree, project, aliases).into_iter().next()
}

/// Whether `project` holds no source file apart from its entrypoints.
pub fn is_project_empty(
    tree: &dyn Tree,
    ignore: &IgnoreMatcher,
    project: &Project,
    aliases: &PathAliases,
) -> bool {
    let entrypoints = entrypoint_candidates(tree, project, aliases);
    let mut has_code = false;
    visit_not_ignored_files(tree, ignore, &project.root, &mut |path| {
        if paths::is_source_file(path) && !entrypoints.iter().any(|entry| entry == path) {
            has_code = true;
        }
    });
    !has_code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    fn lib_a() -> Project {
        Project::new("a", "libs/a").with_source_root("libs/a/src")
    }

    #[test]
    fn alias_resolves_through_existing_target() {
        let tree = MemoryTree::with_files([("libs/a/src/index.ts", "export {};")]);
        let aliases = PathAliases::new([
            ("@acme/a/testing", vec!["libs/a/src/testing.ts"]),
            ("@acme/a", vec!["libs/a/src/index.ts"]),
            ("@acme/b", vec!["libs/b/src/index.ts"]),
        ]);
        assert_eq!(project_alias(&tree, &lib_a(), &aliases).as_deref(), Some("@acme/a"));
    }

    #[test]
    fn alias_resolves_through_conventional_name_without_file() {
        let tree = MemoryTree::new();
        let aliases = PathAliases::new([("@acme/a", vec!["libs/a/src/index.ts"])]);
        assert_eq!(project_alias(&tree, &lib_a(), &aliases).as_deref(), Some("@acme/a"));
    }

    #[test]
    fn wildcard_alias_is_a_best_effort_guess() {
        let tree = MemoryTree::with_files([("libs/a/src/index.ts", "export {};")]);
        let aliases = PathAliases::new([("@acme/*", vec!["libs/*/src/index.ts"])]);
        assert_eq!(project_alias(&tree, &lib_a(), &aliases).as_deref(), Some("@acme/a"));

        // The guess uses the directory name, not the project name, and does not
        // check that the alias table maps the result back to this project.
        let renamed = Project::new("renamed", "libs/a").with_source_root("libs/a/src");
        assert_eq!(project_alias(&tree, &renamed, &aliases).as_deref(), Some("@acme/a"));
    }

    #[test]
    fn no_alias_without_matching_entry() {
        let tree = MemoryTree::with_files([("libs/a/src/index.ts", "export {};")]);
        let aliases = PathAliases::new([("@acme/b", vec!["libs/b/src/index.ts"])]);
        assert!(project_alias(&tree, &lib_a(), &aliases).is_none());
    }

    #[test]
    fn entrypoints_include_every_existing_variant() {
        let tree = MemoryTree::with_files([
            ("libs/a/src/index.ts", "export {};"),
            ("libs/a/src/index.tsx", "export {};"),
            ("libs/a/index.js", "module.exports = {};"),
        ]);
        let candidates = entrypoint_candidates(&tree, &lib_a(), &PathAliases::default());
        assert_eq!(
            candidates,
            vec!["libs/a/src/index.ts", "libs/a/src/index.tsx", "libs/a/index.js"]
        );
    }

    #[test]
    fn alias_target_is_the_primary_entrypoint() {
        let tree = MemoryTree::with_files([
            ("libs/a/src/index.ts", "export {};"),
            ("libs/a/src/public-api.ts", "export {};"),
        ]);
        let aliases = PathAliases::new([("@acme/a", vec!["libs/a/src/public-api.ts"])]);
        assert_eq!(
            primary_entrypoint(&tree, &lib_a(), &aliases).as_deref(),
            Some("libs/a/src/public-api.ts")
        );
    }

    #[test]
    fn project_with_only_entrypoint_is_empty() {
        let mut tree = MemoryTree::with_files([
            ("libs/a/project.json", "{}"),
            ("libs/a/src/index.ts", "export {};"),
            ("libs/a/src/lib/x.ts", "export const x = 1;"),
        ]);
        let aliases = PathAliases::default();
        assert!(!is_project_empty(&tree, &IgnoreMatcher::empty(), &lib_a(), &aliases));

        tree.delete("libs/a/src/lib/x.ts");
        assert!(is_project_empty(&tree, &IgnoreMatcher::empty(), &lib_a(), &aliases));
    }
}
