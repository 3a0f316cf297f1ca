//! Ignore-aware traversal of a [`Tree`].

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::debug;

use super::Tree;
use crate::paths;

/// Directory names that are never traversed.
const ALWAYS_IGNORED: &[&str] = &["node_modules", ".git"];

/// Matcher built from the workspace's root `.gitignore`.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    gitignore: Gitignore,
}

impl IgnoreMatcher {
    /// Build a matcher from the `.gitignore` at the root of `tree`, if any.
    pub fn from_tree(tree: &dyn Tree) -> Self {
        let mut builder = GitignoreBuilder::new("");
        if let Some(content) = tree.read(".gitignore") {
            for line in content.lines() {
                if let Err(err) = builder.add_line(None, line) {
                    debug!(line, %err, "skipping unparsable .gitignore line");
                }
            }
        }
        let gitignore = builder.build().unwrap_or_else(|err| {
            debug!(%err, "falling back to an empty ignore matcher");
            Gitignore::empty()
        });
        Self { gitignore }
    }

    /// A matcher that ignores only the built-in directories.
    pub fn empty() -> Self {
        Self {
            gitignore: Gitignore::empty(),
        }
    }

    /// Whether `path` should be skipped.
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        if path.split('/').any(|part| ALWAYS_IGNORED.contains(&part)) {
            return true;
        }
        if path.is_empty() {
            return false;
        }
        self.gitignore
            .matched_path_or_any_parents(path, is_dir)
            .is_ignore()
    }
}

/// Visit every file under `dir` that is not ignored, depth first in name order.
pub fn visit_not_ignored_files(
    tree: &dyn Tree,
    ignore: &IgnoreMatcher,
    dir: &str,
    visitor: &mut dyn FnMut(&str),
) {
    let dir = paths::normalize(dir);
    if tree.is_file(&dir) {
        if !ignore.is_ignored(&dir, false) {
            visitor(&dir);
        }
        return;
    }

    for child in tree.children(&dir) {
        let path = paths::join(&dir, &child);
        let is_file = tree.is_file(&path);
        if ignore.is_ignored(&path, !is_file) {
            continue;
        }
        if is_file {
            visitor(&path);
        } else {
            visit_not_ignored_files(tree, ignore, &path, visitor);
        }
    }
}
