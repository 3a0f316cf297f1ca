//! In-memory [`Tree`] implementation.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::{ChangeKind, FileChange, Tree};
use crate::paths;

/// A workspace held entirely in memory.
///
/// Tracks the original content of every path it touches so [`Tree::changes`]
/// can distinguish creations from updates and drop no-op rewrites.
///
/// # Example
///
/// ```rust
/// use fob_move::tree::{MemoryTree, Tree};
///
/// let mut tree = MemoryTree::new();
/// tree.write("libs/a/src/index.ts", "export * from './lib/a';\n");
/// assert!(tree.exists("libs/a/src"));
/// assert_eq!(tree.children("libs/a/src"), vec!["index.ts"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryTree {
    files: BTreeMap<String, String>,
    /// Original content of touched paths (`None` = did not exist)
    originals: FxHashMap<String, Option<String>>,
}

impl MemoryTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree pre-populated with files. Seeded files are not reported
    /// as changes.
    pub fn with_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(path, content)| (paths::normalize(path.as_ref()), content.into()))
            .collect();
        Self {
            files,
            originals: FxHashMap::default(),
        }
    }

    /// All file paths currently in the tree.
    pub fn file_paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    fn remember_original(&mut self, path: &str) {
        if !self.originals.contains_key(path) {
            let original = self.files.get(path).cloned();
            self.originals.insert(path.to_string(), original);
        }
    }
}

impl Tree for MemoryTree {
    fn read(&self, path: &str) -> Option<String> {
        self.files.get(&paths::normalize(path)).cloned()
    }

    fn write(&mut self, path: &str, content: &str) {
        let path = paths::normalize(path);
        self.remember_original(&path);
        self.files.insert(path, content.to_string());
    }

    fn exists(&self, path: &str) -> bool {
        let path = paths::normalize(path);
        if path.is_empty() || self.files.contains_key(&path) {
            return true;
        }
        let prefix = format!("{path}/");
        self.files
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }

    fn is_file(&self, path: &str) -> bool {
        self.files.contains_key(&paths::normalize(path))
    }

    fn delete(&mut self, path: &str) {
        let path = paths::normalize(path);
        if self.files.contains_key(&path) {
            self.remember_original(&path);
            self.files.remove(&path);
        }
    }

    fn children(&self, dir: &str) -> Vec<String> {
        let dir = paths::normalize(dir);
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut names: Vec<String> = self
            .files
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, _)| key[prefix.len()..].split('/').next())
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn changes(&self) -> Vec<FileChange> {
        let mut changes: Vec<FileChange> = self
            .originals
            .iter()
            .filter_map(|(path, original)| {
                let current = self.files.get(path);
                let kind = match (original, current) {
                    (None, Some(_)) => ChangeKind::Create,
                    (Some(_), None) => ChangeKind::Delete,
                    (Some(before), Some(after)) if before != after => ChangeKind::Update,
                    _ => return None,
                };
                Some(FileChange {
                    path: path.clone(),
                    kind,
                })
            })
            .collect();
        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_lists_files_and_directories_once() {
        let tree = MemoryTree::with_files([
            ("libs/a/project.json", "{}"),
            ("libs/a/src/index.ts", ""),
            ("libs/a/src/lib/a.ts", ""),
            ("libs/b/src/index.ts", ""),
        ]);
        assert_eq!(tree.children(""), vec!["libs"]);
        assert_eq!(tree.children("libs"), vec!["a", "b"]);
        assert_eq!(tree.children("libs/a"), vec!["project.json", "src"]);
    }

    #[test]
    fn exists_matches_directories_on_component_boundary() {
        let tree = MemoryTree::with_files([("libs/ab/x.ts", "")]);
        assert!(tree.exists("libs/ab"));
        assert!(!tree.exists("libs/a"));
        assert!(!tree.is_file("libs/ab"));
    }

    #[test]
    fn changes_classify_create_update_delete() {
        let mut tree = MemoryTree::with_files([("a.ts", "a"), ("b.ts", "b"), ("c.ts", "c")]);
        tree.write("a.ts", "changed");
        tree.write("d.ts", "new");
        tree.delete("b.ts");
        tree.write("c.ts", "c");

        let changes = tree.changes();
        assert_eq!(
            changes,
            vec![
                FileChange { path: "a.ts".into(), kind: ChangeKind::Update },
                FileChange { path: "b.ts".into(), kind: ChangeKind::Delete },
                FileChange { path: "d.ts".into(), kind: ChangeKind::Create },
            ]
        );
    }

    #[test]
    fn create_then_delete_is_not_a_change() {
        let mut tree = MemoryTree::new();
        tree.write("tmp.ts", "x");
        tree.delete("tmp.ts");
        assert!(tree.changes().is_empty());
    }
}
