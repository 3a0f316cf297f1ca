//! On-disk [`Tree`] implementation with staged writes.
//!
//! Reads fall through to the file system; writes and deletes are kept in an
//! overlay until [`FsTree::flush`] applies them. A move that fails half way
//! therefore leaves the checkout exactly as it was.

// FsTree is the one place that is allowed to talk to std::fs
#![allow(clippy::disallowed_methods)]

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ChangeKind, FileChange, Tree};
use crate::paths;

/// File system tree rooted at a workspace directory.
#[derive(Debug)]
pub struct FsTree {
    root: PathBuf,
    /// Staged content per path (`None` = staged delete)
    staged: BTreeMap<String, Option<String>>,
}

impl FsTree {
    /// Create a tree over `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            staged: BTreeMap::new(),
        }
    }

    /// Workspace root on disk.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn disk_path(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }

    /// Apply every staged change to disk and return what was applied.
    ///
    /// Directories emptied by deletions are removed as well.
    pub fn flush(&mut self) -> io::Result<Vec<FileChange>> {
        let changes = self.changes();
        let staged = std::mem::take(&mut self.staged);

        for (path, content) in &staged {
            let target = self.disk_path(path);
            match content {
                Some(text) => {
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&target, text)?;
                }
                None => match fs::remove_file(&target) {
                    Ok(()) => self.prune_empty_parents(path),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e),
                },
            }
        }

        debug!(applied = changes.len(), root = %self.root.display(), "flushed staged changes");
        Ok(changes)
    }

    fn prune_empty_parents(&self, path: &str) {
        let mut dir = paths::dirname(path).to_string();
        while !dir.is_empty() {
            let disk = self.disk_path(&dir);
            let is_empty = fs::read_dir(&disk)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if !is_empty || fs::remove_dir(&disk).is_err() {
                break;
            }
            dir = paths::dirname(&dir).to_string();
        }
    }

    fn disk_is_file(&self, path: &str) -> bool {
        self.disk_path(path).is_file()
    }
}

impl Tree for FsTree {
    fn read(&self, path: &str) -> Option<String> {
        let path = paths::normalize(path);
        if let Some(staged) = self.staged.get(&path) {
            return staged.clone();
        }
        fs::read_to_string(self.disk_path(&path)).ok()
    }

    fn write(&mut self, path: &str, content: &str) {
        self.staged
            .insert(paths::normalize(path), Some(content.to_string()));
    }

    fn exists(&self, path: &str) -> bool {
        let path = paths::normalize(path);
        match self.staged.get(&path) {
            Some(Some(_)) => return true,
            Some(None) => return false,
            None => {}
        }
        if self.disk_path(&path).exists() {
            return true;
        }
        let prefix = format!("{path}/");
        self.staged
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .any(|(_, content)| content.is_some())
    }

    fn is_file(&self, path: &str) -> bool {
        let path = paths::normalize(path);
        match self.staged.get(&path) {
            Some(content) => content.is_some(),
            None => self.disk_is_file(&path),
        }
    }

    fn delete(&mut self, path: &str) {
        let path = paths::normalize(path);
        if self.disk_is_file(&path) {
            self.staged.insert(path, None);
        } else {
            self.staged.remove(&path);
        }
    }

    fn children(&self, dir: &str) -> Vec<String> {
        let dir = paths::normalize(dir);
        let mut names: Vec<String> = fs::read_dir(self.disk_path(&dir))
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        for (path, content) in self
            .staged
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
        {
            let rest = &path[prefix.len()..];
            match (rest.split_once('/'), content) {
                (Some((child, _)), Some(_)) => names.push(child.to_string()),
                (None, Some(_)) => names.push(rest.to_string()),
                (None, None) => names.retain(|name| name != rest),
                (Some(_), None) => {}
            }
        }

        names.sort();
        names.dedup();
        names
    }

    fn changes(&self) -> Vec<FileChange> {
        self.staged
            .iter()
            .filter_map(|(path, content)| {
                let on_disk = self.disk_is_file(path);
                let kind = match (content, on_disk) {
                    (Some(_), false) => ChangeKind::Create,
                    (Some(text), true) => {
                        let current = fs::read_to_string(self.disk_path(path)).ok();
                        if current.as_deref() == Some(text.as_str()) {
                            return None;
                        }
                        ChangeKind::Update
                    }
                    (None, true) => ChangeKind::Delete,
                    (None, false) => return None,
                };
                Some(FileChange {
                    path: path.clone(),
                    kind,
                })
            })
            .collect()
    }
}
