//! Workspace fixtures for tests.
//!
//! Available in test builds and with the `test-utils` feature.
//!
//! ```rust
//! use fob_move::test_utils::WorkspaceFixture;
//! use fob_move::Tree;
//!
//! let tree = WorkspaceFixture::new()
//!     .library("a", "libs/a")
//!     .alias("@acme/a", "libs/a/src/index.ts")
//!     .file("libs/a/src/lib/x.ts", "export const x = 1;\n")
//!     .build();
//!
//! assert!(tree.exists("libs/a/project.json"));
//! assert!(tree.exists("tsconfig.base.json"));
//! ```

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::project::ProjectKind;
use crate::tree::MemoryTree;

/// Builder for an in-memory multi-project workspace.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceFixture {
    files: BTreeMap<String, String>,
    aliases: IndexMap<String, Vec<String>>,
}

impl WorkspaceFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A library at `root` with sources in `<root>/src` and an empty
    /// `index.ts` entrypoint.
    pub fn library(self, name: &str, root: &str) -> Self {
        self.project(name, root, ProjectKind::Library)
    }

    /// An application at `root` with sources in `<root>/src` and an empty
    /// `index.ts` entrypoint.
    pub fn application(self, name: &str, root: &str) -> Self {
        self.project(name, root, ProjectKind::Application)
    }

    fn project(mut self, name: &str, root: &str, kind: ProjectKind) -> Self {
        let manifest = json!({
            "name": name,
            "sourceRoot": format!("{root}/src"),
            "projectType": kind,
        });
        self.files
            .insert(format!("{root}/project.json"), manifest.to_string());
        self.files
            .entry(format!("{root}/src/index.ts"))
            .or_insert_with(|| "export {};\n".to_string());
        self
    }

    /// Add a `compilerOptions.paths` entry.
    pub fn alias(mut self, alias: &str, target: &str) -> Self {
        self.aliases
            .entry(alias.to_string())
            .or_default()
            .push(target.to_string());
        self
    }

    /// Add or replace a file.
    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn build(mut self) -> MemoryTree {
        if !self.aliases.is_empty() {
            let paths: Map<String, Value> = self
                .aliases
                .into_iter()
                .map(|(alias, targets)| (alias, json!(targets)))
                .collect();
            let config = json!({
                "compilerOptions": {
                    "baseUrl": ".",
                    "paths": paths,
                }
            });
            self.files
                .insert("tsconfig.base.json".to_string(), config.to_string());
        }
        MemoryTree::with_files(self.files)
    }
}
