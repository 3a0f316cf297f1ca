//! Moves against a real checkout through `FsTree`.

#![allow(clippy::disallowed_methods)]

use std::fs;
use std::path::Path;

use fob_move::{FsTree, MoveError, MoveFileGenerator, MoveOptions, StaticGraphProvider, Workspace, WorkspaceSettings};
use tempfile::TempDir;

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

fn checkout() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "tsconfig.base.json",
        r#"{
  // comments are allowed here
  "compilerOptions": {
    "baseUrl": ".",
    "paths": {
      "@acme/a": ["libs/a/src/index.ts"],
      "@acme/b": ["libs/b/src/index.ts"],
    },
  },
}"#,
    );
    write(root, ".gitignore", "dist/\n");
    write(root, "libs/a/project.json", r#"{"name": "a", "sourceRoot": "libs/a/src"}"#);
    write(root, "libs/a/src/index.ts", "export * from './lib/x';\n");
    write(root, "libs/a/src/lib/x.ts", "export const x = 1;\n");
    write(root, "libs/b/project.json", r#"{"name": "b", "sourceRoot": "libs/b/src"}"#);
    write(root, "libs/b/src/index.ts", "export {};\n");
    write(root, "libs/b/dist/stale.ts", "import { x } from '@acme/a';\n");
    write(root, "apps/web/project.json", r#"{"name": "web", "projectType": "application"}"#);
    write(root, "apps/web/src/main.ts", "import { x } from '@acme/a';\nconsole.log(x);\n");
    dir
}

#[tokio::test]
async fn flush_applies_a_completed_move() {
    let dir = checkout();
    let root = dir.path();
    let mut tree = FsTree::new(root);

    {
        let mut workspace = Workspace::open(&mut tree, WorkspaceSettings::default());
        let graph = StaticGraphProvider::default();
        MoveFileGenerator::new(&graph)
            .run(&mut workspace, &MoveOptions::new("libs/a/src/lib/x.ts", "b"))
            .await
            .unwrap();
    }

    // Nothing reaches the disk before flushing
    assert!(root.join("libs/a/src/lib/x.ts").exists());
    tree.flush().unwrap();

    assert!(!root.join("libs/a/src/lib").exists());
    assert_eq!(fs::read_to_string(root.join("libs/b/src/lib/x.ts")).unwrap(), "export const x = 1;\n");
    assert_eq!(fs::read_to_string(root.join("libs/a/src/index.ts")).unwrap(), "export {};\n");
    assert_eq!(
        fs::read_to_string(root.join("libs/b/src/index.ts")).unwrap(),
        "export * from './lib/x';\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("apps/web/src/main.ts")).unwrap(),
        "import { x } from '@acme/b';\nconsole.log(x);\n"
    );
    // Ignored by .gitignore
    assert_eq!(
        fs::read_to_string(root.join("libs/b/dist/stale.ts")).unwrap(),
        "import { x } from '@acme/a';\n"
    );
}

#[tokio::test]
async fn failed_move_leaves_the_checkout_untouched() {
    let dir = checkout();
    let root = dir.path();
    let mut tree = FsTree::new(root);

    let err = {
        let mut workspace = Workspace::open(&mut tree, WorkspaceSettings::default());
        let graph = StaticGraphProvider::default();
        MoveFileGenerator::new(&graph)
            .run(&mut workspace, &MoveOptions::new("libs/a/src/lib/missing.ts", "b"))
            .await
            .unwrap_err()
    };

    assert!(matches!(err, MoveError::SourceNotFound(_)));
    assert!(tree.flush().unwrap().is_empty());
    assert_eq!(
        fs::read_to_string(root.join("libs/a/src/index.ts")).unwrap(),
        "export * from './lib/x';\n"
    );
}
