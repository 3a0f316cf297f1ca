#![allow(clippy::disallowed_methods)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fob_move(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fob-move"));
    cmd.arg("--cwd").arg(root).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap()
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "tsconfig.base.json",
        r#"{"compilerOptions": {"paths": {"@acme/a": ["libs/a/src/index.ts"], "@acme/b": ["libs/b/src/index.ts"]}}}"#,
    );
    write(root, "libs/a/project.json", r#"{"name": "a", "sourceRoot": "libs/a/src"}"#);
    write(root, "libs/a/src/index.ts", "export * from './lib/shared';\n");
    write(root, "libs/a/src/lib/shared.ts", "export const shared = 1;\n");
    write(root, "libs/a/src/lib/helper.ts", "export const helper = 1;\n");
    write(root, "libs/a/src/lib/user.ts", "import { helper } from './helper';\n");
    write(root, "libs/b/project.json", r#"{"name": "b", "sourceRoot": "libs/b/src"}"#);
    write(root, "libs/b/src/index.ts", "export {};\n");
    write(root, "apps/web/project.json", r#"{"name": "web", "projectType": "application"}"#);
    write(root, "apps/web/src/main.ts", "import { shared } from '@acme/a';\n");
    dir
}

#[test]
fn moves_a_file_and_rewrites_imports() {
    let dir = workspace();
    let root = dir.path();

    fob_move(root)
        .args(["libs/a/src/lib/helper.ts", "--project", "b"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Moved libs/a/src/lib/helper.ts → libs/b/src/lib/helper.ts (non-exported-alias)",
        ))
        .stdout(predicate::str::contains("CREATE libs/b/src/lib/helper.ts"));

    assert!(!root.join("libs/a/src/lib/helper.ts").exists());
    assert_eq!(read(root, "libs/b/src/lib/helper.ts"), "export const helper = 1;\n");
    assert_eq!(read(root, "libs/a/src/lib/user.ts"), "import { helper } from '@acme/b';\n");
}

#[test]
fn exported_move_uses_the_scanned_graph() {
    let dir = workspace();
    let root = dir.path();

    fob_move(root)
        .args(["libs/a/src/lib/shared.ts", "-p", "b"])
        .assert()
        .success();

    assert_eq!(read(root, "apps/web/src/main.ts"), "import { shared } from '@acme/b';\n");
    assert_eq!(read(root, "libs/a/src/index.ts"), "export {};\n");
    assert_eq!(read(root, "libs/b/src/index.ts"), "export * from './lib/shared';\n");
}

#[test]
fn graph_file_from_flag() {
    let dir = workspace();
    let root = dir.path();
    write(
        root,
        "graph.json",
        r#"{"graph": {"dependencies": {"web": [{"source": "web", "target": "a"}]}}}"#,
    );

    fob_move(root)
        .args(["libs/a/src/lib/shared.ts", "-p", "b", "--graph", "graph.json"])
        .assert()
        .success();

    assert_eq!(read(root, "apps/web/src/main.ts"), "import { shared } from '@acme/b';\n");
}

#[test]
fn dry_run_writes_nothing() {
    let dir = workspace();
    let root = dir.path();

    fob_move(root)
        .args(["libs/a/src/lib/helper.ts", "-p", "b", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would move libs/a/src/lib/helper.ts"))
        .stdout(predicate::str::contains("UPDATE libs/a/src/lib/user.ts"))
        .stderr(predicate::str::contains("Dry run"));

    assert!(root.join("libs/a/src/lib/helper.ts").exists());
    assert!(!root.join("libs/b/src/lib").exists());
    assert_eq!(read(root, "libs/a/src/lib/user.ts"), "import { helper } from './helper';\n");
}

#[test]
fn json_summary() {
    let dir = workspace();
    let root = dir.path();

    let output = fob_move(root)
        .args(["libs/a/src/lib/helper.ts", "-p", "b", "--dry-run", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["moved"][0]["target"], "libs/b/src/lib/helper.ts");
    assert_eq!(summary["moved"][0]["strategy"], "non-exported-alias");
    assert_eq!(summary["warnings"], 1);
}

#[test]
fn missing_source_fails_without_writing() {
    let dir = workspace();
    let root = dir.path();

    fob_move(root)
        .args(["libs/a/src/lib/missing.ts", "-p", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source file not found"));

    assert!(!root.join("libs/b/src/lib").exists());
}

#[test]
fn unmatched_glob_fails_the_whole_request() {
    let dir = workspace();
    let root = dir.path();

    fob_move(root)
        .args(["libs/a/src/lib/helper.ts,libs/a/src/**/*.vue", "-p", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not match any files"));

    assert!(root.join("libs/a/src/lib/helper.ts").exists());
}

#[test]
fn unknown_project_is_reported() {
    let dir = workspace();

    fob_move(dir.path())
        .args(["libs/a/src/lib/helper.ts", "-p", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project 'nope' not found"));
}

#[test]
fn invalid_characters_are_rejected() {
    let dir = workspace();

    fob_move(dir.path())
        .args(["libs/a/src/lib/helper.ts", "-p", "b", "--project-directory", "a;rm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project-directory").or(predicate::str::contains("projectDirectory")));
}

#[test]
fn remove_empty_project_flag() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "libs/a/project.json", r#"{"name": "a"}"#);
    write(root, "libs/a/src/index.ts", "export {};\n");
    write(root, "libs/a/src/lib/only.ts", "export const only = 1;\n");
    write(root, "libs/b/project.json", r#"{"name": "b", "sourceRoot": "libs/b/src"}"#);
    write(root, "libs/b/src/index.ts", "export {};\n");

    fob_move(root)
        .args(["libs/a/src/lib/only.ts", "-p", "b", "--remove-empty-project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed empty project a"));

    assert!(!root.join("libs/a/project.json").exists());
    assert!(root.join("libs/b/src/lib/only.ts").exists());
}

#[cfg(unix)]
#[test]
fn configured_formatter_runs_over_touched_files() {
    let dir = workspace();
    let root = dir.path();
    write(
        root,
        "fob-move.toml",
        r#"formatter = ["sh", "-c", "printf '%s\n' \"$@\" > formatted.txt", "sh"]"#,
    );

    fob_move(root)
        .args(["libs/a/src/lib/helper.ts", "-p", "b"])
        .assert()
        .success();

    let formatted = read(root, "formatted.txt");
    assert_eq!(formatted, "libs/a/src/lib/user.ts\nlibs/b/src/lib/helper.ts\n");
}

#[cfg(unix)]
#[test]
fn skip_format_leaves_formatter_alone() {
    let dir = workspace();
    let root = dir.path();
    write(root, "fob-move.toml", r#"formatter = ["sh", "-c", "touch formatted.txt"]"#);

    fob_move(root)
        .args(["libs/a/src/lib/helper.ts", "-p", "b", "--skip-format"])
        .assert()
        .success();

    assert!(!root.join("formatted.txt").exists());
}
