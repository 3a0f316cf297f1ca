//! External formatter run over the files a move touched.
//!
//! The move only stages changes, so formatting happens in two steps:
//! [`Formatter::format`] records the touched module files, and
//! [`CommandFormatter::run`] invokes the command once they are on disk.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use fob_move::paths::is_source_file;
use fob_move::{ChangeKind, Formatter, Tree};
use parking_lot::Mutex;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{CliError, Result};

/// Runs `program args… <files>` in the workspace root.
#[derive(Debug)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
    touched: Mutex<Vec<String>>,
}

impl CommandFormatter {
    /// `None` for an empty command line.
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            touched: Mutex::new(Vec::new()),
        })
    }

    /// Files recorded by the last [`Formatter::format`] call.
    pub fn touched(&self) -> Vec<String> {
        self.touched.lock().clone()
    }

    /// Run the command over the recorded files. Does nothing when no module
    /// file was created or updated.
    pub async fn run(&self, root: &Path) -> Result<()> {
        let files = self.touched();
        if files.is_empty() {
            debug!("no files to format");
            return Ok(());
        }

        info!(program = %self.program, files = files.len(), "formatting touched files");
        let status = Command::new(&self.program)
            .args(&self.args)
            .args(&files)
            .current_dir(root)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|err| CliError::Formatter(format!("could not start '{}': {err}", self.program)))?;

        if status.success() {
            Ok(())
        } else {
            Err(CliError::Formatter(format!("'{}' exited with {status}", self.program)))
        }
    }
}

#[async_trait]
impl Formatter for CommandFormatter {
    async fn format(&self, tree: &mut dyn Tree) -> fob_move::Result<()> {
        let files: Vec<String> = tree
            .changes()
            .into_iter()
            .filter(|change| change.kind != ChangeKind::Delete && is_source_file(&change.path))
            .map(|change| change.path)
            .collect();
        debug!(files = files.len(), "recorded files to format");
        *self.touched.lock() = files;
        Ok(())
    }
}
