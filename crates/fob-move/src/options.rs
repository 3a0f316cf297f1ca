//! The move request.

use serde::{Deserialize, Serialize};

use crate::error::{MoveError, Result};
use crate::security;

/// One move invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MoveOptions {
    /// Comma-separated file paths and/or glob patterns
    pub file: String,
    /// Name of the destination project
    pub project: String,
    /// Extra subdirectory below the destination's `lib`/`app` folder
    pub project_directory: Option<String>,
    /// Mirror the source file's subdirectory below its `lib`/`app` folder
    pub derive_project_directory: bool,
    /// Never add the moved file to the destination entrypoint
    pub skip_export: bool,
    /// Do not run the formatter at the end
    pub skip_format: bool,
    /// Accept non-ASCII letters in paths
    pub allow_unicode: bool,
    /// Remove source projects left without code
    pub remove_empty_project: bool,
}

impl MoveOptions {
    pub fn new(file: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            project: project.into(),
            ..Self::default()
        }
    }

    /// Split `file` on commas that are not inside `{…}` glob groups.
    pub fn file_entries(&self) -> Vec<String> {
        let mut entries = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        for ch in self.file.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    current.push(ch);
                }
                '}' => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                ',' if depth == 0 => entries.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            }
        }
        entries.push(current);
        entries
            .into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    /// Check option values and combinations before anything is resolved.
    pub fn validate(&self) -> Result<()> {
        if self.project_directory.is_some() && self.derive_project_directory {
            return Err(MoveError::ConflictingOptions(
                "'projectDirectory' and 'deriveProjectDirectory' cannot be used together".to_string(),
            ));
        }
        if self.file_entries().is_empty() {
            return Err(MoveError::invalid_input("file", &self.file, "no file given"));
        }
        if self.project.trim().is_empty() {
            return Err(MoveError::invalid_input("project", &self.project, "no project given"));
        }
        security::validate_input("project", &self.project, self.allow_unicode, false)?;
        if let Some(dir) = &self.project_directory {
            security::validate_input("projectDirectory", dir, self.allow_unicode, false)?;
            security::sanitize_path("projectDirectory", dir)?;
        }
        for entry in self.file_entries() {
            security::validate_input("file", &entry, self.allow_unicode, security::is_glob(&entry))?;
        }
        Ok(())
    }
}
