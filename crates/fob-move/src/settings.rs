//! Workspace conventions the mover relies on.

use serde::{Deserialize, Serialize};

/// Where path aliases and project manifests live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Path-alias configuration files, tried in order; the first existing one wins.
    pub path_alias_files: Vec<String>,

    /// File name marking a project root.
    pub project_manifest: String,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            path_alias_files: vec!["tsconfig.base.json".to_string(), "tsconfig.json".to_string()],
            project_manifest: "project.json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_keep_defaults() {
        let settings: WorkspaceSettings =
            serde_json::from_str(r#"{"project_manifest": "package.json"}"#).unwrap();
        assert_eq!(settings.project_manifest, "package.json");
        assert_eq!(settings.path_alias_files, WorkspaceSettings::default().path_alias_files);
    }
}
