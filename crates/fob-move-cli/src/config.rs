//! CLI settings.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. `fob-move.toml` in the workspace root, or the file given with `--config`
//! 3. `FOB_MOVE_*` environment variables (`__` separates nested keys, e.g.
//!    `FOB_MOVE_WORKSPACE__PROJECT_MANIFEST`)
//! 4. command-line flags
//!
//! ```toml
//! graph_file = "dist/project-graph.json"
//! formatter = ["npx", "prettier", "--write"]
//!
//! [workspace]
//! path_alias_files = ["tsconfig.base.json"]
//! project_manifest = "project.json"
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use fob_move::WorkspaceSettings;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Settings file looked up in the workspace root.
pub const CONFIG_FILE: &str = "fob-move.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "FOB_MOVE_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub workspace: WorkspaceSettings,

    /// Project graph export, relative to the workspace root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_file: Option<String>,

    /// Program and arguments run over the touched files after a move
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<Vec<String>>,
}

impl Settings {
    /// Load settings for the workspace at `root`.
    ///
    /// An explicit `config` file must exist; the default file is optional.
    pub fn load(root: &Path, config: Option<&Path>, graph_file: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        let file: Option<PathBuf> = match config {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf()).into()),
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = root.join(CONFIG_FILE);
                default.is_file().then_some(default)
            }
        };
        if let Some(path) = &file {
            tracing::debug!(path = %path.display(), "loading settings file");
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(graph_file) = graph_file {
            figment = figment.merge(Serialized::default("graph_file", graph_file));
        }

        figment
            .extract()
            .map_err(|err| ConfigError::Invalid(err.to_string()).into())
    }
}
