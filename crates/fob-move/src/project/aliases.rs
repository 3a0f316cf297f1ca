//! Path-alias table read from the workspace's TypeScript configuration.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{MoveError, Result};
use crate::paths;
use crate::settings::WorkspaceSettings;
use crate::tree::Tree;

/// One `compilerOptions.paths` entry with workspace-relative targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAlias {
    pub alias: String,
    pub targets: Vec<String>,
}

impl PathAlias {
    /// Whether the alias is a `prefix*suffix` pattern.
    pub fn is_wildcard(&self) -> bool {
        self.alias.contains('*')
    }

    /// The part of `specifier` matched by `*`, for wildcard aliases.
    pub fn capture<'s>(&self, specifier: &'s str) -> Option<&'s str> {
        let (prefix, suffix) = self.alias.split_once('*')?;
        specifier
            .strip_prefix(prefix)?
            .strip_suffix(suffix)
            .filter(|captured| !captured.is_empty())
    }
}

/// The workspace path-alias table, sorted by alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathAliases {
    entries: Vec<PathAlias>,
}

impl PathAliases {
    pub fn new<I, A, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, Vec<T>)>,
        A: Into<String>,
        T: AsRef<str>,
    {
        let mut entries: Vec<PathAlias> = entries
            .into_iter()
            .map(|(alias, targets)| PathAlias {
                alias: alias.into(),
                targets: targets
                    .iter()
                    .map(|target| paths::normalize(target.as_ref()))
                    .collect(),
            })
            .collect();
        entries.sort_by(|a, b| a.alias.cmp(&b.alias));
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathAlias> {
        self.entries.iter()
    }

    pub fn get(&self, alias: &str) -> Option<&PathAlias> {
        self.entries.iter().find(|entry| entry.alias == alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths a bare specifier maps to. Exact aliases win over wildcard ones;
    /// among wildcards the longest prefix wins.
    pub fn targets_for(&self, specifier: &str) -> Vec<String> {
        if let Some(entry) = self.entries.iter().find(|e| !e.is_wildcard() && e.alias == specifier) {
            return entry.targets.clone();
        }

        let best = self
            .entries
            .iter()
            .filter(|entry| entry.is_wildcard())
            .filter_map(|entry| entry.capture(specifier).map(|captured| (entry, captured)))
            .max_by_key(|(entry, _)| entry.alias.find('*').unwrap_or_default());

        match best {
            Some((entry, captured)) => entry
                .targets
                .iter()
                .map(|target| paths::normalize(&target.replacen('*', captured, 1)))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
    #[serde(default)]
    compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    base_url: Option<String>,
    #[serde(default)]
    paths: IndexMap<String, Vec<String>>,
}

/// Read the alias table from the first existing configuration candidate.
///
/// A workspace without any candidate file has an empty table.
pub fn load_path_aliases(tree: &dyn Tree, settings: &WorkspaceSettings) -> Result<PathAliases> {
    let Some((path, content)) = settings
        .path_alias_files
        .iter()
        .find_map(|candidate| tree.read(candidate).map(|content| (candidate, content)))
    else {
        debug!("no path-alias configuration found");
        return Ok(PathAliases::default());
    };

    let value = parse_jsonc(&content).ok_or_else(|| MoveError::config(path, "not valid JSON or JSON5"))?;
    let config: TsConfig =
        serde_json::from_value(value).map_err(|err| MoveError::config(path, err.to_string()))?;

    let base = paths::join(
        paths::dirname(path),
        config.compiler_options.base_url.as_deref().unwrap_or("."),
    );
    let aliases = PathAliases::new(config.compiler_options.paths.into_iter().map(|(alias, targets)| {
        let targets: Vec<String> = targets.iter().map(|target| paths::join(&base, target)).collect();
        (alias, targets)
    }));

    debug!(config = %path, count = aliases.len(), "loaded path aliases");
    Ok(aliases)
}

/// Parse JSON, falling back to JSON5 for files with comments or trailing commas.
fn parse_jsonc(content: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(content) {
        return Some(value);
    }
    json_five::from_str::<Value>(content).ok()
}
