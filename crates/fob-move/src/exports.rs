//! Export ledger of project entrypoints.
//!
//! An entrypoint is parsed into its re-exported specifiers, its locally
//! declared export names and its default export. The mover adds and removes
//! `export * from '…'` lines; an entrypoint that loses its last statement is
//! rewritten to [`EMPTY_MODULE_MARKER`] so it stays a loadable module.

use std::sync::Arc;

use indexmap::IndexSet;
use tracing::debug;

use crate::imports::{refers_to, relative_specifier};
use crate::syntax::{ModuleSyntax, apply_edits};
use crate::workspace::Workspace;

/// Statement written to an entrypoint that no longer exports anything.
pub const EMPTY_MODULE_MARKER: &str = "export {};";

/// What an entrypoint currently exports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportLedger {
    /// Specifiers of `export … from` statements
    pub reexports: IndexSet<String>,
    /// Locally declared export names
    pub named: IndexSet<String>,
    pub default_export: Option<String>,
}

impl ExportLedger {
    pub fn from_syntax(syntax: &ModuleSyntax) -> Self {
        Self {
            reexports: syntax.reexports.iter().map(|r| r.specifier.clone()).collect(),
            named: syntax.named_exports.iter().cloned().collect(),
            default_export: syntax.default_export.clone(),
        }
    }

    /// Whether `entrypoint` (the file this ledger was read from) re-exports
    /// `file`, whatever extension the specifier was written with.
    pub fn reexports_file(&self, entrypoint: &str, file: &str) -> bool {
        self.reexports
            .iter()
            .any(|specifier| refers_to(entrypoint, specifier, file))
    }
}

/// Ledger of `entrypoint` through the ledger cache.
pub fn ledger(workspace: &mut Workspace<'_>, entrypoint: &str) -> Option<Arc<ExportLedger>> {
    if let Some(cached) = workspace.caches_mut().ledger.get(entrypoint) {
        return Some(cached);
    }
    let syntax = workspace.syntax(entrypoint)?;
    let ledger = Arc::new(ExportLedger::from_syntax(&syntax));
    workspace
        .caches_mut()
        .ledger
        .set(entrypoint, Arc::clone(&ledger));
    Some(ledger)
}

/// Whether any of `entrypoints` re-exports `file`.
pub fn is_exported(workspace: &mut Workspace<'_>, entrypoints: &[String], file: &str) -> bool {
    entrypoints.iter().any(|entrypoint| {
        ledger(workspace, entrypoint).is_some_and(|ledger| ledger.reexports_file(entrypoint, file))
    })
}

/// Append `export * from '<file>'` to `entrypoint` unless it already
/// re-exports the file. Returns whether the entrypoint was written.
pub fn ensure_exported(workspace: &mut Workspace<'_>, entrypoint: &str, file: &str) -> bool {
    if ledger(workspace, entrypoint).is_some_and(|ledger| ledger.reexports_file(entrypoint, file)) {
        return false;
    }
    let content = workspace.read(entrypoint).unwrap_or_default();
    let statement = format!("export * from '{}';", relative_specifier(entrypoint, file));

    let updated = if content.trim() == EMPTY_MODULE_MARKER || content.trim().is_empty() {
        format!("{statement}\n")
    } else if content.ends_with('\n') {
        format!("{content}{statement}\n")
    } else {
        format!("{content}\n{statement}\n")
    };

    debug!(%entrypoint, %file, "adding re-export");
    workspace.write(entrypoint, &updated);
    true
}

/// Remove every re-export of `file` from `entrypoints`. Returns whether any
/// entrypoint was written.
pub fn remove_export(workspace: &mut Workspace<'_>, entrypoints: &[String], file: &str) -> bool {
    let mut changed = false;
    for entrypoint in entrypoints {
        let (Some(content), Some(syntax)) = (workspace.read(entrypoint), workspace.syntax(entrypoint)) else {
            continue;
        };

        let edits: Vec<_> = syntax
            .reexports
            .iter()
            .filter(|reexport| refers_to(entrypoint, &reexport.specifier, file))
            .map(|reexport| (with_line_break(&content, reexport.statement.clone()), String::new()))
            .collect();
        if edits.is_empty() {
            continue;
        }

        let mut updated = apply_edits(&content, edits);
        let still_loadable = ModuleSyntax::parse(entrypoint, &updated).is_some_and(|s| !s.is_empty());
        if !still_loadable {
            let rest = updated.trim();
            updated = if rest.is_empty() {
                format!("{EMPTY_MODULE_MARKER}\n")
            } else {
                format!("{rest}\n{EMPTY_MODULE_MARKER}\n")
            };
        }

        debug!(%entrypoint, %file, "removing re-export");
        workspace.write(entrypoint, &updated);
        changed = true;
    }
    changed
}

/// Extend a statement range over the line break that follows it.
fn with_line_break(content: &str, range: std::ops::Range<usize>) -> std::ops::Range<usize> {
    let rest = &content[range.end..];
    let extra = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') {
        1
    } else {
        0
    };
    range.start..range.end + extra
}
