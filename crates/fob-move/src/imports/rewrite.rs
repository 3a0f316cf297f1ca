//! Find-and-rewrite over the specifiers of a module.

use memchr::memmem;

use crate::syntax::{ModuleSyntax, SpecifierOccurrence, apply_edits};
use crate::workspace::Workspace;

/// Specifiers of `syntax` accepted by `predicate`, in source order.
pub fn find_specifiers<'s>(
    syntax: &'s ModuleSyntax,
    mut predicate: impl FnMut(&SpecifierOccurrence) -> bool,
) -> Vec<&'s SpecifierOccurrence> {
    syntax
        .specifiers
        .iter()
        .filter(|occurrence| predicate(occurrence))
        .collect()
}

/// Replace specifiers for which `replace` returns a new value.
///
/// Returns `None` when nothing changed. Only the text between the quotes is
/// touched.
pub fn rewrite_specifiers(
    source: &str,
    syntax: &ModuleSyntax,
    mut replace: impl FnMut(&SpecifierOccurrence) -> Option<String>,
) -> Option<String> {
    let edits: Vec<_> = syntax
        .specifiers
        .iter()
        .filter_map(|occurrence| {
            replace(occurrence)
                .filter(|replacement| *replacement != occurrence.value)
                .map(|replacement| (occurrence.range.clone(), replacement))
        })
        .collect();
    if edits.is_empty() {
        return None;
    }
    Some(apply_edits(source, edits))
}

/// Whether `content` contains any of `needles`. A cheap filter applied before
/// parsing a file.
pub fn mentions_any(content: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .filter(|needle| !needle.is_empty())
        .any(|needle| memmem::find(content.as_bytes(), needle.as_bytes()).is_some())
}

/// Rewrite the specifiers of one workspace file in place.
///
/// Files that do not mention any of `needles` are skipped without parsing.
/// Returns whether the file was written.
pub fn rewrite_file(
    workspace: &mut Workspace<'_>,
    path: &str,
    needles: &[String],
    replace: impl FnMut(&SpecifierOccurrence) -> Option<String>,
) -> bool {
    let Some(content) = workspace.read(path) else {
        return false;
    };
    if !needles.is_empty() && !mentions_any(&content, needles) {
        return false;
    }
    let Some(syntax) = workspace.syntax(path) else {
        return false;
    };
    match rewrite_specifiers(&content, &syntax, replace) {
        Some(updated) => {
            workspace.write(path, &updated);
            true
        }
        None => false,
    }
}
