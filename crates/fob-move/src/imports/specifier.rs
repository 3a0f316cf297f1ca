//! Module specifier resolution and construction.
//!
//! A relative specifier is compared through its *key*: the importer's
//! directory joined with the specifier, normalized, with any strippable
//! extension removed. `./x`, `./x.ts` and `./x.js` written in the same file all
//! share one key.

use crate::paths;

/// Whether `specifier` is relative to the importing file.
pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Comparison key of a workspace file path.
pub fn module_key(path: &str) -> String {
    paths::strip_extension(&paths::normalize(path)).to_string()
}

/// Key of a relative `specifier` written in `importer`. `None` for bare or
/// alias specifiers.
pub fn resolve_relative(importer: &str, specifier: &str) -> Option<String> {
    if !is_relative(specifier) {
        return None;
    }
    Some(module_key(&paths::join(paths::dirname(importer), specifier)))
}

/// Whether a specifier key designates `file`, directly or as its directory
/// index.
pub fn key_matches_file(key: &str, file: &str) -> bool {
    if key == module_key(file) {
        return true;
    }
    paths::file_stem(file) == "index" && key == paths::dirname(file)
}

/// Whether relative `specifier` in `importer` refers to `file`.
pub fn refers_to(importer: &str, specifier: &str, file: &str) -> bool {
    resolve_relative(importer, specifier).is_some_and(|key| key_matches_file(&key, file))
}

/// Shortest relative specifier from `from_file` to `to_file`, with a strippable
/// extension removed.
pub fn relative_specifier(from_file: &str, to_file: &str) -> String {
    let relative = paths::relative(paths::dirname(from_file), to_file);
    let relative = paths::strip_extension(&relative);
    if relative.starts_with("../") {
        relative.to_string()
    } else {
        format!("./{relative}")
    }
}

/// Like [`relative_specifier`], but keeps the explicit extension style of
/// `original` (`./x.js` stays extension-qualified).
pub fn relative_specifier_like(from_file: &str, to_file: &str, original: &str) -> String {
    let specifier = relative_specifier(from_file, to_file);
    match paths::extension(original) {
        Some(ext) if paths::STRIPPABLE_EXTENSIONS.contains(&ext) && paths::extension(&specifier).is_none() => {
            format!("{specifier}.{ext}")
        }
        _ => specifier,
    }
}

/// Re-anchor a relative specifier written in `old_importer` so it resolves to
/// the same place from `new_importer`. The written extension is kept.
pub fn rebase_relative(old_importer: &str, new_importer: &str, specifier: &str) -> Option<String> {
    if !is_relative(specifier) {
        return None;
    }
    let absolute = paths::join(paths::dirname(old_importer), specifier);
    let relative = paths::relative(paths::dirname(new_importer), &absolute);
    Some(if relative.starts_with("../") || relative == ".." {
        relative
    } else if relative.is_empty() {
        ".".to_string()
    } else {
        format!("./{relative}")
    })
}

/// Textual forms a specifier to `file` may take when written from elsewhere:
/// the extension-less stem plus the `.ts`/`.js` spellings. Used as substrings
/// for fast-reject scans.
pub fn specifier_candidates(file: &str) -> Vec<String> {
    let stem = paths::file_stem(file);
    let mut candidates = vec![stem.to_string()];
    if paths::extension(file).is_some_and(|ext| !paths::STRIPPABLE_EXTENSIONS.contains(&ext)) {
        candidates.push(paths::basename(file).to_string());
    } else {
        candidates.push(format!("{stem}.ts"));
        candidates.push(format!("{stem}.js"));
    }
    if stem == "index" {
        candidates.push(paths::basename(paths::dirname(file)).to_string());
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extension_variants_share_a_key() {
        let importer = "libs/a/src/index.ts";
        let expected = Some("libs/a/src/lib/x".to_string());
        assert_eq!(resolve_relative(importer, "./lib/x"), expected);
        assert_eq!(resolve_relative(importer, "./lib/x.ts"), expected);
        assert_eq!(resolve_relative(importer, "./lib/x.js"), expected);
        assert_eq!(resolve_relative(importer, "@acme/a"), None);
    }

    #[test]
    fn explicit_module_extensions_are_kept_in_keys() {
        assert_eq!(
            resolve_relative("libs/a/src/index.ts", "./lib/x.mjs").as_deref(),
            Some("libs/a/src/lib/x.mjs")
        );
    }

    #[test]
    fn directory_specifier_refers_to_index() {
        assert!(refers_to("libs/a/src/main.ts", "./lib/utils", "libs/a/src/lib/utils/index.ts"));
        assert!(!refers_to("libs/a/src/main.ts", "./lib/util", "libs/a/src/lib/utils/index.ts"));
    }

    #[test]
    fn relative_specifier_uses_dot_prefix_and_strips_extension() {
        assert_eq!(relative_specifier("libs/a/src/index.ts", "libs/a/src/lib/x.ts"), "./lib/x");
        assert_eq!(relative_specifier("libs/a/src/lib/y.ts", "libs/b/src/lib/x.tsx"), "../../../b/src/lib/x");
        assert_eq!(relative_specifier("a/index.ts", "a/x.mjs"), "./x.mjs");
    }

    #[test]
    fn relative_specifier_like_keeps_written_extension() {
        assert_eq!(relative_specifier_like("a/index.ts", "a/lib/x.ts", "./old/x.js"), "./lib/x.js");
        assert_eq!(relative_specifier_like("a/index.ts", "a/lib/x.ts", "./old/x"), "./lib/x");
    }

    #[test]
    fn rebase_keeps_target_and_extension() {
        assert_eq!(
            rebase_relative("libs/a/src/lib/utils/x.ts", "libs/b/src/lib/x.ts", "../y.js").as_deref(),
            Some("../../../a/src/lib/y.js")
        );
        assert_eq!(
            rebase_relative("libs/a/src/lib/x.ts", "libs/a/src/lib/sub/x.ts", "./y").as_deref(),
            Some("../y")
        );
        assert_eq!(rebase_relative("a/x.ts", "b/x.ts", "lodash"), None);
    }

    #[test]
    fn candidates_cover_extension_spellings() {
        assert_eq!(specifier_candidates("libs/a/src/lib/x.ts"), vec!["x", "x.ts", "x.js"]);
        assert_eq!(specifier_candidates("libs/a/src/lib/x.mjs"), vec!["x", "x.mjs"]);
    }

    fn segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,6}"
    }

    fn workspace_file() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(segment(), 0..4),
            segment(),
            prop::sample::select(vec!["ts", "tsx", "js", "mjs"]),
        )
            .prop_map(|(dirs, stem, ext)| {
                let mut parts = dirs;
                parts.push(format!("{stem}.{ext}"));
                parts.join("/")
            })
    }

    proptest! {
        #[test]
        fn specifier_round_trips_to_the_same_key(importer in workspace_file(), target in workspace_file()) {
            prop_assume!(importer != target);
            let specifier = relative_specifier(&importer, &target);
            let key = resolve_relative(&importer, &specifier);
            prop_assert_eq!(key, Some(module_key(&target)));
        }

        #[test]
        fn resolved_key_reproduces_itself(importer in workspace_file(), target in workspace_file()) {
            prop_assume!(importer != target);
            let first = resolve_relative(&importer, &relative_specifier(&importer, &target)).unwrap();
            let again = resolve_relative(&importer, &relative_specifier(&importer, &first)).unwrap();
            prop_assert_eq!(first, again);
        }
    }
}
