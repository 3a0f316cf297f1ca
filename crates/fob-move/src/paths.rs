//! Workspace path helpers.
//!
//! All paths inside the crate are workspace-relative strings using `/` as the
//! separator, regardless of platform. These helpers keep them in that shape.

use std::path::Path;

use path_clean::PathClean;

/// Extensions of files that are scanned for specifiers and may be moved.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mts", "mjs", "cts", "cjs"];

/// Extensions dropped when a file is referenced from a specifier.
///
/// `.mts/.mjs/.cts/.cjs` are excluded: their module systems require the
/// extension to be spelled out.
pub const STRIPPABLE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Normalize a path: unify separators, resolve `.`/`..`, drop leading `./`
/// and trailing `/`.
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    if unified.is_empty() {
        return String::new();
    }
    let cleaned = Path::new(&unified).clean();
    let text = cleaned.to_string_lossy().replace('\\', "/");
    if text == "." {
        String::new()
    } else {
        text
    }
}

/// Join two workspace paths and normalize the result.
pub fn join(base: &str, rest: &str) -> String {
    if base.is_empty() {
        return normalize(rest);
    }
    if rest.is_empty() {
        return normalize(base);
    }
    normalize(&format!("{}/{}", base.trim_end_matches('/'), rest))
}

/// Parent directory of a workspace path (`""` for top-level entries).
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Final component of a workspace path.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Extension of the final component, without the dot.
pub fn extension(path: &str) -> Option<&str> {
    let name = basename(path);
    let idx = name.rfind('.')?;
    if idx == 0 {
        return None;
    }
    Some(&name[idx + 1..])
}

/// Final component without its extension.
pub fn file_stem(path: &str) -> &str {
    let name = basename(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Whether the path has one of the scannable source extensions.
pub fn is_source_file(path: &str) -> bool {
    extension(path).is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Strip the extension when it is in the strippable set.
pub fn strip_extension(path: &str) -> &str {
    match extension(path) {
        Some(ext) if STRIPPABLE_EXTENSIONS.contains(&ext) => &path[..path.len() - ext.len() - 1],
        _ => path,
    }
}

/// Whether `path` is `dir` itself or lies below it.
pub fn is_within(path: &str, dir: &str) -> bool {
    if dir.is_empty() {
        return true;
    }
    path == dir
        || path
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Relative path from directory `from_dir` to `to`, both workspace paths.
///
/// The result never starts with `./`; callers that need a module specifier
/// should go through [`crate::imports::relative_specifier`].
pub fn relative(from_dir: &str, to: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let target: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::with_capacity(from.len() - common + target.len() - common);
    parts.extend(std::iter::repeat_n("..", from.len() - common));
    parts.extend(&target[common..]);
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_resolves_dots_and_separators() {
        assert_eq!(normalize("./libs/a/../b/src/"), "libs/b/src");
        assert_eq!(normalize("libs\\a\\src\\index.ts"), "libs/a/src/index.ts");
        assert_eq!(normalize("."), "");
    }

    #[test]
    fn join_handles_empty_parts() {
        assert_eq!(join("", "libs/a"), "libs/a");
        assert_eq!(join("libs/a/src/lib", "../index"), "libs/a/src/index");
        assert_eq!(join("libs/a", ""), "libs/a");
    }

    #[test]
    fn stem_and_extension() {
        assert_eq!(extension("libs/a/helper.spec.ts"), Some("ts"));
        assert_eq!(file_stem("libs/a/helper.spec.ts"), "helper.spec");
        assert_eq!(extension("libs/a/.eslintrc"), None);
    }

    #[test]
    fn strip_only_strippable_extensions() {
        assert_eq!(strip_extension("a/b.ts"), "a/b");
        assert_eq!(strip_extension("a/b.tsx"), "a/b");
        assert_eq!(strip_extension("a/b.mjs"), "a/b.mjs");
        assert_eq!(strip_extension("a/b"), "a/b");
    }

    #[test]
    fn relative_paths() {
        assert_eq!(relative("libs/a/src", "libs/a/src/lib/x.ts"), "lib/x.ts");
        assert_eq!(relative("libs/a/src/lib", "libs/b/src/lib/x"), "../../../b/src/lib/x");
        assert_eq!(relative("", "libs/x"), "libs/x");
    }

    #[test]
    fn within_requires_component_boundary() {
        assert!(is_within("libs/a/src/x.ts", "libs/a"));
        assert!(!is_within("libs/ab/src/x.ts", "libs/a"));
        assert!(is_within("libs/a", "libs/a"));
    }
}
