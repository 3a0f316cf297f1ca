//! Input validation for user-supplied paths and names.
//!
//! Values are checked against a whitelist rather than a blacklist: anything
//! not explicitly allowed is rejected with the offending option named in the
//! error.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MoveError, Result};
use crate::paths;

/// ASCII letters, digits, `_ @ . / -`, space and the platform separator.
static ASCII_PATH: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = if cfg!(windows) {
        r"^[A-Za-z0-9_@./\\\- ]+$"
    } else {
        r"^[A-Za-z0-9_@./\- ]+$"
    };
    Regex::new(pattern).expect("static pattern")
});

/// Same set with any Unicode letter or digit in place of ASCII ones.
static UNICODE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = if cfg!(windows) {
        r"^[\p{L}\p{N}_@./\\\- ]+$"
    } else {
        r"^[\p{L}\p{N}_@./\- ]+$"
    };
    Regex::new(pattern).expect("static pattern")
});

/// Characters that turn a path into a glob pattern.
const GLOB_METACHARACTERS: &[char] = &['*', '?', '[', ']', '{', '}', '!', ','];

/// Whether the value contains glob metacharacters.
pub fn is_glob(value: &str) -> bool {
    value.contains(['*', '?', '[', '{'])
}

/// Validate a path-like option value.
///
/// `allow_unicode` widens the letter class to every Unicode letter; glob
/// metacharacters are only accepted when `allow_glob` is set.
pub fn validate_input(option: &str, value: &str, allow_unicode: bool, allow_glob: bool) -> Result<()> {
    if value.is_empty() {
        return Err(MoveError::invalid_input(option, value, "value is empty"));
    }

    let stripped: String = if allow_glob {
        value
            .chars()
            .filter(|c| !GLOB_METACHARACTERS.contains(c))
            .collect()
    } else {
        value.to_string()
    };

    // A pattern made only of metacharacters (`**`) is still a valid glob.
    if stripped.is_empty() {
        return Ok(());
    }

    let whitelist = if allow_unicode { &*UNICODE_PATH } else { &*ASCII_PATH };
    if whitelist.is_match(&stripped) {
        return Ok(());
    }

    let reason = if allow_unicode {
        "contains characters outside the allowed set"
    } else {
        "contains disallowed characters (pass --allow-unicode for non-ASCII paths)"
    };
    Err(MoveError::invalid_input(option, value, reason))
}

/// Normalize a workspace path and reject anything escaping the workspace root.
pub fn sanitize_path(option: &str, value: &str) -> Result<String> {
    let unified = value.replace('\\', "/");
    if unified.starts_with('/') || has_drive_prefix(&unified) {
        return Err(MoveError::invalid_input(
            option,
            value,
            "absolute paths are not allowed, use a workspace-relative path",
        ));
    }

    let normalized = paths::normalize(&unified);
    if normalized == ".." || normalized.starts_with("../") {
        return Err(MoveError::invalid_input(
            option,
            value,
            "path escapes the workspace root",
        ));
    }
    Ok(normalized)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Escape every regex metacharacter in `text`.
pub fn escape_regex(text: &str) -> String {
    regex::escape(text)
}
