//! Import rewriting engine.
//!
//! [`specifier`] resolves and builds specifiers as workspace paths;
//! [`rewrite`] applies replacements to the specifier ranges recorded by the
//! syntax layer.

pub mod rewrite;
pub mod specifier;

pub use rewrite::{find_specifiers, mentions_any, rewrite_file, rewrite_specifiers};
pub use specifier::{
    is_relative, key_matches_file, module_key, rebase_relative, refers_to, relative_specifier,
    relative_specifier_like, resolve_relative, specifier_candidates,
};
