//! Per-invocation memo tables.
//!
//! Four independent caches make repeated analysis of the same files cheap
//! within one run:
//!
//! | cache     | key              | value                          | invalidated by        |
//! |-----------|------------------|--------------------------------|-----------------------|
//! | `content` | file path        | raw text                       | any write to the path |
//! | `syntax`  | file path        | [`ModuleSyntax`] digest        | any write to the path |
//! | `ledger`  | entrypoint path  | [`ExportLedger`]               | any write to the path |
//! | `aliases` | (single slot)    | [`PathAliases`]                | explicit `clear` only |
//!
//! There is no time- or size-based eviction. Correctness depends on every
//! write going through [`crate::workspace::Workspace::write`], which
//! invalidates the entries for the written path in the same call.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::exports::ExportLedger;
use crate::project::PathAliases;
use crate::syntax::ModuleSyntax;

/// Hit/miss counters for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hits / {} misses ({:.1}%), {} invalidations",
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.invalidations
        )
    }
}

/// A path-keyed memo table.
#[derive(Debug)]
pub struct MemoCache<V> {
    entries: FxHashMap<String, V>,
    stats: CacheStats,
}

impl<V> Default for MemoCache<V> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            stats: CacheStats::default(),
        }
    }
}

impl<V: Clone> MemoCache<V> {
    /// Look up `key`, counting the hit or miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                self.stats.hits += 1;
                Some(value.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), value);
    }

    pub fn invalidate(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.stats.invalidations += 1;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// Raw file content by path (`None` = file missing).
pub type ContentCache = MemoCache<Option<Arc<str>>>;

/// Parsed module digest by path (`None` = file missing or unparsable).
pub type SyntaxCache = MemoCache<Option<Arc<ModuleSyntax>>>;

/// Parsed entrypoint exports by entrypoint path.
pub type LedgerCache = MemoCache<Arc<ExportLedger>>;

/// The workspace path-alias table, computed once per invocation.
#[derive(Debug, Default)]
pub struct AliasCache {
    table: Option<Arc<PathAliases>>,
    stats: CacheStats,
}

impl AliasCache {
    pub fn get(&mut self) -> Option<Arc<PathAliases>> {
        match &self.table {
            Some(table) => {
                self.stats.hits += 1;
                Some(Arc::clone(table))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn set(&mut self, table: Arc<PathAliases>) {
        self.table = Some(table);
    }

    pub fn clear(&mut self) {
        if self.table.take().is_some() {
            self.stats.invalidations += 1;
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// The four caches of one invocation.
///
/// Owned by the [`crate::workspace::Workspace`]; construct a fresh instance
/// per run (or per test) to get isolated state.
#[derive(Debug, Default)]
pub struct MoveCaches {
    pub content: ContentCache,
    pub syntax: SyntaxCache,
    pub ledger: LedgerCache,
    pub aliases: AliasCache,
}

impl MoveCaches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every path-keyed entry for `path`.
    ///
    /// Content and syntax are always invalidated together since the digest is
    /// derived from the content.
    pub fn invalidate_path(&mut self, path: &str) {
        self.content.invalidate(path);
        self.syntax.invalidate(path);
        self.ledger.invalidate(path);
    }

    /// Reset all caches, including the alias table.
    pub fn clear(&mut self) {
        self.content.clear();
        self.syntax.clear();
        self.ledger.clear();
        self.aliases.clear();
    }

    /// One-line summary per cache, for debug logging.
    pub fn report(&self) -> String {
        format!(
            "content: {}; syntax: {}; ledger: {}; aliases: {}",
            self.content.stats(),
            self.syntax.stats(),
            self.ledger.stats(),
            self.aliases.stats()
        )
    }
}
