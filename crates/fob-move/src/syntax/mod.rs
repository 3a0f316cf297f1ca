//! Syntax layer: parse a module once and keep what the mover needs.
//!
//! oxc ASTs borrow from an arena allocator and the source text, so they cannot
//! outlive a single parse. [`ModuleSyntax`] is the owned digest of one parse:
//! every module specifier with its byte range, plus the export structure. It is
//! what the syntax cache stores, and every rewrite is a byte-range splice
//! driven by it, so formatting and comments outside specifiers are untouched.

mod parser;
mod visitor;

use std::ops::Range;

use oxc_allocator::Allocator;
use oxc_ast_visit::Visit;
use tracing::debug;

pub use parser::{ParseDiagnostic, ParseOptions, parse};

/// Default-export marker for unnamed function and class declarations.
pub const DEFAULT_ANONYMOUS: &str = "<anonymous>";

/// Default-export marker for bare expressions.
pub const DEFAULT_EXPRESSION: &str = "<default>";

/// Syntactic position a specifier was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecifierKind {
    /// `import x from '…'`, `import '…'`
    Import,
    /// `export { x } from '…'`
    ExportFrom,
    /// `export * from '…'`
    ExportAll,
    /// `import('…')`
    DynamicImport,
    /// `require('…')`
    Require,
    /// `import x = require('…')`
    ImportEquals,
}

/// One module specifier in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecifierOccurrence {
    pub kind: SpecifierKind,
    /// The specifier text
    pub value: String,
    /// Byte range of the text between the quotes
    pub range: Range<usize>,
    /// Names taken from the module (`default` for default imports). `None`
    /// when unknown: namespace, side-effect, dynamic and `require` imports.
    pub imported: Option<Vec<String>>,
}

/// A top-level `export … from` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReexportStatement {
    pub specifier: String,
    /// Byte range of the whole statement
    pub statement: Range<usize>,
}

/// Owned digest of a parsed module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSyntax {
    /// Every specifier in source order
    pub specifiers: Vec<SpecifierOccurrence>,
    /// Top-level re-export statements
    pub reexports: Vec<ReexportStatement>,
    /// Locally declared export names (exported name for `export { a as b }`)
    pub named_exports: Vec<String>,
    /// Name of the default export, see [`DEFAULT_ANONYMOUS`] and [`DEFAULT_EXPRESSION`]
    pub default_export: Option<String>,
    /// Number of top-level statements
    pub statement_count: usize,
}

impl ModuleSyntax {
    /// Parse `source` (type inferred from `path`). Returns `None` when the
    /// file does not parse.
    pub fn parse(path: &str, source: &str) -> Option<Self> {
        let allocator = Allocator::default();
        let program = match parse(&allocator, source, ParseOptions::from_path(path)) {
            Ok(program) => program,
            Err(diagnostics) => {
                debug!(
                    path,
                    errors = diagnostics.len(),
                    first = diagnostics.first().map(|d| d.message.as_str()).unwrap_or_default(),
                    "failed to parse module"
                );
                return None;
            }
        };

        let mut collector = visitor::SpecifierCollector::default();
        collector.visit_program(&program);
        let mut specifiers = collector.occurrences;
        specifiers.sort_by_key(|occurrence| occurrence.range.start);

        let exports = visitor::collect_exports(&program);

        Some(Self {
            specifiers,
            reexports: exports.reexports,
            named_exports: exports.named,
            default_export: exports.default_export,
            statement_count: program.body.len(),
        })
    }

    /// Whether the module has no statements at all (blank or comments only).
    pub fn is_empty(&self) -> bool {
        self.statement_count == 0
    }
}

/// Apply `(range, replacement)` edits to `source`.
///
/// Edits must not overlap; they may be given in any order.
pub fn apply_edits(source: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(range, _)| std::cmp::Reverse(range.start));
    let mut output = source.to_string();
    for (range, replacement) in edits {
        output.replace_range(range, &replacement);
    }
    output
}
