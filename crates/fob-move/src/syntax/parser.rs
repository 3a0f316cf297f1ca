//! Parser façade over `oxc_parser`.

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Parse options for reading source code.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Source type (JavaScript, TypeScript, JSX, TSX)
    pub source_type: SourceType,
}

impl ParseOptions {
    /// Create parse options from file path (auto-detects source type)
    pub fn from_path(path: &str) -> Self {
        Self {
            source_type: SourceType::from_path(path).unwrap_or(SourceType::mjs()),
        }
    }
}

/// Parse diagnostic information
#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    /// Error message
    pub message: String,
}

/// Parse source code into a program.
///
/// A module with syntax errors yields its diagnostics instead of a program,
/// so a broken file is never rewritten from a recovered tree.
pub fn parse<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    options: ParseOptions,
) -> Result<Program<'a>, Vec<ParseDiagnostic>> {
    let result = Parser::new(allocator, source, options.source_type).parse();

    if result.panicked || !result.errors.is_empty() {
        let mut diagnostics: Vec<ParseDiagnostic> = result
            .errors
            .iter()
            .map(|err| ParseDiagnostic {
                message: err.to_string(),
            })
            .collect();
        if diagnostics.is_empty() {
            diagnostics.push(ParseDiagnostic {
                message: "parser aborted".to_string(),
            });
        }
        return Err(diagnostics);
    }

    Ok(result.program)
}
