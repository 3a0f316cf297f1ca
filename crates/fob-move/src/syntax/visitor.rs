//! AST visitors collecting module specifiers and export declarations.

use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_span::Span;

use super::{DEFAULT_ANONYMOUS, DEFAULT_EXPRESSION, ReexportStatement, SpecifierKind, SpecifierOccurrence};

/// Collects every module specifier in a program, including nested dynamic
/// imports and `require` calls.
#[derive(Default)]
pub(super) struct SpecifierCollector {
    pub occurrences: Vec<SpecifierOccurrence>,
}

impl SpecifierCollector {
    fn push_literal(&mut self, kind: SpecifierKind, literal: &StringLiteral<'_>) {
        self.push(kind, literal.value.as_str(), literal.span, None);
    }

    fn push(&mut self, kind: SpecifierKind, value: &str, span: Span, imported: Option<Vec<String>>) {
        // Quote (or backtick) on either side of the value
        let start = span.start as usize + 1;
        let end = (span.end as usize).saturating_sub(1);
        if end < start {
            return;
        }
        self.occurrences.push(SpecifierOccurrence {
            kind,
            value: value.to_string(),
            range: start..end,
            imported,
        });
    }
}

impl<'a> Visit<'a> for SpecifierCollector {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        let imported = decl.specifiers.as_ref().and_then(|specifiers| {
            specifiers
                .iter()
                .map(|specifier| match specifier {
                    ImportDeclarationSpecifier::ImportSpecifier(named) => {
                        Some(module_export_name(&named.imported))
                    }
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => Some("default".to_string()),
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => None,
                })
                .collect::<Option<Vec<_>>>()
        });
        self.push(SpecifierKind::Import, decl.source.value.as_str(), decl.source.span, imported);
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(source) = &decl.source {
            let imported = decl
                .specifiers
                .iter()
                .map(|specifier| module_export_name(&specifier.local))
                .collect();
            self.push(SpecifierKind::ExportFrom, source.value.as_str(), source.span, Some(imported));
        }
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        self.push_literal(SpecifierKind::ExportAll, &decl.source);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        match &expr.source {
            Expression::StringLiteral(literal) => {
                self.push_literal(SpecifierKind::DynamicImport, literal);
            }
            Expression::TemplateLiteral(template) if template.expressions.is_empty() => {
                if let Some(quasi) = template.quasis.first() {
                    self.push(SpecifierKind::DynamicImport, quasi.value.raw.as_str(), template.span, None);
                }
            }
            _ => {}
        }
        walk::walk_import_expression(self, expr);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Expression::Identifier(callee) = &call.callee {
            if callee.name.as_str() == "require" && call.arguments.len() == 1 {
                if let Argument::StringLiteral(literal) = &call.arguments[0] {
                    self.push_literal(SpecifierKind::Require, literal);
                }
            }
        }
        walk::walk_call_expression(self, call);
    }

    fn visit_ts_import_equals_declaration(&mut self, decl: &TSImportEqualsDeclaration<'a>) {
        if let TSModuleReference::ExternalModuleReference(external) = &decl.module_reference {
            self.push_literal(SpecifierKind::ImportEquals, &external.expression);
        }
    }
}

/// Export information gathered from a program's top-level statements.
#[derive(Default)]
pub(super) struct ExportSummary {
    pub reexports: Vec<ReexportStatement>,
    pub named: Vec<String>,
    pub default_export: Option<String>,
}

/// Walk top-level statements and record re-exports, named exports and the
/// default export.
pub(super) fn collect_exports(program: &Program<'_>) -> ExportSummary {
    let mut summary = ExportSummary::default();

    for stmt in program.body.iter() {
        let Some(module_decl) = stmt.as_module_declaration() else {
            continue;
        };
        match module_decl {
            ModuleDeclaration::ExportAllDeclaration(all) => {
                summary.reexports.push(ReexportStatement {
                    specifier: all.source.value.to_string(),
                    statement: span_range(all.span),
                });
            }
            ModuleDeclaration::ExportNamedDeclaration(named) => {
                if let Some(source) = &named.source {
                    summary.reexports.push(ReexportStatement {
                        specifier: source.value.to_string(),
                        statement: span_range(named.span),
                    });
                    continue;
                }
                for spec in &named.specifiers {
                    summary.named.push(module_export_name(&spec.exported));
                }
                if let Some(decl) = &named.declaration {
                    collect_declaration_names(decl, &mut summary.named);
                }
            }
            ModuleDeclaration::ExportDefaultDeclaration(default) => {
                summary.default_export = Some(default_export_name(&default.declaration));
            }
            _ => {}
        }
    }

    summary
}

fn span_range(span: Span) -> std::ops::Range<usize> {
    span.start as usize..span.end as usize
}

fn module_export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
        ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}

fn collect_declaration_names(decl: &Declaration<'_>, names: &mut Vec<String>) {
    match decl {
        Declaration::VariableDeclaration(var) => {
            for declarator in &var.declarations {
                if let BindingPatternKind::BindingIdentifier(ident) = &declarator.id.kind {
                    names.push(ident.name.to_string());
                }
            }
        }
        Declaration::FunctionDeclaration(func) => {
            if let Some(id) = &func.id {
                names.push(id.name.to_string());
            }
        }
        Declaration::ClassDeclaration(class) => {
            if let Some(id) = &class.id {
                names.push(id.name.to_string());
            }
        }
        Declaration::TSTypeAliasDeclaration(alias) => names.push(alias.id.name.to_string()),
        Declaration::TSInterfaceDeclaration(interface) => {
            names.push(interface.id.name.to_string());
        }
        Declaration::TSEnumDeclaration(decl) => names.push(decl.id.name.to_string()),
        _ => {}
    }
}

fn default_export_name(kind: &ExportDefaultDeclarationKind<'_>) -> String {
    match kind {
        ExportDefaultDeclarationKind::FunctionDeclaration(func) => func
            .id
            .as_ref()
            .map_or_else(|| DEFAULT_ANONYMOUS.to_string(), |id| id.name.to_string()),
        ExportDefaultDeclarationKind::ClassDeclaration(class) => class
            .id
            .as_ref()
            .map_or_else(|| DEFAULT_ANONYMOUS.to_string(), |id| id.name.to_string()),
        ExportDefaultDeclarationKind::TSInterfaceDeclaration(interface) => {
            interface.id.name.to_string()
        }
        ExportDefaultDeclarationKind::Identifier(ident) => ident.name.to_string(),
        _ => DEFAULT_EXPRESSION.to_string(),
    }
}
