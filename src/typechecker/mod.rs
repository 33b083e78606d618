//! Expression type checker
//!
//! A single bottom-up pass over a compilation unit. Every expression node
//! is assigned a [`ProducedType`]; generic invocations get inferred type
//! arguments; argument lists are matched against parameter lists; `is`,
//! `exists` and `nonempty` conditions narrow the types of the values they
//! introduce; `switch` and `catch` clauses are checked for disjointness and
//! coverage.
//!
//! Results are written to an [`Analysis`], never to the model or the AST.
//! Semantic errors never abort the pass: the offending node gets a
//! diagnostic and the type `Unknown`, which silences dependent checks.

mod analysis;
mod cases;
mod declarations;
mod expressions;
mod index;
mod inference;
mod invocation;
mod narrowing;
mod operators;
mod overloads;
mod statements;
mod type_args;

pub use analysis::{Analysis, AnalysisSummary, DiagnosticSummary, ParameterBinding};
pub use overloads::{ArityResolver, OverloadResolver};

use crate::ast::*;
use crate::config::TypeckConfig;
use crate::diagnostics::error_codes::{declarations as decl_codes, invocation as call_codes};
use crate::diagnostics::error_codes::{narrowing as narrow_codes, types as type_codes};
use crate::diagnostics::error_codes::warnings as warning_codes;
use crate::diagnostics::{Diagnostic, Note};
use crate::model::{DeclId, DeclKind, ProducedType, TypeArgMap, TypeModel};
use tracing::{debug, instrument, trace};

/// Traversal state threaded through recursion by value
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    /// Function, getter or class whose `return` statements are checked
    returns: Option<DeclId>,
    /// Innermost enclosing class or interface
    class: Option<DeclId>,
    /// Inside a `dynamic` block
    dynamic: bool,
}

impl Context {
    fn returning(self, decl: DeclId) -> Self {
        Self {
            returns: Some(decl),
            ..self
        }
    }

    fn in_class(self, decl: DeclId) -> Self {
        Self {
            returns: Some(decl),
            class: Some(decl),
            ..self
        }
    }

    fn in_dynamic(self) -> Self {
        Self {
            dynamic: true,
            ..self
        }
    }
}

/// The type checker for one compilation unit
pub struct TypeChecker<'a> {
    model: &'a TypeModel,
    ast: &'a Ast,
    config: &'a TypeckConfig,
    resolver: Box<dyn OverloadResolver + 'a>,
    analysis: Analysis,
    /// Types returned so far by functions whose return type is inferred
    returned: Vec<(DeclId, ProducedType)>,
}

impl<'a> TypeChecker<'a> {
    /// Create a checker using the default overload resolver
    pub fn new(model: &'a TypeModel, ast: &'a Ast, config: &'a TypeckConfig) -> Self {
        Self {
            model,
            ast,
            config,
            resolver: Box::new(ArityResolver),
            analysis: Analysis::default(),
            returned: Vec::new(),
        }
    }

    /// Replace the overload resolver
    pub fn with_resolver(mut self, resolver: impl OverloadResolver + 'a) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Check the given toplevel statements and return the analysis
    pub fn check(mut self, roots: &[NodeId]) -> Analysis {
        let ctx = Context {
            dynamic: self.config.checker.dynamic,
            ..Context::default()
        };
        for &root in roots {
            self.check_statement(root, ctx);
        }
        debug!(
            errors = self.analysis.diagnostics().error_count(),
            warnings = self.analysis.diagnostics().warning_count(),
            "unit checked"
        );
        self.analysis
    }

    // Reporting

    fn report(&mut self, diagnostic: Diagnostic) {
        let options = &self.config.checker;
        if diagnostic.is_error() {
            if options
                .max_errors
                .is_some_and(|max| self.analysis.diagnostics().error_count() >= max)
            {
                trace!(code = %diagnostic.code, "error limit reached, dropping diagnostic");
                return;
            }
        } else if !options.warnings {
            return;
        }
        self.analysis.push_diagnostic(diagnostic);
    }

    fn error(&mut self, node: NodeId, code: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic::error(code)
            .message(message)
            .span(self.ast.span(node).clone())
            .node(node)
            .build();
        self.report(diagnostic);
    }

    fn error_with_help(
        &mut self,
        node: NodeId,
        code: &str,
        message: impl Into<String>,
        help: impl Into<String>,
    ) {
        let diagnostic = Diagnostic::error(code)
            .message(message)
            .span(self.ast.span(node).clone())
            .node(node)
            .help(help)
            .build();
        self.report(diagnostic);
    }

    fn error_with_note(
        &mut self,
        node: NodeId,
        code: &str,
        message: impl Into<String>,
        note: Note,
    ) {
        let diagnostic = Diagnostic::error(code)
            .message(message)
            .span(self.ast.span(node).clone())
            .node(node)
            .note(note)
            .build();
        self.report(diagnostic);
    }

    fn warning(&mut self, node: NodeId, code: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(code)
            .message(message)
            .span(self.ast.span(node).clone())
            .node(node)
            .build();
        self.report(diagnostic);
    }

    // Shared helpers

    fn name(&self, ty: &ProducedType) -> String {
        self.model.type_name(ty)
    }

    fn decl_name(&self, decl: DeclId) -> &'a str {
        self.model.name(decl)
    }

    /// Type computed for an already visited node
    fn type_of(&self, node: NodeId) -> ProducedType {
        self.analysis
            .type_of(node)
            .cloned()
            .unwrap_or(ProducedType::Unknown)
    }

    /// Declared type of a value, or the type inferred for it so far
    fn value_type(&self, decl: DeclId) -> ProducedType {
        if let Some(ty) = self.model.value(decl).and_then(|v| v.ty.as_ref()) {
            return ty.clone();
        }
        self.analysis
            .decl_type(decl)
            .cloned()
            .unwrap_or(ProducedType::Unknown)
    }

    /// Declared return type of a function, or the inferred one; `Anything`
    /// for `void` functions
    fn return_type(&self, decl: DeclId) -> ProducedType {
        match self.model.function(decl) {
            Some(f) if f.declared_void => self.model.anything_type(),
            Some(f) => f
                .return_type
                .clone()
                .or_else(|| self.analysis.decl_type(decl).cloned())
                .unwrap_or(ProducedType::Unknown),
            None => ProducedType::Unknown,
        }
    }

    /// Report `message` unless `actual` is assignable to `expected`.
    /// Types involving `Unknown` are never reported.
    fn check_assignable(
        &mut self,
        node: NodeId,
        actual: &ProducedType,
        expected: &ProducedType,
        message: &str,
    ) -> bool {
        self.check_assignable_with(node, actual, expected, type_codes::TYPE_MISMATCH, message)
    }

    fn check_assignable_with(
        &mut self,
        node: NodeId,
        actual: &ProducedType,
        expected: &ProducedType,
        code: &str,
        message: &str,
    ) -> bool {
        if actual.contains_unknown() || expected.contains_unknown() {
            return true;
        }
        if self.model.is_subtype_of(actual, expected) {
            return true;
        }
        let text = format!(
            "{message}: {} is not assignable to {}",
            self.name(actual),
            self.name(expected)
        );
        self.error(node, code, text);
        false
    }

    /// The supertype of `ty` for `decl`, reporting `message` when `ty` has
    /// none. `Unknown` yields `None` silently.
    fn check_supertype(
        &mut self,
        node: NodeId,
        ty: &ProducedType,
        decl: DeclId,
        message: &str,
    ) -> Option<ProducedType> {
        if ty.is_unknown() {
            return None;
        }
        let found = self.model.supertype(ty, decl);
        if found.is_none() {
            let text = format!(
                "{message}: {} is not a subtype of {}",
                self.name(ty),
                self.decl_name(decl)
            );
            self.error(node, type_codes::INVALID_OPERAND, text);
        }
        found
    }

    /// The declaration a plain value reference binds to
    fn referenced_value(&self, node: NodeId) -> Option<DeclId> {
        match self.ast.kind(node) {
            NodeKind::BaseMember(member) => member.decl,
            _ => None,
        }
    }

    /// Values whose nullity is not statically checked
    fn has_unchecked_nulls(&self, node: NodeId) -> bool {
        let decl = match self.ast.kind(node) {
            NodeKind::BaseMember(member) => member.decl,
            NodeKind::QualifiedMember { member, .. } => member.decl,
            _ => None,
        };
        decl.and_then(|d| self.model.value(d))
            .is_some_and(|v| v.unchecked_null)
    }
}

/// Check a compilation unit against the model
#[instrument(skip_all, fields(nodes = unit.ast.len(), roots = unit.roots.len()))]
pub fn check_unit(model: &TypeModel, unit: &CompilationUnit, config: &TypeckConfig) -> Analysis {
    TypeChecker::new(model, &unit.ast, config).check(&unit.roots)
}
