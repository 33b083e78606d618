//! Lumen type checker core
//!
//! The semantic pass of the Lumen front end: assigns a type to every
//! expression, infers generic type arguments, matches invocation arguments
//! to parameters, and performs flow-sensitive narrowing and case analysis.
//!
//! The pass consumes a [`model::TypeModel`] (the declaration graph produced
//! by the binding pass) and an [`ast::Ast`], and produces an
//! [`typechecker::Analysis`] holding computed types and diagnostics.

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod model;
pub mod typechecker;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ast::{Ast, AstBuilder, CompilationUnit, NodeId};
    pub use crate::config::TypeckConfig;
    pub use crate::diagnostics::{Diagnostic, DiagnosticBag, Severity, Span};
    pub use crate::model::{DeclId, ProducedType, TypeModel, Variance};
    pub use crate::typechecker::{check_unit, Analysis, TypeChecker};
}
