//! The writable layer produced by the checker
//!
//! Everything the pass computes lives here, keyed by node or declaration
//! id: the model and the AST stay immutable.

use crate::ast::NodeId;
use crate::diagnostics::{Diagnostic, DiagnosticBag};
use crate::model::{DeclId, ProducedType, TypeModel};
use serde::Serialize;
use std::collections::BTreeMap;

/// One argument matched to one parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterBinding {
    pub argument: NodeId,
    /// The parameter's value declaration; `None` for indirect invocations
    pub parameter: Option<DeclId>,
}

/// Results of checking one unit
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    types: BTreeMap<NodeId, ProducedType>,
    targets: BTreeMap<NodeId, DeclId>,
    type_arguments: BTreeMap<NodeId, Vec<ProducedType>>,
    bindings: BTreeMap<NodeId, Vec<ParameterBinding>>,
    decl_types: BTreeMap<DeclId, ProducedType>,
    diagnostics: DiagnosticBag,
}

impl Analysis {
    /// The type of an expression node
    pub fn type_of(&self, node: NodeId) -> Option<&ProducedType> {
        self.types.get(&node)
    }

    /// The declaration an invoked or referenced node resolved to, after
    /// overload resolution
    pub fn target(&self, node: NodeId) -> Option<DeclId> {
        self.targets.get(&node).copied()
    }

    /// Type arguments of a generic invocation, explicit or inferred
    pub fn type_arguments(&self, node: NodeId) -> Option<&[ProducedType]> {
        self.type_arguments.get(&node).map(Vec::as_slice)
    }

    /// Argument-to-parameter matches of an invocation
    pub fn bindings(&self, node: NodeId) -> &[ParameterBinding] {
        self.bindings.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Type inferred for a declaration without a declared type
    pub fn decl_type(&self, decl: DeclId) -> Option<&ProducedType> {
        self.decl_types.get(&decl)
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub(super) fn set_type(&mut self, node: NodeId, ty: ProducedType) {
        self.types.insert(node, ty);
    }

    pub(super) fn set_target(&mut self, node: NodeId, decl: DeclId) {
        self.targets.insert(node, decl);
    }

    pub(super) fn set_type_arguments(&mut self, node: NodeId, args: Vec<ProducedType>) {
        self.type_arguments.insert(node, args);
    }

    pub(super) fn bind(&mut self, invocation: NodeId, binding: ParameterBinding) {
        self.bindings.entry(invocation).or_default().push(binding);
    }

    /// Record an inferred declaration type. The first write wins, so
    /// readers never observe the type changing.
    pub(super) fn set_decl_type(&mut self, decl: DeclId, ty: ProducedType) {
        self.decl_types.entry(decl).or_insert(ty);
    }

    pub(super) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// A compact, stable view of the analysis, with types rendered as
    /// source text
    pub fn summary(&self, model: &TypeModel) -> AnalysisSummary {
        AnalysisSummary {
            errors: self.diagnostics.error_count(),
            warnings: self.diagnostics.warning_count(),
            diagnostics: self
                .diagnostics
                .diagnostics()
                .iter()
                .map(|d| DiagnosticSummary {
                    code: d.code.clone(),
                    message: d.message.clone(),
                    node: d.node,
                })
                .collect(),
            declarations: self
                .decl_types
                .iter()
                .map(|(decl, ty)| (model.name(*decl).to_string(), model.type_name(ty)))
                .collect(),
        }
    }

    /// Serialize the full analysis as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticSummary {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<DiagnosticSummary>,
    /// Inferred declaration types by declaration name
    pub declarations: BTreeMap<String, String>,
}
