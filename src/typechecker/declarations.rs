//! Class and interface declaration checks
//!
//! These run when the traversal reaches a class or interface definition,
//! before its body: the inheritance clause, self types, enumerated cases
//! and the instantiations inherited through the supertype graph.

use super::*;
use crate::model::{SupertypeSearch, Variance};

impl TypeChecker<'_> {
    pub(super) fn check_type_declaration(&mut self, node: NodeId, decl: DeclId) {
        let model = self.model;
        let Some(ci) = model.class_or_interface(decl) else {
            return;
        };
        let declared = model.declared_type(decl);

        if let Some(extended) = &ci.extended {
            if let Some(class) = extended.declaration().filter(|d| model.is_final(*d)) {
                self.error(
                    node,
                    decl_codes::EXTENDS_FINAL,
                    format!("extends a final class: {} is final", self.decl_name(class)),
                );
            }
        }

        for (i, satisfied) in ci.satisfied.iter().enumerate() {
            let duplicate = ci.satisfied[..i]
                .iter()
                .any(|earlier| earlier.declaration().is_some() && earlier.declaration() == satisfied.declaration());
            if duplicate {
                self.error(
                    node,
                    decl_codes::DUPLICATE_SATISFIED_TYPE,
                    format!("duplicate satisfied type: {}", self.name(satisfied)),
                );
            }
        }

        for supertype in ci.extended.iter().chain(&ci.satisfied) {
            self.check_self_type_arguments(node, decl, &declared, supertype);
        }

        for case in &ci.case_types {
            if !case.contains_unknown() && !model.is_subtype_of(case, &declared) {
                self.error(
                    node,
                    decl_codes::INVALID_CASE_TYPE,
                    format!(
                        "case type must be a subtype of enumerated type: {} is not a subtype of {}",
                        self.name(case),
                        self.name(&declared)
                    ),
                );
            }
        }

        for supertype in ci.extended.iter().chain(&ci.satisfied) {
            self.check_enumerated_supertype_arguments(node, decl, supertype);
        }
        if model.is_class(decl) && !ci.is_abstract {
            self.check_enumerated_supertype_cases(node, &declared);
        }
        self.check_ambiguous_supertypes(node, &declared);
    }

    /// A type argument to a self-type parameter must be the satisfying type
    fn check_self_type_arguments(
        &mut self,
        node: NodeId,
        decl: DeclId,
        declared: &ProducedType,
        supertype: &ProducedType,
    ) {
        let model = self.model;
        let Some(applied) = supertype.as_applied() else {
            return;
        };
        let own_self_type = model.self_type(decl);
        for (param, arg) in model.type_parameters(applied.decl).iter().zip(&applied.args) {
            if !model.is_self_type(*param) || arg.contains_unknown() {
                continue;
            }
            let accepted = match arg {
                ProducedType::Parameter(p) => Some(*p) == own_self_type,
                _ => model.is_exactly(arg, declared),
            };
            if !accepted {
                self.error(
                    node,
                    decl_codes::SELF_TYPE_VIOLATION,
                    format!(
                        "type argument does not satisfy self type constraint on type parameter {} of {}: {} is not {}",
                        self.decl_name(*param),
                        self.decl_name(applied.decl),
                        self.name(arg),
                        self.name(declared)
                    ),
                );
            }
        }
    }

    /// Arguments to an enumerated supertype must be type parameters of
    /// matching variance, or `Nothing`/`Anything` at the covariant and
    /// contravariant positions
    fn check_enumerated_supertype_arguments(&mut self, node: NodeId, decl: DeclId, supertype: &ProducedType) {
        let model = self.model;
        let Some(applied) = supertype.as_applied() else {
            return;
        };
        if model.case_types(applied.decl).is_empty() || model.self_type(applied.decl).is_some() {
            return;
        }
        let own = model.type_parameters(decl);
        for (param, arg) in model.type_parameters(applied.decl).iter().zip(&applied.args) {
            let variance = model.variance(*param);
            let valid = match arg {
                ProducedType::Nothing => variance == Variance::Covariant,
                ProducedType::Unknown => true,
                ProducedType::Parameter(p) if own.contains(p) => model.variance(*p) == variance,
                _ if model.is_anything(arg) => variance == Variance::Contravariant,
                _ => false,
            };
            if !valid {
                self.error(
                    node,
                    decl_codes::ENUMERATED_SUPERTYPE_VARIANCE,
                    format!(
                        "argument to {} type parameter {} of enumerated supertype {} must be a {} type parameter of {}: {}",
                        variance_name(variance),
                        self.decl_name(*param),
                        self.decl_name(applied.decl),
                        variance_name(variance),
                        self.decl_name(decl),
                        self.name(arg)
                    ),
                );
            }
        }
    }

    /// A concrete class belongs to exactly one case of each enumerated
    /// type it inherits
    fn check_enumerated_supertype_cases(&mut self, node: NodeId, declared: &ProducedType) {
        let model = self.model;
        for supertype in model.all_supertypes(declared) {
            let Some(applied) = supertype.as_applied() else {
                continue;
            };
            let cases = model.applied_cases(applied);
            if cases.is_empty() || cases.iter().any(ProducedType::contains_unknown) {
                continue;
            }
            let matching = cases
                .iter()
                .filter(|case| model.is_subtype_of(declared, case))
                .count();
            if matching == 1 {
                continue;
            }
            let relation = if matching == 0 { "not a subtype of any" } else { "a subtype of more than one" };
            self.error(
                node,
                decl_codes::ENUMERATED_SUPERTYPE_CASE,
                format!(
                    "concrete class is {relation} case of enumerated supertype: {} inherits {}",
                    self.name(declared),
                    self.name(&supertype)
                ),
            );
        }
    }

    fn check_ambiguous_supertypes(&mut self, node: NodeId, declared: &ProducedType) {
        let model = self.model;
        for supertype in model.all_supertypes(declared) {
            let Some(target) = supertype.declaration() else {
                continue;
            };
            if let SupertypeSearch::Ambiguous(first, second) = model.supertype_search(declared, target) {
                self.error(
                    node,
                    type_codes::AMBIGUOUS_SUPERTYPE,
                    format!(
                        "type inherits incompatible instantiations of {}: {} and {}",
                        self.decl_name(target),
                        self.name(&first),
                        self.name(&second)
                    ),
                );
            }
        }
    }
}

fn variance_name(variance: Variance) -> &'static str {
    match variance {
        Variance::Covariant => "covariant",
        Variance::Contravariant => "contravariant",
        Variance::Invariant => "invariant",
    }
}
