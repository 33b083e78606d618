//! Flow-sensitive narrowing
//!
//! Conditions of `if` and `while` statements introduce values whose types
//! are narrower than the tested expression's: `is T x` intersects with `T`,
//! `!is T x` subtracts `T`, `exists x` removes `Null`, `nonempty x` removes
//! `Empty`. The introduced value is a separate declaration the block's
//! references bind to; its type is recorded in the analysis.
//!
//! Narrowing an existing reference in place (`if (is String x)`) is only
//! sound when the reference is constant, so such conditions also check the
//! referenced value.

use super::*;

const NARROW_HELP: &str = "assign to a new local value to narrow type";
const VACUOUS_HELP: &str = "expression is already of the specified type";

impl TypeChecker<'_> {
    pub(super) fn check_condition(&mut self, node: NodeId, condition: &Condition, ctx: Context) {
        let model = self.model;
        match condition {
            Condition::Is {
                negated,
                ty,
                variable,
                expr,
            } => {
                let known = self.check_expr(*expr, ctx);
                if variable.is_some_and(|v| v.synthetic) {
                    self.check_constant_reference(*expr);
                }
                self.warn_unchecked_type_arguments(node, ty);
                let narrowed = self.narrow_is(node, &known, ty, *negated);
                if let Some(variable) = variable {
                    self.analysis.set_decl_type(variable.decl, narrowed);
                }
            }
            Condition::Exists { variable, expr } => {
                let known = self.check_expr(*expr, ctx);
                if variable.is_some_and(|v| v.synthetic) {
                    self.check_constant_reference(*expr);
                }
                self.check_optional(*expr, &known);
                if let Some(variable) = variable {
                    let narrowed = if known.is_unknown() {
                        known
                    } else {
                        model.definite(&known)
                    };
                    self.analysis.set_decl_type(variable.decl, narrowed);
                }
            }
            Condition::Nonempty { variable, expr } => {
                let known = self.check_expr(*expr, ctx);
                if variable.is_some_and(|v| v.synthetic) {
                    self.check_constant_reference(*expr);
                }
                self.check_possibly_empty(*expr, &known);
                if let Some(variable) = variable {
                    let narrowed = if known.is_unknown() {
                        known
                    } else {
                        model.nonempty(&known)
                    };
                    self.analysis.set_decl_type(variable.decl, narrowed);
                }
            }
            Condition::Boolean(expr) => {
                let ty = self.check_expr(*expr, ctx);
                self.check_assignable(*expr, &ty, &model.boolean_type(), "expression must be of boolean type");
            }
        }
    }

    /// The type of the value introduced by an `is` condition, reporting
    /// tests that cannot narrow
    pub(super) fn narrow_is(
        &mut self,
        node: NodeId,
        known: &ProducedType,
        ty: &ProducedType,
        negated: bool,
    ) -> ProducedType {
        let model = self.model;
        if ty.contains_unknown() {
            return ProducedType::Unknown;
        }
        if known.is_unknown() {
            return if negated {
                ProducedType::Unknown
            } else {
                ty.clone()
            };
        }
        let (known_name, ty_name) = (self.name(known), self.name(ty));
        if negated {
            if model.intersection2(ty.clone(), known.clone()).is_nothing() {
                self.error_with_help(
                    node,
                    narrow_codes::VACUOUS_NARROWING,
                    format!("does not narrow type: intersection of {ty_name} and {known_name} is empty"),
                    VACUOUS_HELP,
                );
            } else if model.is_subtype_of(known, ty) {
                self.error(
                    node,
                    narrow_codes::NARROWS_TO_NOTHING,
                    format!("tests assignability to Nothing type: {known_name} is a subtype of {ty_name}"),
                );
            }
            model.minus(known, ty)
        } else {
            if model.is_subtype_of(known, ty) {
                self.error_with_help(
                    node,
                    narrow_codes::VACUOUS_NARROWING,
                    format!("does not narrow type: {known_name} is a subtype of {ty_name}"),
                    VACUOUS_HELP,
                );
            }
            let narrowed = model.intersection2(ty.clone(), known.clone());
            if narrowed.is_nothing() {
                self.error(
                    node,
                    narrow_codes::NARROWS_TO_NOTHING,
                    format!("tests assignability to Nothing type: intersection of {known_name} and {ty_name} is empty"),
                );
            }
            narrowed
        }
    }

    /// `x is T` as an expression
    pub(super) fn check_is_test(
        &mut self,
        node: NodeId,
        operand: NodeId,
        ty: &ProducedType,
        ctx: Context,
    ) -> ProducedType {
        let model = self.model;
        let known = self.check_expr(operand, ctx);
        self.warn_unchecked_type_arguments(node, ty);
        if !known.is_unknown() && !ty.contains_unknown() {
            let (known_name, ty_name) = (self.name(&known), self.name(ty));
            if model.is_subtype_of(&known, ty) {
                self.error(
                    node,
                    narrow_codes::VACUOUS_NARROWING,
                    format!("expression type is a subtype of the type: {known_name} is assignable to {ty_name}"),
                );
            } else if model.intersection2(ty.clone(), known.clone()).is_nothing() {
                self.error(
                    node,
                    narrow_codes::NARROWS_TO_NOTHING,
                    format!("tests assignability to Nothing type: intersection of {known_name} and {ty_name} is empty"),
                );
            }
        }
        model.boolean_type()
    }

    /// A reference narrowed in place must be a value that cannot change
    /// between the test and its uses
    pub(super) fn check_constant_reference(&mut self, expr: NodeId) {
        let Some(decl) = self.referenced_value(expr) else {
            return;
        };
        let name = self.decl_name(decl);
        let message = match self.model.value(decl) {
            None => format!("referenced declaration is not a value: {name}"),
            Some(v) if v.variable || v.late || v.transient => {
                format!("referenced value is non-constant: {name}")
            }
            Some(v) if v.formal || v.default => {
                format!("referenced value may be refined by a non-constant value: {name}")
            }
            Some(_) => return,
        };
        self.error_with_help(expr, narrow_codes::NON_CONSTANT_REFERENCE, message, NARROW_HELP);
    }

    /// The operand of `exists` (or `else`, `?.`) must be optional
    pub(super) fn check_optional(&mut self, node: NodeId, ty: &ProducedType) {
        if ty.is_unknown() || self.has_unchecked_nulls(node) || self.model.is_optional(ty) {
            return;
        }
        self.error(
            node,
            narrow_codes::NOT_OPTIONAL,
            format!("expression must be of optional type: {} is not optional", self.name(ty)),
        );
    }

    /// The operand of `nonempty` must be possibly empty
    pub(super) fn check_possibly_empty(&mut self, node: NodeId, ty: &ProducedType) {
        if ty.is_unknown() || self.model.is_possibly_empty(ty) {
            return;
        }
        self.error(
            node,
            narrow_codes::NOT_POSSIBLY_EMPTY,
            format!(
                "expression must be a possibly-empty type: {} is not possibly-empty",
                self.name(ty)
            ),
        );
    }

    /// Type arguments of a tested type cannot be checked at runtime
    pub(super) fn warn_unchecked_type_arguments(&mut self, node: NodeId, ty: &ProducedType) {
        if has_type_arguments(&self.model.resolve_aliases(ty)) {
            self.warning(
                node,
                warning_codes::UNCHECKED_TYPE_ARGUMENTS,
                format!("type arguments are not checked at runtime: {}", self.name(ty)),
            );
        }
    }
}

fn has_type_arguments(ty: &ProducedType) -> bool {
    match ty {
        ProducedType::Declared(applied) => !applied.args.is_empty(),
        ProducedType::Union(types) | ProducedType::Intersection(types) => {
            types.iter().any(has_type_arguments)
        }
        ProducedType::Parameter(_) | ProducedType::Nothing | ProducedType::Unknown => false,
    }
}
