//! Operator expressions
//!
//! Operators are typed through the language module interfaces they are
//! defined by: `x + y` requires `Summable`, `x < y` requires `Comparable`,
//! `x[..]` requires `Ranged`, and so on. The operand's supertype for the
//! interface supplies the result type.

use super::*;

/// Which `Numeric` family interface an arithmetic operator needs
fn arithmetic_interface(model: &TypeModel, op: BinaryOp) -> DeclId {
    let lang = model.lang();
    match op {
        BinaryOp::Sum => lang.summable,
        BinaryOp::Remainder => lang.integral,
        BinaryOp::Power => lang.exponentiable,
        _ => lang.numeric,
    }
}

/// The arithmetic operator behind an assignment operator
fn arithmetic_of(op: BinaryOp) -> Option<BinaryOp> {
    match op {
        BinaryOp::AddAssign => Some(BinaryOp::Sum),
        BinaryOp::SubtractAssign => Some(BinaryOp::Difference),
        BinaryOp::MultiplyAssign => Some(BinaryOp::Product),
        BinaryOp::DivideAssign => Some(BinaryOp::Quotient),
        BinaryOp::RemainderAssign => Some(BinaryOp::Remainder),
        _ => None,
    }
}

impl TypeChecker<'_> {
    pub(super) fn check_binary(
        &mut self,
        node: NodeId,
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
        ctx: Context,
    ) -> ProducedType {
        let model = self.model;
        let left = self.check_expr(lhs, ctx);
        let right = self.check_expr(rhs, ctx);
        match op {
            BinaryOp::Sum
            | BinaryOp::Difference
            | BinaryOp::Product
            | BinaryOp::Quotient
            | BinaryOp::Remainder
            | BinaryOp::Power => self.check_arithmetic(op, lhs, &left, rhs, &right),
            BinaryOp::AddAssign
            | BinaryOp::SubtractAssign
            | BinaryOp::MultiplyAssign
            | BinaryOp::DivideAssign
            | BinaryOp::RemainderAssign => {
                self.check_assignable_target(lhs);
                let arithmetic = arithmetic_of(op).unwrap_or(BinaryOp::Sum);
                let result = self.check_arithmetic(arithmetic, lhs, &left, rhs, &right);
                self.check_assignable(node, &result, &left, "result type must be assignable to declared type");
                left
            }
            BinaryOp::Smaller | BinaryOp::Larger | BinaryOp::SmallAs | BinaryOp::LargeAs => {
                self.check_comparable(lhs, &left, rhs, &right);
                model.boolean_type()
            }
            BinaryOp::Compare => {
                self.check_comparable(lhs, &left, rhs, &right);
                model.comparison_type()
            }
            BinaryOp::Equal | BinaryOp::NotEqual => {
                let object = model.lang().object;
                self.check_supertype(lhs, &left, object, "operand expression must be of type Object");
                self.check_supertype(rhs, &right, object, "operand expression must be of type Object");
                model.boolean_type()
            }
            BinaryOp::Identical => {
                let identifiable = model.lang().identifiable;
                self.check_supertype(lhs, &left, identifiable, "operand expression must be of type Identifiable");
                self.check_supertype(rhs, &right, identifiable, "operand expression must be of type Identifiable");
                model.boolean_type()
            }
            BinaryOp::And | BinaryOp::Or | BinaryOp::AndAssign | BinaryOp::OrAssign => {
                if matches!(op, BinaryOp::AndAssign | BinaryOp::OrAssign) {
                    self.check_assignable_target(lhs);
                }
                let boolean = model.boolean_type();
                self.check_assignable(lhs, &left, &boolean, "logical operand expression must be a boolean value");
                self.check_assignable(rhs, &right, &boolean, "logical operand expression must be a boolean value");
                boolean
            }
            BinaryOp::In => {
                self.check_supertype(lhs, &left, model.lang().object, "operand expression must support equality");
                self.check_supertype(rhs, &right, model.lang().category, "operand expression must be a category");
                model.boolean_type()
            }
            BinaryOp::Range => self.check_range(node, &left, &right),
            BinaryOp::Segment => {
                self.check_supertype(lhs, &left, model.lang().ordinal, "left operand must be of ordinal type");
                self.check_assignable(rhs, &right, &model.integer_type(), "right operand must be an integer");
                if left.is_unknown() {
                    return ProducedType::Unknown;
                }
                model.sequential_type(model.denotable(&left))
            }
            BinaryOp::Entry => {
                let object = model.object_type();
                self.check_assignable(lhs, &left, &object, "operand expression must not be an optional type");
                self.check_assignable(rhs, &right, &object, "operand expression must not be an optional type");
                model.entry_type(model.denotable(&left), model.denotable(&right))
            }
            BinaryOp::Union | BinaryOp::Intersection | BinaryOp::Complement => {
                self.check_set_operator(op, lhs, &left, rhs, &right)
            }
            BinaryOp::UnionAssign | BinaryOp::IntersectionAssign | BinaryOp::ComplementAssign => {
                self.check_assignable_target(lhs);
                let set_op = match op {
                    BinaryOp::UnionAssign => BinaryOp::Union,
                    BinaryOp::IntersectionAssign => BinaryOp::Intersection,
                    _ => BinaryOp::Complement,
                };
                let result = self.check_set_operator(set_op, lhs, &left, rhs, &right);
                let set = model.lang().set;
                if let (Some(declared), Some(produced)) =
                    (model.supertype(&left, set), model.supertype(&result, set))
                {
                    if let (Some(declared), Some(produced)) = (declared.arg(0), produced.arg(0)) {
                        self.check_assignable(
                            rhs,
                            produced,
                            declared,
                            "resulting set element type must be assignable to declared set element type",
                        );
                    }
                }
                left
            }
            BinaryOp::Else => {
                self.check_optional(lhs, &left);
                if left.is_unknown() || right.is_unknown() {
                    return ProducedType::Unknown;
                }
                model.union2(model.denotable(&right), model.definite(&model.denotable(&left)))
            }
            BinaryOp::Then => {
                self.check_assignable(lhs, &left, &model.boolean_type(), "operand expression must be a boolean value");
                if !right.is_unknown() && model.is_optional(&right) {
                    self.error(
                        rhs,
                        type_codes::INVALID_OPERAND,
                        "operand expression may not be an optional type",
                    );
                }
                if right.is_unknown() {
                    return ProducedType::Unknown;
                }
                model.optional_type(model.denotable(&right))
            }
            BinaryOp::Assign => {
                self.check_assignable_target(lhs);
                let target = if self.has_unchecked_nulls(lhs) {
                    model.optional_type(left)
                } else {
                    left
                };
                self.check_assignable(rhs, &right, &target, "assigned expression must be assignable to declared type");
                right
            }
        }
    }

    pub(super) fn check_unary(
        &mut self,
        node: NodeId,
        op: UnaryOp,
        operand: NodeId,
        ctx: Context,
    ) -> ProducedType {
        let model = self.model;
        let ty = self.check_expr(operand, ctx);
        match op {
            UnaryOp::Negative | UnaryOp::Positive => self
                .check_supertype(operand, &ty, model.lang().invertable, "operand expression must be of correct type")
                .and_then(|st| st.arg(0).cloned())
                .unwrap_or(ProducedType::Unknown),
            UnaryOp::Not => {
                let boolean = model.boolean_type();
                self.check_assignable(operand, &ty, &boolean, "operand expression must be a boolean value");
                boolean
            }
            UnaryOp::PreIncrement
            | UnaryOp::PreDecrement
            | UnaryOp::PostIncrement
            | UnaryOp::PostDecrement => {
                self.check_assignable_target(operand);
                let ordinal = self.check_supertype(
                    operand,
                    &ty,
                    model.lang().ordinal,
                    "operand expression must be of ordinal type",
                );
                if let Some(result) = ordinal.as_ref().and_then(|st| st.arg(0)) {
                    self.check_assignable(node, result, &ty, "result type must be assignable to declared type");
                }
                ty
            }
            UnaryOp::Exists => {
                self.check_optional(operand, &ty);
                model.boolean_type()
            }
            UnaryOp::Nonempty => {
                self.check_possibly_empty(operand, &ty);
                model.boolean_type()
            }
        }
    }

    /// `Integer` widens to `Float` when the other operand is a `Float`
    fn widen(&self, ty: &ProducedType, other: &ProducedType) -> ProducedType {
        let model = self.model;
        let (integer, float) = (model.integer_type(), model.float_type());
        if model.is_subtype_of(ty, &integer) && model.is_subtype_of(other, &float) {
            float
        } else {
            ty.clone()
        }
    }

    fn check_arithmetic(
        &mut self,
        op: BinaryOp,
        lhs: NodeId,
        left: &ProducedType,
        rhs: NodeId,
        right: &ProducedType,
    ) -> ProducedType {
        if left.is_unknown() || right.is_unknown() {
            return ProducedType::Unknown;
        }
        let model = self.model;
        let interface = arithmetic_interface(model, op);
        let left = self.widen(left, right);
        let right = self.widen(right, &left);
        let Some(st) = self.check_supertype(lhs, &left, interface, "operand expression must be of numeric type") else {
            return ProducedType::Unknown;
        };
        let Some(result) = st.arg(0).cloned() else {
            return ProducedType::Unknown;
        };
        if op == BinaryOp::Power {
            let exponent = st.arg(1).cloned().unwrap_or(ProducedType::Unknown);
            self.check_assignable(rhs, &right, &exponent, "operands must be of compatible numeric type");
        } else if self
            .check_supertype(rhs, &right, interface, "operand expression must be of numeric type")
            .is_some()
        {
            self.check_assignable(rhs, &right, &result, "operands must be of compatible numeric type");
        }
        result
    }

    fn check_comparable(&mut self, lhs: NodeId, left: &ProducedType, rhs: NodeId, right: &ProducedType) {
        let comparable = self.model.lang().comparable;
        let Some(st) = self.check_supertype(lhs, left, comparable, "operand expressions must be comparable") else {
            return;
        };
        if let Some(other) = st.arg(0) {
            self.check_assignable(rhs, right, other, "operand expressions must be comparable");
        }
    }

    fn check_range(&mut self, node: NodeId, left: &ProducedType, right: &ProducedType) -> ProducedType {
        if left.is_unknown() || right.is_unknown() {
            return ProducedType::Unknown;
        }
        let model = self.model;
        let element = if model.is_subtype_of(right, left) {
            left.clone()
        } else if model.is_subtype_of(left, right) {
            right.clone()
        } else {
            self.error(
                node,
                type_codes::INVALID_OPERAND,
                format!(
                    "operand expressions must be of compatible ordinal type: {} and {} are unrelated",
                    self.name(left),
                    self.name(right)
                ),
            );
            return ProducedType::Unknown;
        };
        let lang = model.lang();
        self.check_supertype(node, &element, lang.ordinal, "operand expressions must be of compatible ordinal type");
        let comparable = self.check_supertype(node, &element, lang.comparable, "operand expressions must be comparable");
        if let Some(other) = comparable.as_ref().and_then(|st| st.arg(0)) {
            self.check_assignable(node, &element, other, "ordinal type must be assignable to comparable type");
        }
        model.range_type(model.denotable(&element))
    }

    fn check_set_operator(
        &mut self,
        op: BinaryOp,
        lhs: NodeId,
        left: &ProducedType,
        rhs: NodeId,
        right: &ProducedType,
    ) -> ProducedType {
        let model = self.model;
        let set = model.lang().set;
        let left_set = self.check_supertype(lhs, left, set, "set operand expression must be a set");
        let right_set = self.check_supertype(rhs, right, set, "set operand expression must be a set");
        let (Some(left_set), Some(right_set)) = (left_set, right_set) else {
            return ProducedType::Unknown;
        };
        let element = |st: &ProducedType| st.arg(0).cloned().unwrap_or(ProducedType::Unknown);
        let (le, re) = (element(&left_set), element(&right_set));
        let result = match op {
            BinaryOp::Union => model.union2(le, re),
            BinaryOp::Intersection => model.intersection2(le, re),
            _ => le,
        };
        model.set_type(result)
    }

    /// The operand of an assignment must be a variable value
    pub(super) fn check_assignable_target(&mut self, node: NodeId) {
        let decl = match self.ast.kind(node) {
            NodeKind::BaseMember(member) | NodeKind::QualifiedMember { member, .. } => member.decl,
            _ => {
                self.error(node, type_codes::NOT_VARIABLE, "expression cannot be assigned");
                return;
            }
        };
        let Some(decl) = decl else {
            return;
        };
        match self.model.value(decl) {
            Some(value) if value.variable || value.late => {}
            Some(_) => {
                let name = self.decl_name(decl);
                self.error(node, type_codes::NOT_VARIABLE, format!("value is not variable: {name}"));
            }
            None => self.error(node, type_codes::NOT_VARIABLE, "expression cannot be assigned"),
        }
    }
}
