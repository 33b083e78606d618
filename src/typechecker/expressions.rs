//! Expression dispatch, literals and references

use super::invocation::{Argument, MemberReceiver};
use super::*;

impl TypeChecker<'_> {
    /// Compute, record and return the type of an expression
    pub(super) fn check_expr(&mut self, node: NodeId, ctx: Context) -> ProducedType {
        trace!(node = node.0, "visiting expression");
        let ast = self.ast;
        let model = self.model;
        let ty = match ast.kind(node) {
            NodeKind::Literal(literal) => self.check_literal(node, literal),
            NodeKind::StringTemplate(parts) => {
                let object = model.object_type();
                for &part in parts {
                    let ty = self.check_expr(part, ctx);
                    self.check_assignable(
                        part,
                        &ty,
                        &object,
                        "interpolated expression must not be an optional type",
                    );
                }
                model.string_type()
            }
            NodeKind::BaseMember(member) | NodeKind::BaseType(member) => {
                self.check_base_reference(node, member, ctx)
            }
            NodeKind::QualifiedMember {
                receiver,
                operator,
                member,
            } => self.check_qualified_reference(node, *receiver, *operator, member, ctx),
            NodeKind::This => match ctx.class {
                Some(class) => model.declared_type(class),
                None => {
                    self.error(
                        node,
                        type_codes::MISPLACED_EXPRESSION,
                        "this appears outside a class or interface definition",
                    );
                    ProducedType::Unknown
                }
            },
            NodeKind::Invocation { primary, arguments } => {
                self.check_invocation(node, *primary, arguments, ctx)
            }
            NodeKind::Binary { op, lhs, rhs } => self.check_binary(node, *op, *lhs, *rhs, ctx),
            NodeKind::Unary { op, operand } => self.check_unary(node, *op, *operand, ctx),
            NodeKind::IsTest { operand, ty } => self.check_is_test(node, *operand, ty, ctx),
            NodeKind::Of { operand, ty } => {
                let known = self.check_expr(*operand, ctx);
                if !known.contains_unknown() && !ty.contains_unknown() && !model.covers(ty, &known) {
                    self.error(
                        node,
                        type_codes::TYPE_MISMATCH,
                        format!(
                            "specified type does not cover the cases of the operand expression: {} does not cover {}",
                            self.name(ty),
                            self.name(&known)
                        ),
                    );
                }
                ty.clone()
            }
            NodeKind::Index { primary, index } => self.check_index(*primary, *index, ctx),
            NodeKind::Tuple(elements) => {
                let args = self.check_positional_args(elements, ctx);
                self.tuple_literal_type(&args, true)
            }
            NodeKind::SequenceEnumeration(elements) => {
                let args = self.check_positional_args(elements, ctx);
                let literal = self.tuple_literal_type(&args, false);
                model
                    .supertype(&literal, model.lang().iterable)
                    .unwrap_or(ProducedType::Unknown)
            }
            NodeKind::AnonymousFunction { decl, body } => {
                self.check_function_body(*decl, *body, ctx);
                self.reference_type(*decl, &TypeArgMap::new(), None)
            }
            NodeKind::Dynamic(members) => {
                if !ctx.dynamic {
                    self.error(
                        node,
                        type_codes::MISPLACED_EXPRESSION,
                        "dynamic instantiation expression occurs outside dynamic block",
                    );
                }
                for &member in members {
                    self.check_expr(member, ctx);
                }
                ProducedType::Unknown
            }
            _ => {
                self.check_statement(node, ctx);
                ProducedType::Unknown
            }
        };
        self.analysis.set_type(node, ty.clone());
        ty
    }

    fn check_literal(&mut self, node: NodeId, literal: &Literal) -> ProducedType {
        let model = self.model;
        match literal {
            Literal::Integer(_) => model.integer_type(),
            Literal::Float(_) => model.float_type(),
            Literal::String(_) => model.string_type(),
            Literal::Character(text) => {
                if text.chars().count() != 1 {
                    self.error(
                        node,
                        type_codes::INVALID_LITERAL,
                        "character literal must contain exactly one character",
                    );
                }
                model.character_type()
            }
        }
    }

    fn check_base_reference(&mut self, node: NodeId, member: &MemberRef, ctx: Context) -> ProducedType {
        let Some(decl) = member.decl else {
            if !ctx.dynamic {
                self.error(
                    node,
                    type_codes::UNRESOLVED_REFERENCE,
                    format!("function or value does not exist: {}", member.name),
                );
            }
            return ProducedType::Unknown;
        };
        self.check_member_reference(node, decl, member, MemberReceiver::default(), MemberOperator::Member)
    }

    fn check_qualified_reference(
        &mut self,
        node: NodeId,
        receiver: NodeId,
        operator: MemberOperator,
        member: &MemberRef,
        ctx: Context,
    ) -> ProducedType {
        let ty = self.check_expr(receiver, ctx);
        let Some(decl) = member.decl else {
            if !ctx.dynamic && !ty.is_unknown() {
                self.error(
                    node,
                    type_codes::UNRESOLVED_REFERENCE,
                    format!(
                        "member method or attribute does not exist: {} in type {}",
                        member.name,
                        self.name(&ty)
                    ),
                );
            }
            return ProducedType::Unknown;
        };
        let view = self.receiver_view(receiver, &ty, operator);
        if view.is_unknown() {
            return ProducedType::Unknown;
        }
        let receiver = self.member_receiver(&view, decl);
        self.check_member_reference(node, decl, member, receiver, operator)
    }

    /// Type of a reference that is not directly invoked
    fn check_member_reference(
        &mut self,
        node: NodeId,
        decl: DeclId,
        member: &MemberRef,
        receiver: MemberReceiver,
        operator: MemberOperator,
    ) -> ProducedType {
        let model = self.model;
        let name = self.decl_name(decl);
        if model.is_abstraction(decl) {
            self.error(
                node,
                type_codes::AMBIGUOUS_REFERENCE,
                format!("ambiguous reference to overloaded method or class: {name}"),
            );
            return ProducedType::Unknown;
        }
        self.analysis.set_target(node, decl);
        if matches!(
            model.decl(decl).kind,
            DeclKind::Interface(_) | DeclKind::TypeParameter(_) | DeclKind::Alias(_)
        ) {
            self.error(
                node,
                call_codes::NOT_INVOCABLE,
                format!("type cannot be instantiated: {name}"),
            );
            return ProducedType::Unknown;
        }
        let type_args = match &member.type_args {
            Some(explicit) => {
                if !self.check_type_arguments(node, decl, explicit, &receiver.map, false) {
                    return ProducedType::Unknown;
                }
                explicit.clone()
            }
            None if model.is_generic(decl) => {
                self.error(
                    node,
                    type_codes::WRONG_TYPE_ARGUMENT_COUNT,
                    format!("missing type arguments to: {name}"),
                );
                return ProducedType::Unknown;
            }
            None => Vec::new(),
        };
        if !type_args.is_empty() {
            self.analysis.set_type_arguments(node, type_args.clone());
        }
        let map = self.with_type_arguments(decl, &type_args, &receiver.map);
        let ty = self.reference_type(decl, &map, receiver.qualifying.as_ref());
        self.wrap_member(ty, operator)
    }

    /// The receiver type as seen by the member operator: `?.` strips
    /// `Null`, `*.` takes the element type
    pub(super) fn receiver_view(
        &mut self,
        receiver: NodeId,
        ty: &ProducedType,
        operator: MemberOperator,
    ) -> ProducedType {
        if ty.is_unknown() {
            return ProducedType::Unknown;
        }
        let model = self.model;
        match operator {
            MemberOperator::Member => ty.clone(),
            MemberOperator::Safe => {
                if !model.is_optional(ty) && !self.has_unchecked_nulls(receiver) {
                    self.error(
                        receiver,
                        narrow_codes::NOT_OPTIONAL,
                        format!("receiving type not of optional type: {} is not optional", self.name(ty)),
                    );
                }
                model.definite(ty)
            }
            MemberOperator::Spread => self
                .check_supertype(
                    receiver,
                    ty,
                    model.lang().iterable,
                    "receiver of spread member operator must be iterable",
                )
                .and_then(|st| st.arg(0).cloned())
                .unwrap_or(ProducedType::Unknown),
        }
    }

    /// The receiver's instantiation of the member's container
    pub(super) fn member_receiver(&self, view: &ProducedType, decl: DeclId) -> MemberReceiver {
        let model = self.model;
        let Some(container) = model.decl(decl).container else {
            return MemberReceiver::default();
        };
        if model.class_or_interface(container).is_none() {
            return MemberReceiver::default();
        }
        match model.supertype(view, container) {
            Some(st) => MemberReceiver {
                map: st
                    .as_applied()
                    .map(|applied| model.type_arg_map(applied))
                    .unwrap_or_default(),
                qualifying: Some(st),
            },
            None => MemberReceiver::default(),
        }
    }

    /// Result type of a member operator applied to the member's type
    pub(super) fn wrap_member(&self, ty: ProducedType, operator: MemberOperator) -> ProducedType {
        if ty.is_unknown() {
            return ty;
        }
        match operator {
            MemberOperator::Member => ty,
            MemberOperator::Safe => self.model.optional_type(ty),
            MemberOperator::Spread => self.model.sequential_type(ty),
        }
    }

    /// The type of a reference to `decl` instantiated by `map`: a value's
    /// type, a function's `Callable` type, or a class's instantiation
    /// function
    pub(super) fn reference_type(
        &self,
        decl: DeclId,
        map: &TypeArgMap,
        qualifying: Option<&ProducedType>,
    ) -> ProducedType {
        let model = self.model;
        match &model.decl(decl).kind {
            DeclKind::Value(_) => model.substitute(&self.value_type(decl), map),
            DeclKind::Function(function) => {
                let ret = model.substitute(&self.return_type(decl), map);
                function.parameter_lists.iter().rev().fold(ret, |acc, list| {
                    let params = model.substitute(&model.parameter_tuple(list), map);
                    model.callable_type(acc, params)
                })
            }
            DeclKind::Class(class) => {
                let instance = self.instance_type(decl, map, qualifying.cloned());
                match &class.parameters {
                    Some(list) => {
                        let params = model.substitute(&model.parameter_tuple(list), map);
                        model.callable_type(instance, params)
                    }
                    None => instance,
                }
            }
            DeclKind::Interface(_) | DeclKind::TypeParameter(_) | DeclKind::Alias(_) => {
                ProducedType::Unknown
            }
        }
    }

    /// The class type produced by instantiating `class`
    pub(super) fn instance_type(
        &self,
        class: DeclId,
        map: &TypeArgMap,
        qualifying: Option<ProducedType>,
    ) -> ProducedType {
        let model = self.model;
        let args = model
            .type_parameters(class)
            .iter()
            .map(|p| map.get(p).cloned().unwrap_or(ProducedType::Parameter(*p)))
            .collect();
        let ty = ProducedType::declared(class, args);
        let qualifying = qualifying.or_else(|| {
            model
                .decl(class)
                .container
                .filter(|outer| model.class_or_interface(*outer).is_some())
                .map(|outer| model.substitute(&model.declared_type(outer), map))
        });
        match qualifying {
            Some(outer) => ty.qualified_by(outer),
            None => ty,
        }
    }

    /// Type of a tuple literal or of the trailing arguments of an
    /// argument list, built from the last element backwards
    pub(super) fn tuple_literal_type(
        &self,
        args: &[Argument],
        require_sequential: bool,
    ) -> ProducedType {
        let model = self.model;
        let mut result = model.empty_type();
        let mut union = ProducedType::Nothing;
        for arg in args.iter().rev() {
            if arg.spread {
                let element = model.iterated_type(&arg.ty).unwrap_or(ProducedType::Unknown);
                union = model.union2(union, element);
                result = model.spread_type(&arg.ty, require_sequential);
            } else {
                let element = model.denotable(&arg.ty);
                union = model.union2(union, element.clone());
                result = ProducedType::declared(
                    model.lang().tuple,
                    vec![union.clone(), element, result],
                );
            }
        }
        result
    }
}
