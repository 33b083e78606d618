//! Invocation checking and argument matching
//!
//! A direct invocation names its target: a function, a class or a member
//! of either, possibly overloaded. Its parameter list comes from the
//! declaration and is instantiated with the receiver's and the invocation's
//! type arguments. Anything else invoked (a value of function type, a
//! parenthesized expression) is an indirect invocation: its parameter list
//! is decoded from the `Callable` supertype of the primary.

use super::*;
use crate::model::ParameterList;

/// A positional argument after checking
#[derive(Debug, Clone)]
pub(super) struct Argument {
    pub(super) node: NodeId,
    pub(super) ty: ProducedType,
    /// `*expr`
    pub(super) spread: bool,
}

#[derive(Debug, Clone)]
pub(super) struct NamedArgument {
    pub(super) name: Option<String>,
    pub(super) node: NodeId,
    pub(super) ty: ProducedType,
}

/// An argument list after checking every argument expression
#[derive(Debug, Clone)]
pub(super) enum CheckedArguments {
    Positional(Vec<Argument>),
    Named {
        named: Vec<NamedArgument>,
        sequenced: Option<Vec<Argument>>,
    },
}

impl CheckedArguments {
    fn is_named(&self) -> bool {
        matches!(self, CheckedArguments::Named { .. })
    }
}

/// One parameter as seen by a particular invocation: its type is already
/// instantiated for the receiver (and, after inference, for the
/// invocation's own type arguments)
#[derive(Debug, Clone)]
pub(super) struct ParamSlot {
    /// `None` for the positions of an indirect invocation
    pub(super) name: Option<String>,
    pub(super) decl: Option<DeclId>,
    pub(super) ty: ProducedType,
    pub(super) defaulted: bool,
    pub(super) sequenced: bool,
}

impl ParamSlot {
    fn label(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| index.to_string())
    }
}

/// Who is being invoked, for diagnostics
#[derive(Debug, Clone, Copy)]
enum Callee<'n> {
    Direct(&'n str),
    Indirect,
}

/// The receiver of a member reference, seen as the member's container
#[derive(Debug, Clone, Default)]
pub(super) struct MemberReceiver {
    /// Type arguments of the container, as instantiated by the receiver
    pub(super) map: TypeArgMap,
    /// The container supertype of the receiver
    pub(super) qualifying: Option<ProducedType>,
}

impl TypeChecker<'_> {
    #[instrument(level = "debug", skip(self, arguments, ctx))]
    pub(super) fn check_invocation(
        &mut self,
        node: NodeId,
        primary: NodeId,
        arguments: &Arguments,
        ctx: Context,
    ) -> ProducedType {
        // arguments first: overload resolution and inference need their types
        let args = self.check_arguments(arguments, ctx);
        let ast = self.ast;
        let (member, receiver, operator) = match ast.kind(primary) {
            NodeKind::BaseMember(member) | NodeKind::BaseType(member) => {
                (member, None, MemberOperator::Member)
            }
            NodeKind::QualifiedMember {
                receiver,
                operator,
                member,
            } => (member, Some(*receiver), *operator),
            _ => return self.check_indirect_invocation(node, primary, &args, ctx),
        };
        let Some(decl) = member.decl else {
            self.check_expr(primary, ctx);
            return ProducedType::Unknown;
        };
        let model = self.model;
        if model.function(decl).is_none() && model.class_or_interface(decl).is_none() {
            return self.check_indirect_invocation(node, primary, &args, ctx);
        }
        self.check_direct_invocation(node, primary, member, decl, receiver, operator, &args, ctx)
    }

    fn check_arguments(&mut self, arguments: &Arguments, ctx: Context) -> CheckedArguments {
        match arguments {
            Arguments::Positional(args) => {
                CheckedArguments::Positional(self.check_positional_args(args, ctx))
            }
            Arguments::Named(list) => {
                let named = list
                    .named
                    .iter()
                    .map(|arg| NamedArgument {
                        name: arg.name.clone(),
                        node: arg.value,
                        ty: self.check_expr(arg.value, ctx),
                    })
                    .collect();
                let sequenced = list
                    .sequenced
                    .as_ref()
                    .map(|args| self.check_positional_args(args, ctx));
                CheckedArguments::Named { named, sequenced }
            }
        }
    }

    /// Check the expressions of a positional list; spread arguments must
    /// be iterable
    pub(super) fn check_positional_args(
        &mut self,
        args: &[PositionalArg],
        ctx: Context,
    ) -> Vec<Argument> {
        let iterable = self.model.lang().iterable;
        args.iter()
            .map(|arg| match *arg {
                PositionalArg::Listed(node) => Argument {
                    node,
                    ty: self.check_expr(node, ctx),
                    spread: false,
                },
                PositionalArg::Spread(node) => {
                    let ty = self.check_expr(node, ctx);
                    self.check_supertype(node, &ty, iterable, "spread argument is not iterable");
                    Argument {
                        node,
                        ty,
                        spread: true,
                    }
                }
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn check_direct_invocation(
        &mut self,
        node: NodeId,
        primary: NodeId,
        member: &MemberRef,
        decl: DeclId,
        receiver: Option<NodeId>,
        operator: MemberOperator,
        args: &CheckedArguments,
        ctx: Context,
    ) -> ProducedType {
        let model = self.model;
        let view = match receiver {
            Some(receiver) => {
                let ty = self.check_expr(receiver, ctx);
                let view = self.receiver_view(receiver, &ty, operator);
                if view.is_unknown() {
                    self.analysis.set_type(primary, ProducedType::Unknown);
                    return ProducedType::Unknown;
                }
                Some(view)
            }
            None => None,
        };

        let Some(target) = self.resolve_overloads(node, primary, decl, args) else {
            self.analysis.set_type(primary, ProducedType::Unknown);
            return ProducedType::Unknown;
        };
        self.analysis.set_target(primary, target);
        let name = self.decl_name(target);

        if model.is_class(target) && model.is_abstract(target) {
            self.error(
                node,
                call_codes::ABSTRACT_INSTANTIATION,
                format!("abstract class may not be instantiated: {name}"),
            );
        }
        if !model.is_functional(target) {
            let message = if model.class_or_interface(target).is_some() {
                format!("type cannot be instantiated: {name}")
            } else {
                format!("member cannot be invoked: {name}")
            };
            self.error(node, call_codes::NOT_INVOCABLE, message);
            self.analysis.set_type(primary, ProducedType::Unknown);
            return ProducedType::Unknown;
        }

        let receiver = view
            .as_ref()
            .map(|v| self.member_receiver(v, target))
            .unwrap_or_default();
        let empty = ParameterList::default();
        let list = model.parameter_lists(target).first().unwrap_or(&empty);
        let mut slots = self.parameter_slots(list, &receiver.map);

        let type_args = match &member.type_args {
            Some(explicit) => {
                if !self.check_type_arguments(primary, target, explicit, &receiver.map, false) {
                    self.analysis.set_type(primary, ProducedType::Unknown);
                    return ProducedType::Unknown;
                }
                explicit.clone()
            }
            None if model.is_generic(target) => {
                let inferred = self.infer_type_arguments(target, &slots, args);
                self.check_type_arguments(node, target, &inferred, &receiver.map, true);
                inferred
            }
            None => Vec::new(),
        };
        if model.is_generic(target) {
            self.analysis.set_type_arguments(node, type_args.clone());
        }

        let map = self.with_type_arguments(target, &type_args, &receiver.map);
        for slot in &mut slots {
            slot.ty = model.substitute(&slot.ty, &map);
        }
        let reference = self.reference_type(target, &map, receiver.qualifying.as_ref());
        let reference = self.wrap_member(reference, operator);
        self.analysis.set_type(primary, reference);

        self.match_arguments(node, &slots, args, Callee::Direct(name), ctx.dynamic);

        let result = if model.class_or_interface(target).is_some() {
            self.instance_type(target, &map, receiver.qualifying)
        } else {
            let ret = model.substitute(&self.return_type(target), &map);
            model
                .parameter_lists(target)
                .iter()
                .skip(1)
                .rev()
                .fold(ret, |acc, list| {
                    let params = model.substitute(&model.parameter_tuple(list), &map);
                    model.callable_type(acc, params)
                })
        };
        self.wrap_member(result, operator)
    }

    /// Pick one declaration of an overloaded name. `None` after an error.
    fn resolve_overloads(
        &mut self,
        node: NodeId,
        primary: NodeId,
        decl: DeclId,
        args: &CheckedArguments,
    ) -> Option<DeclId> {
        let model = self.model;
        if !model.is_abstraction(decl) {
            return Some(decl);
        }
        let name = self.decl_name(decl);
        let CheckedArguments::Positional(list) = args else {
            self.error(
                node,
                call_codes::NAMED_ARGUMENTS_UNSUPPORTED,
                format!("overloaded declarations may not be called using named arguments: {name}"),
            );
            return None;
        };
        if list.iter().any(|a| a.ty.contains_unknown()) {
            return None;
        }
        let types: Vec<ProducedType> = list.iter().map(|a| a.ty.clone()).collect();
        let overloads = model.function(decl).map(|f| f.overloads.as_slice()).unwrap_or(&[]);
        match self.resolver.resolve(model, overloads, &types) {
            Some(chosen) => {
                debug!(name, overload = chosen.0, "resolved overload");
                Some(chosen)
            }
            None => {
                self.error(
                    primary,
                    type_codes::AMBIGUOUS_REFERENCE,
                    format!("ambiguous reference to overloaded method or class: {name}"),
                );
                None
            }
        }
    }

    fn check_indirect_invocation(
        &mut self,
        node: NodeId,
        primary: NodeId,
        args: &CheckedArguments,
        ctx: Context,
    ) -> ProducedType {
        let model = self.model;
        let ty = self.check_expr(primary, ctx);
        if args.is_named() {
            self.error(
                node,
                call_codes::NAMED_ARGUMENTS_UNSUPPORTED,
                "named arguments not supported for indirect invocations",
            );
            return ProducedType::Unknown;
        }
        if ty.is_unknown() {
            return ProducedType::Unknown;
        }
        let Some(callable) = model.supertype(&ty, model.lang().callable) else {
            self.error(
                primary,
                call_codes::NOT_INVOCABLE,
                format!(
                    "invoked expression must be callable: {} is not a subtype of Callable",
                    self.name(&ty)
                ),
            );
            return ProducedType::Unknown;
        };
        let ret = callable.arg(0).cloned().unwrap_or(ProducedType::Unknown);
        let Some(tuple) = callable.arg(1) else {
            return ret;
        };
        let elements = model.tuple_element_types(tuple);
        let unbounded = model.is_tuple_length_unbounded(tuple);
        let minimum = model.tuple_minimum_length(tuple);
        let last = elements.len().saturating_sub(1);
        let slots: Vec<ParamSlot> = elements
            .into_iter()
            .enumerate()
            .map(|(i, ty)| {
                let sequenced = unbounded && i == last;
                ParamSlot {
                    name: None,
                    decl: None,
                    ty,
                    defaulted: !sequenced && i >= minimum,
                    sequenced,
                }
            })
            .collect();
        self.match_arguments(node, &slots, args, Callee::Indirect, ctx.dynamic);
        ret
    }

    /// Parameters of `list`, with types instantiated by `map`
    fn parameter_slots(&self, list: &ParameterList, map: &TypeArgMap) -> Vec<ParamSlot> {
        list.parameters
            .iter()
            .map(|p| ParamSlot {
                name: Some(p.name.clone()),
                decl: Some(p.decl),
                ty: self.model.substitute(&self.value_type(p.decl), map),
                defaulted: p.defaulted,
                sequenced: p.sequenced,
            })
            .collect()
    }

    /// Tuple type of the remaining parameters, as expected by a spread
    /// argument
    pub(super) fn parameter_tuple(&self, slots: &[ParamSlot]) -> ProducedType {
        let model = self.model;
        let elements: Vec<ProducedType> = slots
            .iter()
            .map(|s| {
                if s.sequenced {
                    model.iterated_type(&s.ty).unwrap_or(ProducedType::Unknown)
                } else {
                    s.ty.clone()
                }
            })
            .collect();
        let variadic = slots.last().is_some_and(|s| s.sequenced);
        let first_defaulted = slots.iter().position(|s| s.defaulted);
        model.tuple_type(&elements, variadic, false, first_defaulted)
    }

    /// The parameter a named (or anonymous) argument fills
    pub(super) fn matching_parameter(
        &self,
        slots: &[ParamSlot],
        name: Option<&str>,
        matched: &[usize],
    ) -> Option<usize> {
        match name {
            Some(name) => slots
                .iter()
                .position(|s| s.name.as_deref() == Some(name))
                .filter(|i| !matched.contains(i)),
            None => (0..slots.len()).find(|i| !matched.contains(i)),
        }
    }

    /// The first unfilled parameter that can take the trailing iterable
    /// arguments of a named argument list
    pub(super) fn unspecified_iterable(&self, slots: &[ParamSlot], matched: &[usize]) -> Option<usize> {
        let iterable = self.model.lang().iterable;
        slots.iter().enumerate().position(|(i, s)| {
            !matched.contains(&i)
                && (s.sequenced || self.model.unalias(&s.ty).declaration() == Some(iterable))
        })
    }

    fn bind(&mut self, invocation: NodeId, argument: NodeId, slot: Option<&ParamSlot>) {
        self.analysis.bind(
            invocation,
            ParameterBinding {
                argument,
                parameter: slot.and_then(|s| s.decl),
            },
        );
    }

    fn match_arguments(
        &mut self,
        node: NodeId,
        slots: &[ParamSlot],
        args: &CheckedArguments,
        callee: Callee<'_>,
        dynamic: bool,
    ) {
        match (args, callee) {
            (CheckedArguments::Positional(list), _) => {
                self.match_positional(node, slots, list, callee, dynamic)
            }
            (CheckedArguments::Named { named, sequenced }, Callee::Direct(name)) => {
                self.match_named(node, slots, named, sequenced.as_deref(), name)
            }
            // rejected before matching
            (CheckedArguments::Named { .. }, Callee::Indirect) => {}
        }
    }

    fn match_positional(
        &mut self,
        node: NodeId,
        slots: &[ParamSlot],
        args: &[Argument],
        callee: Callee<'_>,
        dynamic: bool,
    ) {
        let model = self.model;
        for (i, slot) in slots.iter().enumerate() {
            let Some(arg) = args.get(i) else {
                if !slot.defaulted && !slot.sequenced {
                    let message = match callee {
                        Callee::Direct(f) => format!(
                            "missing argument to required parameter {} of {f}",
                            slot.label(i)
                        ),
                        Callee::Indirect => format!("missing argument for required parameter {i}"),
                    };
                    self.error(node, call_codes::MISSING_ARGUMENT, message);
                }
                continue;
            };
            if let Callee::Direct(f) = callee {
                if slot.ty.is_unknown() && !dynamic {
                    self.error(
                        arg.node,
                        type_codes::CANNOT_INFER_TYPE,
                        format!("parameter type could not be determined: {} of {f}", slot.label(i)),
                    );
                }
            }

            if arg.spread {
                let spread = model.spread_type(&arg.ty, true);
                let rest = self.parameter_tuple(&slots[i..]);
                self.bind(node, arg.node, Some(slot));
                self.check_assignable_with(
                    arg.node,
                    &spread,
                    &rest,
                    call_codes::ARGUMENT_MISMATCH,
                    "spread argument not assignable to parameter types",
                );
                return;
            }

            if slot.sequenced {
                let element = model.iterated_type(&slot.ty).unwrap_or(ProducedType::Unknown);
                for arg in &args[i..] {
                    self.bind(node, arg.node, Some(slot));
                    let (actual, expected, message) = if arg.spread {
                        let message = match callee {
                            Callee::Direct(f) => format!(
                                "spread argument must be assignable to sequenced parameter {} of {f}",
                                slot.label(i)
                            ),
                            Callee::Indirect => "spread argument must be assignable to parameter type".to_string(),
                        };
                        (model.spread_type(&arg.ty, true), slot.ty.clone(), message)
                    } else {
                        let message = match callee {
                            Callee::Direct(f) => format!(
                                "argument must be assignable to sequenced parameter {} of {f}",
                                slot.label(i)
                            ),
                            Callee::Indirect => "argument must be assignable to parameter type".to_string(),
                        };
                        (arg.ty.clone(), element.clone(), message)
                    };
                    self.check_assignable_with(
                        arg.node,
                        &actual,
                        &expected,
                        call_codes::ARGUMENT_MISMATCH,
                        &message,
                    );
                }
                return;
            }

            self.bind(node, arg.node, Some(slot));
            let message = match callee {
                Callee::Direct(f) => {
                    format!("argument must be assignable to parameter {} of {f}", slot.label(i))
                }
                Callee::Indirect => "argument must be assignable to parameter type".to_string(),
            };
            self.check_assignable_with(
                arg.node,
                &arg.ty,
                &slot.ty,
                call_codes::ARGUMENT_MISMATCH,
                &message,
            );
        }

        for arg in args.iter().skip(slots.len()) {
            let message = match callee {
                Callee::Direct(f) => format!(
                    "no matching parameter declared by {f}: {f} has {} parameters",
                    slots.len()
                ),
                Callee::Indirect => format!(
                    "no matching parameter: function reference has {} parameters",
                    slots.len()
                ),
            };
            self.error(arg.node, call_codes::EXTRA_ARGUMENT, message);
        }
    }

    fn match_named(
        &mut self,
        node: NodeId,
        slots: &[ParamSlot],
        named: &[NamedArgument],
        sequenced: Option<&[Argument]>,
        f: &str,
    ) {
        let mut matched: Vec<usize> = Vec::new();
        for arg in named {
            let index = match &arg.name {
                Some(name) => {
                    let Some(index) = slots.iter().position(|s| s.name.as_deref() == Some(name))
                    else {
                        self.error(
                            arg.node,
                            call_codes::NO_MATCHING_PARAMETER,
                            format!("no matching parameter for named argument {name} declared by {f}"),
                        );
                        continue;
                    };
                    if matched.contains(&index) {
                        self.error(
                            arg.node,
                            call_codes::DUPLICATE_ARGUMENT,
                            format!("duplicate argument for parameter: {name} of {f}"),
                        );
                        continue;
                    }
                    index
                }
                None => {
                    let Some(index) = self.matching_parameter(slots, None, &matched) else {
                        self.error(
                            arg.node,
                            call_codes::NO_MATCHING_PARAMETER,
                            format!(
                                "all parameters specified by named argument list: {f} does not declare any additional parameters"
                            ),
                        );
                        continue;
                    };
                    index
                }
            };
            matched.push(index);
            let slot = &slots[index];
            self.bind(node, arg.node, Some(slot));
            let message = format!(
                "named argument must be assignable to parameter {} of {f}",
                slot.label(index)
            );
            self.check_assignable_with(
                arg.node,
                &arg.ty,
                &slot.ty,
                call_codes::ARGUMENT_MISMATCH,
                &message,
            );
        }

        let iterable = self.unspecified_iterable(slots, &matched);
        match (sequenced, iterable) {
            (Some(args), Some(index)) => {
                matched.push(index);
                let slot = &slots[index];
                for arg in args {
                    self.bind(node, arg.node, Some(slot));
                }
                let literal = self.tuple_literal_type(args, false);
                let at = args.first().map(|a| a.node).unwrap_or(node);
                let message = format!(
                    "iterable arguments must be assignable to iterable parameter {} of {f}",
                    slot.label(index)
                );
                self.check_assignable_with(
                    at,
                    &literal,
                    &slot.ty,
                    call_codes::ARGUMENT_MISMATCH,
                    &message,
                );
            }
            (Some(_), None) => {
                self.error(
                    node,
                    call_codes::NO_MATCHING_PARAMETER,
                    format!(
                        "all iterable parameters specified by named argument list: {f} does not declare any additional parameters of type Iterable"
                    ),
                );
            }
            // an omitted iterable argument is empty
            (None, Some(index)) => matched.push(index),
            (None, None) => {}
        }

        for (i, slot) in slots.iter().enumerate() {
            if !matched.contains(&i) && !slot.defaulted && !slot.sequenced {
                self.error(
                    node,
                    call_codes::MISSING_ARGUMENT,
                    format!("missing named argument to parameter {} of {f}", slot.label(i)),
                );
            }
        }
    }
}
