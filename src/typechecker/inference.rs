//! Type argument inference
//!
//! Each type parameter of a generic invocation target is inferred on its
//! own: every (parameter type, argument type) pair contributes a candidate,
//! candidates are joined (or met, for contravariant parameters), and the
//! result is narrowed by the parameter's upper bounds.

use super::invocation::{Argument, CheckedArguments, ParamSlot};
use super::*;

impl TypeChecker<'_> {
    /// Infer every type parameter of `generic` from the arguments of one
    /// invocation
    pub(super) fn infer_type_arguments(
        &self,
        generic: DeclId,
        params: &[ParamSlot],
        args: &CheckedArguments,
    ) -> Vec<ProducedType> {
        let model = self.model;
        model
            .type_parameters(generic)
            .iter()
            .map(|&tp| {
                let candidates = self.candidates(tp, params, args);
                let inferred = self.form(tp, candidates);
                let constrained = self.constrain_inferred(generic, tp, inferred);
                debug!(
                    parameter = model.name(tp),
                    inferred = %model.type_name(&constrained),
                    "inferred type argument"
                );
                constrained
            })
            .collect()
    }

    fn candidates(
        &self,
        tp: DeclId,
        params: &[ParamSlot],
        args: &CheckedArguments,
    ) -> Vec<ProducedType> {
        let mut found = Vec::new();
        match args {
            CheckedArguments::Positional(args) => {
                for (i, param) in params.iter().enumerate() {
                    let Some(arg) = args.get(i) else { break };
                    if arg.spread {
                        let spread = self.model.spread_type(&arg.ty, true);
                        let rest = self.parameter_tuple(&params[i..]);
                        found.extend(self.infer_type_arg(tp, &rest, &spread, &mut Vec::new()));
                        break;
                    }
                    if param.sequenced {
                        self.sequenced_candidates(tp, param, &args[i..], &mut found);
                        break;
                    }
                    found.extend(self.infer_type_arg(tp, &param.ty, &arg.ty, &mut Vec::new()));
                }
            }
            CheckedArguments::Named { named, sequenced } => {
                let mut matched = Vec::new();
                for arg in named {
                    if let Some(index) = self.matching_parameter(params, arg.name.as_deref(), &matched) {
                        matched.push(index);
                        let param = &params[index];
                        found.extend(self.infer_type_arg(tp, &param.ty, &arg.ty, &mut Vec::new()));
                    }
                }
                if let Some(sequenced) = sequenced {
                    if let Some(index) = self.unspecified_iterable(params, &matched) {
                        let literal = self.tuple_literal_type(sequenced, false);
                        found.extend(self.infer_type_arg(
                            tp,
                            &params[index].ty,
                            &literal,
                            &mut Vec::new(),
                        ));
                    }
                }
            }
        }
        found
    }

    fn sequenced_candidates(
        &self,
        tp: DeclId,
        param: &ParamSlot,
        args: &[Argument],
        found: &mut Vec<ProducedType>,
    ) {
        let element = self
            .model
            .iterated_type(&param.ty)
            .unwrap_or(ProducedType::Unknown);
        for arg in args {
            let contribution = if arg.spread {
                let spread = self.model.spread_type(&arg.ty, true);
                self.infer_type_arg(tp, &param.ty, &spread, &mut Vec::new())
            } else {
                self.infer_type_arg(tp, &element, &arg.ty, &mut Vec::new())
            };
            found.extend(contribution);
        }
    }

    /// The candidate that the pair (`param`, `arg`) contributes for `tp`
    pub(super) fn infer_type_arg(
        &self,
        tp: DeclId,
        param: &ProducedType,
        arg: &ProducedType,
        visited: &mut Vec<DeclId>,
    ) -> Option<ProducedType> {
        let model = self.model;
        let param = model.unalias(param);
        match param.as_ref() {
            ProducedType::Parameter(p) if *p == tp => Some(model.denotable(arg)),
            ProducedType::Parameter(other) => {
                if visited.contains(other) {
                    return None;
                }
                visited.push(*other);
                let mut list = Vec::new();
                for bound in model.satisfied_types(*other) {
                    list.extend(self.infer_type_arg(tp, bound, arg, visited));
                    let Some(bound_decl) = bound.declaration() else {
                        continue;
                    };
                    if let Some(st) = model.supertype(arg, bound_decl) {
                        for (bp, sa) in bound.args().iter().zip(st.args()) {
                            list.extend(self.infer_type_arg(tp, bp, sa, visited));
                        }
                    }
                }
                self.combine(tp, list)
            }
            ProducedType::Union(cases) => {
                // more than one case mentioning a type parameter would make
                // the split ambiguous
                let parameters = cases.iter().filter(|c| c.mentions_type_parameter()).count();
                if parameters > 1 {
                    return None;
                }
                let list: Vec<ProducedType> = cases
                    .iter()
                    .filter_map(|c| self.infer_type_arg(tp, c, arg, visited))
                    .collect();
                (!list.is_empty()).then(|| model.intersection(list))
            }
            ProducedType::Intersection(types) => {
                let list = types
                    .iter()
                    .filter_map(|t| self.infer_type_arg(tp, t, arg, visited))
                    .collect();
                self.combine(tp, list)
            }
            ProducedType::Nothing | ProducedType::Unknown => None,
            ProducedType::Declared(applied) => {
                let resolved = model.unalias(arg);
                match resolved.as_ref() {
                    ProducedType::Union(cases) => {
                        let list: Vec<ProducedType> = cases
                            .iter()
                            .filter_map(|c| self.infer_type_arg(tp, &param, c, visited))
                            .collect();
                        (!list.is_empty()).then(|| model.union(list))
                    }
                    ProducedType::Intersection(types) => {
                        let list: Vec<ProducedType> = types
                            .iter()
                            .filter_map(|t| self.infer_type_arg(tp, &param, t, visited))
                            .collect();
                        (!list.is_empty()).then(|| model.intersection(list))
                    }
                    _ => {
                        let st = model.supertype(arg, applied.decl)?;
                        let mut list = Vec::new();
                        if let (Some(pq), Some(sq)) = (applied.qualifying.as_deref(), st.qualifying()) {
                            list.extend(self.infer_type_arg(tp, pq, sq, visited));
                        }
                        for (pa, sa) in applied.args.iter().zip(st.args()) {
                            list.extend(self.infer_type_arg(tp, pa, sa, visited));
                        }
                        self.combine(tp, list)
                    }
                }
            }
        }
    }

    /// Union of candidates, or intersection for a contravariant parameter;
    /// `None` when there are none
    fn combine(&self, tp: DeclId, list: Vec<ProducedType>) -> Option<ProducedType> {
        (!list.is_empty()).then(|| self.form(tp, list))
    }

    fn form(&self, tp: DeclId, list: Vec<ProducedType>) -> ProducedType {
        if self.model.is_contravariant(tp) {
            self.model.intersection(list)
        } else {
            self.model.union(list)
        }
    }

    /// Narrow an inferred argument by the parameter's upper bounds. Bounds
    /// mentioning the generic declaration's own type parameters are skipped.
    pub(super) fn constrain_inferred(
        &self,
        generic: DeclId,
        tp: DeclId,
        inferred: ProducedType,
    ) -> ProducedType {
        let model = self.model;
        let own = model.type_parameters(generic);
        let bounds = model
            .satisfied_types(tp)
            .iter()
            .filter(|b| !b.mentions_any(own))
            .cloned();
        model.intersection(std::iter::once(inferred).chain(bounds))
    }
}
