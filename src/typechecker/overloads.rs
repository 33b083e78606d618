//! Overload resolution
//!
//! An overloaded name binds to an abstraction whose `overloads` list the
//! candidate declarations. The checker asks an [`OverloadResolver`] to
//! pick one from the argument types; when it cannot, the reference is
//! ambiguous.

use crate::model::{DeclId, ProducedType, TypeModel};
use tracing::debug;

/// Chooses one overload for a positional argument list
pub trait OverloadResolver {
    /// The overload accepting `arguments`, if exactly one is selected
    fn resolve(
        &self,
        model: &TypeModel,
        overloads: &[DeclId],
        arguments: &[ProducedType],
    ) -> Option<DeclId>;
}

/// Keeps the overloads whose first parameter list accepts the arguments
/// by count and by assignability, then prefers the most specific one
#[derive(Debug, Clone, Copy, Default)]
pub struct ArityResolver;

impl ArityResolver {
    fn accepts(model: &TypeModel, decl: DeclId, arguments: &[ProducedType]) -> bool {
        let Some(list) = model.parameter_lists(decl).first() else {
            return false;
        };
        let required = list
            .parameters
            .iter()
            .filter(|p| !p.defaulted && !p.sequenced)
            .count();
        if arguments.len() < required {
            return false;
        }
        if arguments.len() > list.len() && !list.has_sequenced() {
            return false;
        }
        arguments.iter().enumerate().all(|(i, arg)| {
            let param = &list.parameters[i.min(list.len() - 1)];
            let ty = model.parameter_type(param);
            let expected = if param.sequenced {
                model.iterated_type(&ty).unwrap_or(ty)
            } else {
                ty
            };
            // generic overloads accept anything in positions mentioning
            // their own type parameters
            expected.mentions_any(model.type_parameters(decl))
                || model.is_subtype_of(arg, &expected)
        })
    }

    /// `a` is at least as specific as `b`: each parameter of `a` is
    /// assignable to the corresponding parameter of `b`
    fn more_specific(model: &TypeModel, a: DeclId, b: DeclId) -> bool {
        let (Some(la), Some(lb)) = (
            model.parameter_lists(a).first(),
            model.parameter_lists(b).first(),
        ) else {
            return false;
        };
        la.len() == lb.len()
            && la.parameters.iter().zip(&lb.parameters).all(|(pa, pb)| {
                model.is_subtype_of(&model.parameter_type(pa), &model.parameter_type(pb))
            })
    }
}

impl OverloadResolver for ArityResolver {
    fn resolve(
        &self,
        model: &TypeModel,
        overloads: &[DeclId],
        arguments: &[ProducedType],
    ) -> Option<DeclId> {
        let candidates: Vec<DeclId> = overloads
            .iter()
            .copied()
            .filter(|o| Self::accepts(model, *o, arguments))
            .collect();
        debug!(
            candidates = candidates.len(),
            overloads = overloads.len(),
            "filtered overloads"
        );
        match candidates.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => {
                let best: Vec<DeclId> = candidates
                    .iter()
                    .copied()
                    .filter(|c| {
                        candidates
                            .iter()
                            .all(|o| o == c || Self::more_specific(model, *c, *o))
                    })
                    .collect();
                match best.as_slice() {
                    [only] => Some(*only),
                    _ => None,
                }
            }
        }
    }
}
