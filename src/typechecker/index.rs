//! Index and range expressions
//!
//! `xs[i]` is typed through `Correspondence<Key, Item>` and yields `Item?`;
//! `xs[a..b]` through `Ranged<Index, Span>` and yields `Span`. Tuples are
//! refined statically when the index is an integer literal: `[a, b][1]` is
//! the type of `b`, not `A|B?`.

use super::*;

impl TypeChecker<'_> {
    pub(super) fn check_index(&mut self, primary: NodeId, index: IndexKind, ctx: Context) -> ProducedType {
        let model = self.model;
        let ty = self.check_expr(primary, ctx);
        match index {
            IndexKind::Element(element) => {
                let key = self.check_expr(element, ctx);
                if ty.is_unknown() {
                    return ProducedType::Unknown;
                }
                if let Some(refined) = self
                    .literal_index(element)
                    .and_then(|i| self.tuple_element_at(&ty, i))
                {
                    return refined;
                }
                let Some(st) = self.check_supertype(
                    primary,
                    &ty,
                    model.lang().correspondence,
                    "illegal receiving type for index expression",
                ) else {
                    return ProducedType::Unknown;
                };
                let (Some(key_type), Some(item)) = (st.arg(0), st.arg(1)) else {
                    return ProducedType::Unknown;
                };
                self.check_assignable(element, &key, key_type, "index must be assignable to key type");
                model.optional_type(item.clone())
            }
            IndexKind::Range { from, to } => {
                let lower = from.map(|n| (n, self.check_expr(n, ctx)));
                let upper = to.map(|n| (n, self.check_expr(n, ctx)));
                if ty.is_unknown() {
                    return ProducedType::Unknown;
                }
                let Some(st) = self.check_supertype(
                    primary,
                    &ty,
                    model.lang().ranged,
                    "illegal receiving type for index range expression",
                ) else {
                    return ProducedType::Unknown;
                };
                let (Some(index_type), Some(span)) = (st.arg(0), st.arg(1)) else {
                    return ProducedType::Unknown;
                };
                if let Some((node, lower)) = &lower {
                    self.check_assignable(*node, lower, index_type, "lower bound must be assignable to index type");
                }
                if let Some((node, upper)) = &upper {
                    self.check_assignable(*node, upper, index_type, "upper bound must be assignable to index type");
                }
                let span = span.clone();
                match (from, to) {
                    (Some(from), None) => match self
                        .literal_index(from)
                        .and_then(|i| self.tuple_rest_from(&ty, i))
                    {
                        Some(rest) => model.intersection2(rest, span),
                        None => span,
                    },
                    _ => span,
                }
            }
        }
    }

    /// The value of an integer literal index, possibly negated
    fn literal_index(&self, node: NodeId) -> Option<i64> {
        match self.ast.kind(node) {
            NodeKind::Literal(Literal::Integer(text)) => text.parse().ok(),
            NodeKind::Unary {
                op: UnaryOp::Negative,
                operand,
            } => match self.ast.kind(*operand) {
                NodeKind::Literal(Literal::Integer(text)) => text.parse::<i64>().ok().map(|v| -v),
                _ => None,
            },
            _ => None,
        }
    }

    /// Element types of a sequential type, when none is unknown
    fn known_tuple_elements(&self, ty: &ProducedType) -> Option<Vec<ProducedType>> {
        let model = self.model;
        if !model.is_sequential(ty) {
            return None;
        }
        let elements = model.tuple_element_types(ty);
        (!elements.iter().any(ProducedType::contains_unknown)).then_some(elements)
    }

    /// The type of element `index` of a tuple type
    fn tuple_element_at(&self, ty: &ProducedType, index: i64) -> Option<ProducedType> {
        let model = self.model;
        let elements = self.known_tuple_elements(ty)?;
        let Ok(index) = usize::try_from(index) else {
            return Some(model.null_type());
        };
        let variadic = model.is_tuple_length_unbounded(ty);
        let minimum = model.tuple_minimum_length(ty);
        let fixed = if variadic {
            elements.len().saturating_sub(1)
        } else {
            elements.len()
        };
        if index < fixed {
            let element = elements[index].clone();
            return Some(if index >= minimum {
                model.optional_type(element)
            } else {
                element
            });
        }
        if !variadic {
            return Some(model.null_type());
        }
        let tail = elements
            .get(fixed)
            .and_then(|last| model.iterated_type(last))
            .unwrap_or(ProducedType::Unknown);
        let required = model.is_tuple_variant_at_least_one(ty) && index == fixed;
        Some(if required {
            tail
        } else {
            model.optional_type(tail)
        })
    }

    /// The tuple type of the elements from `index` on, for `xs[index...]`
    fn tuple_rest_from(&self, ty: &ProducedType, index: i64) -> Option<ProducedType> {
        let model = self.model;
        let elements = self.known_tuple_elements(ty)?;
        let index = usize::try_from(index).ok()?;
        let variadic = model.is_tuple_length_unbounded(ty);
        if index >= elements.len() || (variadic && index == elements.len() - 1) {
            return None;
        }
        let mut rest: Vec<ProducedType> = elements[index..].to_vec();
        if variadic {
            if let Some(last) = rest.last_mut() {
                *last = model.iterated_type(last).unwrap_or(ProducedType::Unknown);
            }
        }
        let minimum = model.tuple_minimum_length(ty).saturating_sub(index);
        let first_defaulted = (minimum < rest.len()).then_some(minimum);
        let at_least_one = model.is_tuple_variant_at_least_one(ty);
        Some(model.tuple_type(&rest, variadic, at_least_one, first_defaulted))
    }
}
