//! Tuple encoding of parameter lists and sequence literals
//!
//! `[A, B=, C*]` is encoded as
//! `Tuple<A|B|C, A, Tuple<B|C, B, C[]>|Empty>`: each position a nested
//! `Tuple`, defaulted positions unioned with `Empty`, and a variadic tail
//! as `Sequential<C>` (or `Sequence<C>` when at least one is required).

use super::{ProducedType, TypeModel};

impl TypeModel {
    /// Encode element types as a tuple type
    pub fn tuple_type(
        &self,
        elements: &[ProducedType],
        variadic: bool,
        at_least_one: bool,
        first_defaulted: Option<usize>,
    ) -> ProducedType {
        let mut result = self.empty_type();
        let mut union = ProducedType::Nothing;
        let Some(last) = elements.len().checked_sub(1) else {
            return result;
        };
        for (i, element) in elements.iter().enumerate().rev() {
            union = self.union2(union, element.clone());
            if variadic && i == last {
                result = if at_least_one {
                    self.sequence_type(element.clone())
                } else {
                    self.sequential_type(element.clone())
                };
            } else {
                result = ProducedType::declared(
                    self.lang().tuple,
                    vec![union.clone(), element.clone(), result],
                );
                if first_defaulted.is_some_and(|fd| i >= fd) {
                    result = self.union2(result, self.empty_type());
                }
            }
        }
        result
    }

    /// The `Tuple` supertype of the nonempty part of `ty`
    fn tuple_supertype(&self, ty: &ProducedType) -> Option<ProducedType> {
        let nonempty = if self.is_possibly_empty(ty) {
            self.nonempty(ty)
        } else {
            ty.clone()
        };
        self.supertype(&nonempty, self.lang().tuple)
            .filter(|st| st.args().len() >= 3)
    }

    /// Positional element types; a variadic tail contributes its sequential
    /// type as the last element
    pub fn tuple_element_types(&self, ty: &ProducedType) -> Vec<ProducedType> {
        let mut elements = Vec::new();
        let mut current = ty.clone();
        loop {
            if let Some(tuple) = self.tuple_supertype(&current) {
                let args = tuple.args();
                elements.push(args[1].clone());
                current = args[2].clone();
            } else if self.supertype(&current, self.lang().empty).is_some() {
                return elements;
            } else if self.is_sequential(&current) {
                elements.push(current);
                return elements;
            } else {
                elements.push(ProducedType::Unknown);
                return elements;
            }
        }
    }

    /// The tuple ends in a variadic tail
    pub fn is_tuple_length_unbounded(&self, ty: &ProducedType) -> bool {
        let tail = self.tuple_tail(ty);
        self.supertype(&tail, self.lang().empty).is_none() && self.is_sequential(&tail)
    }

    /// The tuple's variadic tail requires at least one element
    pub fn is_tuple_variant_at_least_one(&self, ty: &ProducedType) -> bool {
        let tail = self.tuple_tail(ty);
        self.supertype(&tail, self.lang().empty).is_none()
            && self.supertype(&tail, self.lang().sequence).is_some()
    }

    /// Number of leading positions that are not defaulted
    pub fn tuple_minimum_length(&self, ty: &ProducedType) -> usize {
        let mut length = 0;
        let mut current = ty.clone();
        loop {
            if self.is_possibly_empty(&current) {
                return length;
            }
            match self.supertype(&current, self.lang().tuple) {
                Some(tuple) if tuple.args().len() >= 3 => {
                    length += 1;
                    current = tuple.args()[2].clone();
                }
                _ => return length,
            }
        }
    }

    /// Follow `Rest` arguments to the end of the tuple
    fn tuple_tail(&self, ty: &ProducedType) -> ProducedType {
        let mut current = ty.clone();
        while let Some(tuple) = self.tuple_supertype(&current) {
            current = tuple.args()[2].clone();
        }
        current
    }

    /// Tuple-shaped view of an iterable value's type, as seen by a spread
    /// argument `*xs`
    pub fn spread_type(&self, ty: &ProducedType, require_sequential: bool) -> ProducedType {
        if ty.is_unknown() {
            return ProducedType::Unknown;
        }
        if self.is_sequential(ty) {
            let mut elements = self.tuple_element_types(ty);
            let variadic = self.is_tuple_length_unbounded(ty);
            let at_least_one = self.is_tuple_variant_at_least_one(ty);
            let minimum = self.tuple_minimum_length(ty);
            if variadic {
                if let Some(last) = elements.last_mut() {
                    *last = self.iterated_type(last).unwrap_or(ProducedType::Unknown);
                }
            }
            return self.tuple_type(&elements, variadic, at_least_one, Some(minimum));
        }
        let element = self.iterated_type(ty).unwrap_or(ProducedType::Unknown);
        let sequential = if self.is_nonempty_iterable(ty) {
            self.sequence_type(element)
        } else {
            self.sequential_type(element)
        };
        if require_sequential {
            sequential
        } else {
            self.intersection2(sequential, ty.clone())
        }
    }

    /// Tuple type of a parameter list's declared types
    pub fn parameter_tuple(&self, list: &super::ParameterList) -> ProducedType {
        let elements: Vec<ProducedType> = list
            .parameters
            .iter()
            .map(|p| {
                let ty = self.parameter_type(p);
                if p.sequenced {
                    self.iterated_type(&ty).unwrap_or(ty)
                } else {
                    ty
                }
            })
            .collect();
        let sequenced = list.has_sequenced();
        let at_least_one = sequenced
            && list
                .parameters
                .last()
                .is_some_and(|p| self.is_nonempty_iterable(&self.parameter_type(p)));
        self.tuple_type(&elements, sequenced, at_least_one, list.first_defaulted())
    }
}
