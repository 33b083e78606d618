//! Type argument validation

use super::*;

impl TypeChecker<'_> {
    /// Extend `receiver` with the arguments for `decl`'s own type
    /// parameters; missing trailing arguments come from the defaults
    pub(super) fn with_type_arguments(
        &self,
        decl: DeclId,
        args: &[ProducedType],
        receiver: &TypeArgMap,
    ) -> TypeArgMap {
        let model = self.model;
        let mut map = receiver.clone();
        for (i, param) in model.type_parameters(decl).iter().enumerate() {
            let arg = match args.get(i) {
                Some(arg) => arg.clone(),
                None => model
                    .type_parameter(*param)
                    .and_then(|tp| tp.default.as_ref())
                    .map(|default| model.substitute(default, &map))
                    .unwrap_or(ProducedType::Unknown),
            };
            map.insert(*param, arg);
        }
        map
    }

    /// Check count, upper bounds and enumerated constraints of the type
    /// arguments given to (or inferred for) `decl`. Arguments involving
    /// `Unknown` are not reported.
    pub(super) fn check_type_arguments(
        &mut self,
        node: NodeId,
        decl: DeclId,
        args: &[ProducedType],
        receiver: &TypeArgMap,
        inferred: bool,
    ) -> bool {
        let model = self.model;
        let params = model.type_parameters(decl);
        let name = self.decl_name(decl);
        if params.is_empty() {
            if args.is_empty() {
                return true;
            }
            self.error(
                node,
                type_codes::WRONG_TYPE_ARGUMENT_COUNT,
                format!("does not accept type arguments: {name}"),
            );
            return false;
        }
        let max = params.len();
        let min = params
            .iter()
            .position(|p| model.type_parameter(*p).is_some_and(|tp| tp.default.is_some()))
            .unwrap_or(max);
        if args.is_empty() && min > 0 {
            self.error(
                node,
                type_codes::WRONG_TYPE_ARGUMENT_COUNT,
                format!("requires type arguments: {name}"),
            );
            return false;
        }
        if args.len() < min {
            self.error_with_help(
                node,
                type_codes::WRONG_TYPE_ARGUMENT_COUNT,
                format!("wrong number of type arguments to: {name}"),
                format!("requires at least {min} type arguments"),
            );
            return false;
        }
        if args.len() > max {
            self.error_with_help(
                node,
                type_codes::WRONG_TYPE_ARGUMENT_COUNT,
                format!("wrong number of type arguments to: {name}"),
                format!("allows at most {max} type arguments"),
            );
            return false;
        }

        let map = self.with_type_arguments(decl, args, receiver);
        let mut valid = true;
        for (param, arg) in params.iter().zip(args) {
            if arg.contains_unknown() {
                continue;
            }
            let param_name = self.decl_name(*param);
            let arg_name = self.name(arg);
            for bound in model.satisfied_types(*param) {
                let bound = model.substitute(bound, &map);
                if bound.contains_unknown() || model.is_subtype_of(arg, &bound) {
                    continue;
                }
                let message = if inferred {
                    format!(
                        "inferred type argument {arg_name} to type parameter {param_name} of declaration {name} not assignable to upper bound {}",
                        self.name(&bound)
                    )
                } else {
                    format!(
                        "type parameter {param_name} of declaration {name} has argument {arg_name} not assignable to upper bound {}",
                        self.name(&bound)
                    )
                };
                self.error(node, type_codes::UPPER_BOUND_VIOLATION, message);
                valid = false;
            }
            let cases = model.case_types(*param);
            if !cases.is_empty() && !self.is_enumerated_case(arg, cases, &map) {
                let message = if inferred {
                    format!(
                        "inferred type argument {arg_name} to type parameter {param_name} of declaration {name} not one of the enumerated cases"
                    )
                } else {
                    format!(
                        "type parameter {param_name} of declaration {name} has argument {arg_name} not one of the enumerated cases"
                    )
                };
                self.error(node, type_codes::ENUMERATED_CONSTRAINT, message);
                valid = false;
            }
        }
        valid
    }

    /// `arg` is a subtype of one of the cases, or is a type parameter all
    /// of whose own cases are
    fn is_enumerated_case(&self, arg: &ProducedType, cases: &[ProducedType], map: &TypeArgMap) -> bool {
        let model = self.model;
        let cases: Vec<ProducedType> = cases.iter().map(|c| model.substitute(c, map)).collect();
        let fits = |ty: &ProducedType| cases.iter().any(|case| model.is_subtype_of(ty, case));
        if fits(arg) {
            return true;
        }
        match arg {
            ProducedType::Parameter(p) => {
                let own = model.case_types(*p);
                !own.is_empty() && own.iter().all(fits)
            }
            _ => false,
        }
    }
}
