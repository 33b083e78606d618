//! Case analysis: `switch` and `try`/`catch`

use super::*;

impl TypeChecker<'_> {
    pub(super) fn check_switch(
        &mut self,
        node: NodeId,
        expr: NodeId,
        cases: &[NodeId],
        else_block: Option<NodeId>,
        ctx: Context,
    ) {
        let model = self.model;
        let ast = self.ast;
        let switched = self.check_expr(expr, ctx);
        let unchecked_null = self.has_unchecked_nulls(expr);

        let mut case_types: Vec<(NodeId, ProducedType)> = Vec::new();
        let mut type_cases = false;
        for &case in cases {
            let NodeKind::Case { case: kind, body } = ast.kind(case) else {
                self.check_statement(case, ctx);
                continue;
            };
            let ty = match kind {
                CaseKind::Is { ty, variable } => {
                    type_cases = true;
                    self.warn_unchecked_type_arguments(case, ty);
                    // an explicit null case is allowed when nullity is unchecked
                    let null_case = unchecked_null && model.is_subtype_of(ty, &model.null_type());
                    let narrowed = if switched.is_unknown() || null_case {
                        ty.clone()
                    } else {
                        model.intersection2(ty.clone(), switched.clone())
                    };
                    if narrowed.is_nothing() && !ty.contains_unknown() {
                        self.error(
                            case,
                            narrow_codes::NARROWS_TO_NOTHING,
                            format!(
                                "narrows to Nothing type: {} has empty intersection with {}",
                                self.name(ty),
                                self.name(&switched)
                            ),
                        );
                    }
                    if let Some(variable) = variable {
                        self.analysis.set_decl_type(*variable, narrowed);
                    }
                    model.union_of_cases(ty)
                }
                CaseKind::Match(values) => {
                    let types: Vec<ProducedType> = values
                        .iter()
                        .map(|&value| self.check_match_value(value, &switched, unchecked_null, ctx))
                        .collect();
                    model.union(types)
                }
            };
            self.check_statement(*body, ctx);
            case_types.push((case, ty));
        }

        if type_cases {
            match ast.kind(expr) {
                NodeKind::BaseMember(_) => self.check_constant_reference(expr),
                _ => self.error(
                    expr,
                    narrow_codes::NON_CONSTANT_REFERENCE,
                    "switch expression must be a value reference in switch with type cases",
                ),
            }
        }

        let null = model.null_type();
        for (i, (case, ty)) in case_types.iter().enumerate() {
            for (earlier_case, earlier) in &case_types[..i] {
                if ty.contains_unknown() || earlier.contains_unknown() {
                    continue;
                }
                // a null case is always distinct when nullity is unchecked
                if unchecked_null && (model.is_subtype_of(ty, &null) || model.is_subtype_of(earlier, &null)) {
                    continue;
                }
                let overlap = model.intersection2(ty.clone(), earlier.clone());
                if !overlap.is_nothing() {
                    self.error_with_note(
                        *case,
                        narrow_codes::NON_DISJOINT_CASES,
                        format!(
                            "cases are not disjoint: {} and {}",
                            self.name(earlier),
                            self.name(ty)
                        ),
                        Note::new(format!("both cases match values of type {}", self.name(&overlap)))
                            .with_span(ast.span(*earlier_case).clone()),
                    );
                }
            }
        }

        match else_block {
            Some(block) => self.check_statement(block, ctx),
            None if !switched.contains_unknown() => {
                let covered = model.union(case_types.iter().map(|(_, ty)| ty.clone()));
                if !covered.contains_unknown() && !model.covers(&covered, &switched) {
                    self.error(
                        node,
                        narrow_codes::NON_EXHAUSTIVE_SWITCH,
                        format!(
                            "case types must cover all cases of the switch type or an else clause must appear: {} does not cover {}",
                            self.name(&covered),
                            self.name(&switched)
                        ),
                    );
                }
            }
            None => {}
        }
    }

    /// A value case must name a toplevel `object`
    fn check_match_value(
        &mut self,
        value: NodeId,
        switched: &ProducedType,
        unchecked_null: bool,
        ctx: Context,
    ) -> ProducedType {
        let model = self.model;
        let ty = self.check_expr(value, ctx);
        if ty.is_unknown() {
            return ty;
        }
        let toplevel_object = match self.ast.kind(value) {
            NodeKind::BaseMember(member) => member.decl.is_some_and(|decl| {
                model.is_toplevel(decl)
                    && ty.declaration().is_some_and(|class| model.is_anonymous(class))
            }),
            _ => false,
        };
        if !toplevel_object {
            self.error(
                value,
                narrow_codes::INVALID_CASE,
                "case must refer to a toplevel object declaration",
            );
        }
        let null_case = unchecked_null && model.is_subtype_of(&ty, &model.null_type());
        if !null_case {
            self.check_assignable_with(
                value,
                &ty,
                switched,
                narrow_codes::INVALID_CASE,
                "case must be assignable to switch expression type",
            );
        }
        ty
    }

    pub(super) fn check_try(
        &mut self,
        body: NodeId,
        catches: &[NodeId],
        finally: Option<NodeId>,
        ctx: Context,
    ) {
        let model = self.model;
        let ast = self.ast;
        self.check_statement(body, ctx);
        let exception = model.exception_type();
        let mut handled: Vec<ProducedType> = Vec::new();
        for &clause in catches {
            let NodeKind::Catch { variable, body } = ast.kind(clause) else {
                self.check_statement(clause, ctx);
                continue;
            };
            let caught = match model.value(*variable).and_then(|v| v.ty.clone()) {
                Some(declared) => {
                    self.check_assignable(clause, &declared, &exception, "catch type must be an exception type");
                    declared
                }
                None => {
                    self.analysis.set_decl_type(*variable, exception.clone());
                    exception.clone()
                }
            };
            if !caught.contains_unknown() {
                self.check_already_handled(clause, &caught, &handled);
            }
            handled.push(caught);
            self.check_statement(*body, ctx);
        }
        if let Some(block) = finally {
            self.check_statement(block, ctx);
        }
    }

    fn check_already_handled(&mut self, clause: NodeId, caught: &ProducedType, handled: &[ProducedType]) {
        let model = self.model;
        let is_handled = |ty: &ProducedType| handled.iter().any(|h| model.is_subtype_of(ty, h));
        if is_handled(caught) {
            self.error(
                clause,
                narrow_codes::ALREADY_HANDLED,
                format!("exception type is already handled by earlier catch clause: {}", self.name(caught)),
            );
        }
        if let ProducedType::Union(cases) = model.unalias(caught).as_ref() {
            for case in cases.iter().filter(|c| is_handled(c)) {
                self.error(
                    clause,
                    narrow_codes::ALREADY_HANDLED,
                    format!("exception type is already handled by earlier catch clause: {}", self.name(case)),
                );
            }
        }
    }
}
