//! Statements and declarations
//!
//! Statements have no type of their own; they check the expressions they
//! contain, infer the types of `value` and `function` declarations, and
//! thread the [`Context`] into nested blocks.

use super::*;
use crate::model::AliasResolution;

impl TypeChecker<'_> {
    pub(super) fn check_statement(&mut self, node: NodeId, ctx: Context) {
        trace!(node = node.0, "visiting statement");
        let ast = self.ast;
        let model = self.model;
        match ast.kind(node) {
            NodeKind::ValueDecl { decl, init } => self.check_value_decl(*decl, *init, ctx),
            NodeKind::FunctionDef {
                decl,
                body,
                defaults,
            } => {
                self.check_defaults(*decl, defaults, ctx);
                self.check_function_body(*decl, *body, ctx);
            }
            NodeKind::ClassDef {
                decl,
                body,
                defaults,
            } => {
                self.check_type_declaration(node, *decl);
                self.check_defaults(*decl, defaults, ctx);
                let inner = ctx.in_class(*decl);
                for &statement in body {
                    self.check_statement(statement, inner);
                }
            }
            NodeKind::InterfaceDef { decl, body } => {
                self.check_type_declaration(node, *decl);
                let inner = ctx.in_class(*decl);
                for &statement in body {
                    self.check_statement(statement, inner);
                }
            }
            NodeKind::AliasDef { decl } => {
                let params = model
                    .type_parameters(*decl)
                    .iter()
                    .map(|p| ProducedType::Parameter(*p))
                    .collect();
                let alias = ProducedType::declared(*decl, params);
                if let AliasResolution::Cycle(_) = model.resolve_alias_type(&alias) {
                    self.error(
                        node,
                        type_codes::RECURSIVE_ALIAS,
                        format!("type alias is circular: definition of {} is recursive", self.decl_name(*decl)),
                    );
                }
            }
            NodeKind::ExprStmt(expr) => {
                self.check_expr(*expr, ctx);
            }
            NodeKind::Block(statements) => {
                for &statement in statements {
                    self.check_statement(statement, ctx);
                }
            }
            NodeKind::If {
                conditions,
                then_block,
                else_block,
            } => {
                for &condition in conditions {
                    self.check_statement(condition, ctx);
                }
                self.check_statement(*then_block, ctx);
                if let Some(block) = else_block {
                    self.check_statement(*block, ctx);
                }
            }
            NodeKind::While { conditions, body } => {
                for &condition in conditions {
                    self.check_statement(condition, ctx);
                }
                self.check_statement(*body, ctx);
            }
            NodeKind::For {
                iterator,
                iterated,
                body,
                else_block,
            } => {
                self.check_for(*iterator, *iterated, ctx);
                self.check_statement(*body, ctx);
                if let Some(block) = else_block {
                    self.check_statement(*block, ctx);
                }
            }
            NodeKind::Switch {
                expr,
                cases,
                else_block,
            } => self.check_switch(node, *expr, cases, *else_block, ctx),
            NodeKind::Case { body, .. } => self.check_statement(*body, ctx),
            NodeKind::Try {
                body,
                catches,
                finally,
            } => self.check_try(*body, catches, *finally, ctx),
            NodeKind::Catch { body, .. } => self.check_statement(*body, ctx),
            NodeKind::DynamicBlock(body) => self.check_statement(*body, ctx.in_dynamic()),
            NodeKind::Return(value) => self.check_return(node, *value, ctx),
            NodeKind::Throw(value) => {
                if let Some(expr) = value {
                    let ty = self.check_expr(*expr, ctx);
                    self.check_assignable(*expr, &ty, &model.exception_type(), "thrown expression must be an exception");
                }
            }
            NodeKind::Condition(condition) => self.check_condition(node, condition, ctx),
            _ => {
                self.check_expr(node, ctx);
            }
        }
    }

    fn check_value_decl(&mut self, decl: DeclId, init: Option<NodeId>, ctx: Context) {
        let model = self.model;
        let Some(init) = init else {
            return;
        };
        let ty = self.check_expr(init, ctx);
        let Some(value) = model.value(decl) else {
            return;
        };
        match &value.ty {
            Some(declared) => {
                let declared = if value.unchecked_null {
                    model.optional_type(declared.clone())
                } else {
                    declared.clone()
                };
                self.check_assignable(init, &ty, &declared, "specified expression must be assignable to declared type");
            }
            None => self.analysis.set_decl_type(decl, model.denotable(&ty)),
        }
    }

    /// Default arguments must be assignable to their parameters
    fn check_defaults(&mut self, decl: DeclId, defaults: &[DefaultArgument], ctx: Context) {
        let owner = self.decl_name(decl);
        for default in defaults {
            let ty = self.check_expr(default.value, ctx);
            let expected = self.value_type(default.parameter);
            let message = format!(
                "default argument must be assignable to parameter {} of {owner}",
                self.decl_name(default.parameter)
            );
            self.check_assignable(default.value, &ty, &expected, &message);
        }
    }

    /// Check a function or anonymous function body and infer the return
    /// type when none is declared
    pub(super) fn check_function_body(&mut self, decl: DeclId, body: FunctionBody, ctx: Context) {
        let model = self.model;
        let inner = ctx.returning(decl);
        match body {
            FunctionBody::Expression(expr) => {
                let ty = self.check_expr(expr, inner);
                let Some(function) = model.function(decl) else {
                    return;
                };
                if function.declared_void {
                    return;
                }
                match &function.return_type {
                    Some(declared) => {
                        let message = format!(
                            "returned expression must be assignable to return type of {}",
                            self.decl_name(decl)
                        );
                        self.check_assignable(expr, &ty, declared, &message);
                    }
                    None => self.analysis.set_decl_type(decl, model.denotable(&ty)),
                }
            }
            FunctionBody::Block(block) => {
                self.check_statement(block, inner);
                self.finish_inferred_return(decl);
            }
            FunctionBody::None => {}
        }
    }

    /// Join the types returned by a function whose return type is inferred
    fn finish_inferred_return(&mut self, decl: DeclId) {
        let inferred = self
            .model
            .function(decl)
            .is_some_and(|f| f.return_type.is_none() && !f.declared_void);
        let (returned, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.returned)
            .into_iter()
            .partition(|(d, _)| *d == decl);
        self.returned = rest;
        if !inferred {
            return;
        }
        let ty = if returned.is_empty() {
            self.model.anything_type()
        } else {
            self.model.union(returned.into_iter().map(|(_, ty)| ty))
        };
        debug!(function = self.decl_name(decl), inferred = %self.name(&ty), "inferred return type");
        self.analysis.set_decl_type(decl, ty);
    }

    fn check_return(&mut self, node: NodeId, value: Option<NodeId>, ctx: Context) {
        let model = self.model;
        let ty = value.map(|expr| (expr, self.check_expr(expr, ctx)));
        let Some(owner) = ctx.returns else {
            self.error(
                node,
                type_codes::INVALID_RETURN,
                "return statement must occur inside a function, getter or class body",
            );
            return;
        };
        let name = self.decl_name(owner);
        let void = match model.function(owner) {
            Some(function) => function.declared_void,
            None => model.class_or_interface(owner).is_some(),
        };
        match ty {
            Some(_) if void => {
                self.error(
                    node,
                    type_codes::INVALID_RETURN,
                    format!("a void method, void function, setter, or class initializer may not return a value: {name}"),
                );
            }
            Some((expr, ty)) => match model.function(owner).and_then(|f| f.return_type.as_ref()) {
                Some(declared) => {
                    let message = format!("returned expression must be assignable to return type of {name}");
                    self.check_assignable(expr, &ty, declared, &message);
                }
                None => self.returned.push((owner, model.denotable(&ty))),
            },
            None if !void
                && model
                    .function(owner)
                    .is_some_and(|f| f.return_type.is_some()) =>
            {
                self.error(
                    node,
                    type_codes::INVALID_RETURN,
                    format!("a non-void method, function or getter must return a value: {name}"),
                );
            }
            None => {}
        }
    }

    /// Bind the iteration variables of a `for` statement
    fn check_for(&mut self, iterator: ForIterator, iterated: NodeId, ctx: Context) {
        let model = self.model;
        let ty = self.check_expr(iterated, ctx);
        let element = if ty.is_unknown() {
            ProducedType::Unknown
        } else {
            if model.is_empty_type(&ty) {
                self.error(
                    iterated,
                    narrow_codes::DEFINITELY_EMPTY,
                    "iterated expression is definitely empty",
                );
            }
            self.check_supertype(iterated, &ty, model.lang().iterable, "expression must be of iterable type")
                .and_then(|st| st.arg(0).cloned())
                .unwrap_or(ProducedType::Unknown)
        };
        match iterator {
            ForIterator::Value(variable) => self.bind_iteration_variable(iterated, variable, element),
            ForIterator::KeyValue { key, item } => {
                let entry = self.check_supertype(
                    iterated,
                    &element,
                    model.lang().entry,
                    "iterated element must be an entry",
                );
                let (key_type, item_type) = match entry {
                    Some(entry) => (
                        entry.arg(0).cloned().unwrap_or(ProducedType::Unknown),
                        entry.arg(1).cloned().unwrap_or(ProducedType::Unknown),
                    ),
                    None => (ProducedType::Unknown, ProducedType::Unknown),
                };
                self.bind_iteration_variable(iterated, key, key_type);
                self.bind_iteration_variable(iterated, item, item_type);
            }
        }
    }

    fn bind_iteration_variable(&mut self, iterated: NodeId, variable: DeclId, ty: ProducedType) {
        let model = self.model;
        match model.value(variable).and_then(|v| v.ty.as_ref()) {
            Some(declared) => {
                self.check_assignable(iterated, &ty, declared, "iterated element type must be assignable to declared type");
            }
            None => self.analysis.set_decl_type(variable, model.denotable(&ty)),
        }
    }
}
