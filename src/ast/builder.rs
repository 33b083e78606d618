//! Programmatic AST construction
//!
//! Stands in for the parser and binding pass: each call appends one node
//! and returns its id. Nodes get consecutive synthetic spans, one line per
//! node, so diagnostics remain locatable.

use super::*;
use std::path::PathBuf;

pub struct AstBuilder {
    ast: Ast,
    file: PathBuf,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new("unit.lm")
    }
}

impl AstBuilder {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            ast: Ast::new(),
            file: file.into(),
        }
    }

    /// Append a node with the next synthetic span
    pub fn node(&mut self, kind: NodeKind) -> NodeId {
        let line = self.ast.len() + 1;
        let span = Span::on_line(self.file.clone(), line, 0, 1);
        self.ast.push(span, kind)
    }

    pub fn finish(self, roots: Vec<NodeId>) -> CompilationUnit {
        CompilationUnit {
            ast: self.ast,
            roots,
        }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    // Literals

    pub fn integer(&mut self, value: i64) -> NodeId {
        self.node(NodeKind::Literal(Literal::Integer(value.to_string())))
    }

    pub fn float(&mut self, value: f64) -> NodeId {
        self.node(NodeKind::Literal(Literal::Float(value.to_string())))
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.node(NodeKind::Literal(Literal::String(value.to_string())))
    }

    pub fn character(&mut self, text: &str) -> NodeId {
        self.node(NodeKind::Literal(Literal::Character(text.to_string())))
    }

    pub fn template(&mut self, parts: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::StringTemplate(parts))
    }

    // References

    pub fn member(&mut self, decl: DeclId, name: &str) -> NodeId {
        self.node(NodeKind::BaseMember(member_ref(Some(decl), name, None)))
    }

    /// A reference the binding pass could not resolve
    pub fn unresolved(&mut self, name: &str) -> NodeId {
        self.node(NodeKind::BaseMember(member_ref(None, name, None)))
    }

    pub fn member_with_args(
        &mut self,
        decl: DeclId,
        name: &str,
        type_args: Vec<ProducedType>,
    ) -> NodeId {
        self.node(NodeKind::BaseMember(member_ref(Some(decl), name, Some(type_args))))
    }

    pub fn base_type(&mut self, decl: DeclId, name: &str) -> NodeId {
        self.node(NodeKind::BaseType(member_ref(Some(decl), name, None)))
    }

    pub fn base_type_with_args(
        &mut self,
        decl: DeclId,
        name: &str,
        type_args: Vec<ProducedType>,
    ) -> NodeId {
        self.node(NodeKind::BaseType(member_ref(Some(decl), name, Some(type_args))))
    }

    pub fn qualified(
        &mut self,
        receiver: NodeId,
        operator: MemberOperator,
        decl: DeclId,
        name: &str,
    ) -> NodeId {
        self.node(NodeKind::QualifiedMember {
            receiver,
            operator,
            member: member_ref(Some(decl), name, None),
        })
    }

    pub fn this(&mut self) -> NodeId {
        self.node(NodeKind::This)
    }

    // Compound expressions

    pub fn call(&mut self, primary: NodeId, args: Vec<NodeId>) -> NodeId {
        let args = args.into_iter().map(PositionalArg::Listed).collect();
        self.call_with(primary, args)
    }

    pub fn call_with(&mut self, primary: NodeId, args: Vec<PositionalArg>) -> NodeId {
        self.node(NodeKind::Invocation {
            primary,
            arguments: Arguments::Positional(args),
        })
    }

    pub fn call_named(
        &mut self,
        primary: NodeId,
        named: Vec<(Option<&str>, NodeId)>,
        sequenced: Option<Vec<PositionalArg>>,
    ) -> NodeId {
        let named = named
            .into_iter()
            .map(|(name, value)| NamedArg {
                name: name.map(str::to_string),
                value,
            })
            .collect();
        self.node(NodeKind::Invocation {
            primary,
            arguments: Arguments::Named(NamedArguments { named, sequenced }),
        })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.node(NodeKind::Binary { op, lhs, rhs })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.node(NodeKind::Unary { op, operand })
    }

    pub fn is_test(&mut self, operand: NodeId, ty: ProducedType) -> NodeId {
        self.node(NodeKind::IsTest { operand, ty })
    }

    pub fn of(&mut self, operand: NodeId, ty: ProducedType) -> NodeId {
        self.node(NodeKind::Of { operand, ty })
    }

    pub fn index(&mut self, primary: NodeId, index: NodeId) -> NodeId {
        self.node(NodeKind::Index {
            primary,
            index: IndexKind::Element(index),
        })
    }

    pub fn range_index(
        &mut self,
        primary: NodeId,
        from: Option<NodeId>,
        to: Option<NodeId>,
    ) -> NodeId {
        self.node(NodeKind::Index {
            primary,
            index: IndexKind::Range { from, to },
        })
    }

    pub fn tuple(&mut self, elements: Vec<PositionalArg>) -> NodeId {
        self.node(NodeKind::Tuple(elements))
    }

    pub fn sequence(&mut self, elements: Vec<PositionalArg>) -> NodeId {
        self.node(NodeKind::SequenceEnumeration(elements))
    }

    pub fn lambda(&mut self, decl: DeclId, body: FunctionBody) -> NodeId {
        self.node(NodeKind::AnonymousFunction { decl, body })
    }

    pub fn dynamic(&mut self, members: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Dynamic(members))
    }

    // Declarations

    pub fn value(&mut self, decl: DeclId, init: Option<NodeId>) -> NodeId {
        self.node(NodeKind::ValueDecl { decl, init })
    }

    pub fn function(&mut self, decl: DeclId, body: FunctionBody) -> NodeId {
        self.function_with_defaults(decl, body, Vec::new())
    }

    pub fn function_with_defaults(
        &mut self,
        decl: DeclId,
        body: FunctionBody,
        defaults: Vec<DefaultArgument>,
    ) -> NodeId {
        self.node(NodeKind::FunctionDef {
            decl,
            body,
            defaults,
        })
    }

    pub fn class(&mut self, decl: DeclId, body: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::ClassDef {
            decl,
            body,
            defaults: Vec::new(),
        })
    }

    pub fn interface(&mut self, decl: DeclId, body: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::InterfaceDef { decl, body })
    }

    pub fn alias(&mut self, decl: DeclId) -> NodeId {
        self.node(NodeKind::AliasDef { decl })
    }

    // Statements

    pub fn expr_stmt(&mut self, expr: NodeId) -> NodeId {
        self.node(NodeKind::ExprStmt(expr))
    }

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Block(statements))
    }

    pub fn if_else(
        &mut self,
        conditions: Vec<NodeId>,
        then_block: NodeId,
        else_block: Option<NodeId>,
    ) -> NodeId {
        self.node(NodeKind::If {
            conditions,
            then_block,
            else_block,
        })
    }

    pub fn while_loop(&mut self, conditions: Vec<NodeId>, body: NodeId) -> NodeId {
        self.node(NodeKind::While { conditions, body })
    }

    pub fn for_loop(&mut self, iterator: ForIterator, iterated: NodeId, body: NodeId) -> NodeId {
        self.node(NodeKind::For {
            iterator,
            iterated,
            body,
            else_block: None,
        })
    }

    pub fn switch(&mut self, expr: NodeId, cases: Vec<NodeId>, else_block: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Switch {
            expr,
            cases,
            else_block,
        })
    }

    pub fn case_is(&mut self, ty: ProducedType, variable: Option<DeclId>, body: NodeId) -> NodeId {
        self.node(NodeKind::Case {
            case: CaseKind::Is { ty, variable },
            body,
        })
    }

    pub fn case_match(&mut self, values: Vec<NodeId>, body: NodeId) -> NodeId {
        self.node(NodeKind::Case {
            case: CaseKind::Match(values),
            body,
        })
    }

    pub fn try_catch(&mut self, body: NodeId, catches: Vec<NodeId>, finally: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Try {
            body,
            catches,
            finally,
        })
    }

    pub fn catch(&mut self, variable: DeclId, body: NodeId) -> NodeId {
        self.node(NodeKind::Catch { variable, body })
    }

    pub fn dynamic_block(&mut self, body: NodeId) -> NodeId {
        self.node(NodeKind::DynamicBlock(body))
    }

    pub fn ret(&mut self, value: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Return(value))
    }

    pub fn throw(&mut self, value: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Throw(value))
    }

    // Conditions

    /// `is T v = expr` (new variable) or `is T x` (synthetic, narrowing `x`)
    pub fn is_condition(
        &mut self,
        negated: bool,
        ty: ProducedType,
        variable: Option<ConditionVariable>,
        expr: NodeId,
    ) -> NodeId {
        self.node(NodeKind::Condition(Condition::Is {
            negated,
            ty,
            variable,
            expr,
        }))
    }

    pub fn exists_condition(&mut self, variable: Option<ConditionVariable>, expr: NodeId) -> NodeId {
        self.node(NodeKind::Condition(Condition::Exists { variable, expr }))
    }

    pub fn nonempty_condition(&mut self, variable: Option<ConditionVariable>, expr: NodeId) -> NodeId {
        self.node(NodeKind::Condition(Condition::Nonempty { variable, expr }))
    }

    pub fn boolean_condition(&mut self, expr: NodeId) -> NodeId {
        self.node(NodeKind::Condition(Condition::Boolean(expr)))
    }
}

fn member_ref(decl: Option<DeclId>, name: &str, type_args: Option<Vec<ProducedType>>) -> MemberRef {
    MemberRef {
        name: name.to_string(),
        decl,
        type_args,
    }
}
