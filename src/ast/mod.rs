//! Abstract syntax tree consumed by the type checker
//!
//! Nodes live in an arena owned by [`Ast`] and refer to each other by
//! [`NodeId`]. Every node carries a source span. Names have already been
//! resolved by the binding pass: references carry the [`DeclId`] they bind
//! to (or `None` when resolution failed) and type expressions are already
//! [`ProducedType`]s.

mod builder;

pub use builder::AstBuilder;

use crate::diagnostics::Span;
use crate::model::{DeclId, ProducedType};
use serde::{Deserialize, Serialize};

/// Index of a node in the AST arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// A node: its span and its data
#[derive(Debug, Clone)]
pub struct Node {
    pub span: Span,
    pub kind: NodeKind,
}

/// The node arena
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, span: Span, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { span, kind });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> &Span {
        &self.node(id).span
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A unit ready for checking: the arena plus its toplevel statements
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub ast: Ast,
    pub roots: Vec<NodeId>,
}

/// All node kinds
#[derive(Debug, Clone)]
pub enum NodeKind {
    // Expressions
    Literal(Literal),
    /// `"Hello, ``name``!"`: the interpolated expressions
    StringTemplate(Vec<NodeId>),
    /// Unqualified reference to a value or function
    BaseMember(MemberRef),
    /// Unqualified reference to a class, as in `Point(1, 2)`
    BaseType(MemberRef),
    /// `receiver.member`, `receiver?.member`, `receiver*.member`
    QualifiedMember {
        receiver: NodeId,
        operator: MemberOperator,
        member: MemberRef,
    },
    This,
    Invocation {
        primary: NodeId,
        arguments: Arguments,
    },
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    /// `x is T`
    IsTest {
        operand: NodeId,
        ty: ProducedType,
    },
    /// `x of T`
    Of {
        operand: NodeId,
        ty: ProducedType,
    },
    /// `primary[...]`
    Index {
        primary: NodeId,
        index: IndexKind,
    },
    /// `[a, b, *rest]`
    Tuple(Vec<PositionalArg>),
    /// `{ a, b, *rest }`
    SequenceEnumeration(Vec<PositionalArg>),
    /// `(Integer x) => x + 1`; the function declaration holds the
    /// parameters and the (usually inferred) return type
    AnonymousFunction {
        decl: DeclId,
        body: FunctionBody,
    },
    /// `dynamic [ ... ]`: untyped instantiation, only inside dynamic blocks
    Dynamic(Vec<NodeId>),

    // Declarations
    /// `String x = ...;` or `value x = ...;`
    ValueDecl {
        decl: DeclId,
        init: Option<NodeId>,
    },
    FunctionDef {
        decl: DeclId,
        body: FunctionBody,
        defaults: Vec<DefaultArgument>,
    },
    ClassDef {
        decl: DeclId,
        body: Vec<NodeId>,
        defaults: Vec<DefaultArgument>,
    },
    InterfaceDef {
        decl: DeclId,
        body: Vec<NodeId>,
    },
    AliasDef {
        decl: DeclId,
    },

    // Statements
    ExprStmt(NodeId),
    Block(Vec<NodeId>),
    If {
        conditions: Vec<NodeId>,
        then_block: NodeId,
        else_block: Option<NodeId>,
    },
    While {
        conditions: Vec<NodeId>,
        body: NodeId,
    },
    For {
        iterator: ForIterator,
        iterated: NodeId,
        body: NodeId,
        else_block: Option<NodeId>,
    },
    Switch {
        expr: NodeId,
        cases: Vec<NodeId>,
        else_block: Option<NodeId>,
    },
    /// One `case (...)` clause of a switch
    Case {
        case: CaseKind,
        body: NodeId,
    },
    Try {
        body: NodeId,
        catches: Vec<NodeId>,
        finally: Option<NodeId>,
    },
    /// `catch (E e)`: the variable's declared type is the caught type
    Catch {
        variable: DeclId,
        body: NodeId,
    },
    DynamicBlock(NodeId),
    Return(Option<NodeId>),
    Throw(Option<NodeId>),

    /// A condition of an `if` or `while`
    Condition(Condition),
}

impl NodeKind {
    /// Check whether the node is an expression
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::Literal(_)
                | NodeKind::StringTemplate(_)
                | NodeKind::BaseMember(_)
                | NodeKind::BaseType(_)
                | NodeKind::QualifiedMember { .. }
                | NodeKind::This
                | NodeKind::Invocation { .. }
                | NodeKind::Binary { .. }
                | NodeKind::Unary { .. }
                | NodeKind::IsTest { .. }
                | NodeKind::Of { .. }
                | NodeKind::Index { .. }
                | NodeKind::Tuple(_)
                | NodeKind::SequenceEnumeration(_)
                | NodeKind::AnonymousFunction { .. }
                | NodeKind::Dynamic(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(String),
    Float(String),
    String(String),
    Character(String),
}

/// A resolved reference with optional explicit type arguments
#[derive(Debug, Clone)]
pub struct MemberRef {
    pub name: String,
    /// `None` when the binding pass could not resolve the name
    pub decl: Option<DeclId>,
    pub type_args: Option<Vec<ProducedType>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberOperator {
    /// `.`
    Member,
    /// `?.`
    Safe,
    /// `*.`
    Spread,
}

#[derive(Debug, Clone)]
pub enum Arguments {
    Positional(Vec<PositionalArg>),
    Named(NamedArguments),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionalArg {
    Listed(NodeId),
    /// `*expr`
    Spread(NodeId),
}

impl PositionalArg {
    pub fn expr(&self) -> NodeId {
        match self {
            PositionalArg::Listed(e) | PositionalArg::Spread(e) => *e,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NamedArguments {
    pub named: Vec<NamedArg>,
    /// Trailing positional arguments of a named argument list
    pub sequenced: Option<Vec<PositionalArg>>,
}

#[derive(Debug, Clone)]
pub struct NamedArg {
    /// `None` for an anonymous argument, which fills the first unmatched
    /// parameter
    pub name: Option<String>,
    pub value: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Sum,
    Difference,
    Product,
    Quotient,
    Remainder,
    Power,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    RemainderAssign,
    Smaller,
    Larger,
    SmallAs,
    LargeAs,
    Compare,
    Equal,
    NotEqual,
    Identical,
    And,
    Or,
    AndAssign,
    OrAssign,
    In,
    /// `a..b`
    Range,
    /// `a:n`
    Segment,
    /// `key->item`
    Entry,
    Union,
    Intersection,
    Complement,
    UnionAssign,
    IntersectionAssign,
    ComplementAssign,
    /// `x else y`
    Else,
    /// `cond then x`
    Then,
    Assign,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Sum => "+",
            BinaryOp::Difference => "-",
            BinaryOp::Product => "*",
            BinaryOp::Quotient => "/",
            BinaryOp::Remainder => "%",
            BinaryOp::Power => "^",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubtractAssign => "-=",
            BinaryOp::MultiplyAssign => "*=",
            BinaryOp::DivideAssign => "/=",
            BinaryOp::RemainderAssign => "%=",
            BinaryOp::Smaller => "<",
            BinaryOp::Larger => ">",
            BinaryOp::SmallAs => "<=",
            BinaryOp::LargeAs => ">=",
            BinaryOp::Compare => "<=>",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Identical => "===",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::AndAssign => "&&=",
            BinaryOp::OrAssign => "||=",
            BinaryOp::In => "in",
            BinaryOp::Range => "..",
            BinaryOp::Segment => ":",
            BinaryOp::Entry => "->",
            BinaryOp::Union => "|",
            BinaryOp::Intersection => "&",
            BinaryOp::Complement => "~",
            BinaryOp::UnionAssign => "|=",
            BinaryOp::IntersectionAssign => "&=",
            BinaryOp::ComplementAssign => "~=",
            BinaryOp::Else => "else",
            BinaryOp::Then => "then",
            BinaryOp::Assign => "=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negative,
    Positive,
    Not,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    /// `x exists`
    Exists,
    /// `x nonempty`
    Nonempty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// `xs[i]`
    Element(NodeId),
    /// `xs[a..b]`, `xs[a...]`, `xs[...b]`
    Range {
        from: Option<NodeId>,
        to: Option<NodeId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionBody {
    /// `=> expr`
    Expression(NodeId),
    /// `{ ... }`
    Block(NodeId),
    /// A formal declaration
    None,
}

/// Default value of a defaulted parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultArgument {
    /// The parameter's value declaration
    pub parameter: DeclId,
    pub value: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForIterator {
    /// `for (x in xs)`
    Value(DeclId),
    /// `for (k->v in entries)`
    KeyValue { key: DeclId, item: DeclId },
}

#[derive(Debug, Clone)]
pub enum CaseKind {
    /// `case (is T)`; `variable` is the narrowed switch variable, if any
    Is {
        ty: ProducedType,
        variable: Option<DeclId>,
    },
    /// `case (a, b)`
    Match(Vec<NodeId>),
}

/// Variable introduced or narrowed by a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionVariable {
    pub decl: DeclId,
    /// Set for `if (is T x)`, which narrows the existing reference `x`
    /// instead of declaring a new value
    pub synthetic: bool,
}

#[derive(Debug, Clone)]
pub enum Condition {
    /// `is T x = expr`, `!is T x`, `is T expr`
    Is {
        negated: bool,
        ty: ProducedType,
        variable: Option<ConditionVariable>,
        expr: NodeId,
    },
    /// `exists x = expr`
    Exists {
        variable: Option<ConditionVariable>,
        expr: NodeId,
    },
    /// `nonempty x = expr`
    Nonempty {
        variable: Option<ConditionVariable>,
        expr: NodeId,
    },
    /// A plain boolean expression
    Boolean(NodeId),
}
