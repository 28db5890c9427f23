//! Abstract syntax tree for nya programs.
//!
//! Expression nodes live in an append‑only [`Ast`] arena and are referred to by
//! [`ExprId`].  The id is the node's identity: the resolver keys its distance
//! table by it, and the interpreter looks the distance up again at run time.
//! Statements form an ordinary owned tree whose leaves point into the arena.

use std::ops::Index;
use std::rc::Rc;

use crate::token::Token;

/// Stable index of an expression node inside an [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A **literal constant** that appears directly in the source code.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Numeric literal ‑ stored as IEEE‑754 `f64`.
    Number(f64),

    /// String literal without surrounding quotes.
    Str(String),

    /// `twue` / `fawse`.
    Bool(bool),

    /// The `nuww` literal.
    Nil,
}

/// Expression node.  Children are arena ids, never boxes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant: number, string, boolean, or `nuww`.
    Literal(LiteralValue),

    /// Variable access ‑ resolves to the identifier's current value at runtime.
    Variable { name: Token },

    /// Assignment expression: `identifier o/ expression`
    Assign { name: Token, value: ExprId },

    /// Prefix operator expression (`~ready`, `-.- 42`).
    Unary { operator: Token, right: ExprId },

    /// Infix arithmetic, comparison or equality operator.
    Binary {
        left: ExprId,
        operator: Token,
        right: ExprId,
    },

    /// Short‑circuiting `&.&` / `v.v`.
    Logical {
        left: ExprId,
        operator: Token,
        right: ExprId,
    },

    /// Parenthesised sub‑expression.
    Grouping(ExprId),

    /// Function call.
    Call {
        callee: ExprId,
        /// The closing `)` token ‑ retained for error reporting.
        paren: Token,
        arguments: Vec<ExprId>,
    },
}

/// A function declaration.  Shared between the statement tree and every
/// closure created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,

    /// Parameter name tokens (arity ≤ 255).
    pub params: Vec<Token>,

    pub body: Vec<Stmt>,
}

/// **Abstract‑Syntax‑Tree node** for *statements*.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Stand‑alone expression terminated by a semicolon.
    Expression(ExprId),

    /// `pwint` statement used for output.
    Print(ExprId),

    /// Variable declaration: `>.< IDENT (o/ initializer)? ;`.
    Var {
        name: Token,
        initializer: Option<ExprId>,
    },

    /// `:> … <:` scope.
    Block(Vec<Stmt>),

    If {
        condition: ExprId,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// `^w^` loop.  `^o^` loops are desugared into this form by the parser.
    While { condition: ExprId, body: Box<Stmt> },

    /// Function declaration ‑ becomes a first‑class callable value.
    Function(Rc<FunctionDecl>),

    /// `c:` statement inside a function body.
    Return {
        /// The `c:` token (for diagnostics).
        keyword: Token,

        /// Absent ⇒ `nuww` is returned.
        value: Option<ExprId>,
    },
}

/// Append‑only expression arena.
///
/// Owned by the interpreter for its whole lifetime so ids stay unique across
/// REPL lines and closures never outlive the nodes they reference.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    exprs: Vec<Expr>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `expr` and hand back its identity.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

impl Index<ExprId> for Ast {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        self.get(id)
    }
}
