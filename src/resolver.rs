//! Static resolver pass for the **nya** interpreter.
//!
//! This resolver does three things in one AST walk:
//! 1. Build lexical scopes (stack of `HashMap<name, bool>` tracking declared/defined).
//! 2. Report static errors (redeclaration, read in own initializer, top‑level `c:`).
//!    Errors are collected; resolution carries on over the remaining nodes.
//! 3. Tell the interpreter, for *each* variable occurrence, how many scopes up
//!    its binding lives.  References found in no scope are left unrecorded and
//!    looked up in the globals at run time.

use crate::ast::{Ast, Expr, ExprId, FunctionDecl, Stmt};
use crate::error::NyaError;
use crate::interpreter::Interpreter;
use crate::token::Token;
use log::{debug, info};
use std::collections::HashMap;
use std::rc::Rc;

/// Are we inside a user function?  Used to validate `c:`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
}

/// Resolver: tracks scopes, enforces static rules, and *records* binding
/// distances by calling back into the interpreter.
pub struct Resolver<'interp> {
    interpreter: &'interp mut Interpreter,
    ast: Rc<Ast>,
    scopes: Vec<HashMap<Rc<str>, bool>>, // false=declared, true=defined
    current_function: FunctionType,
    errors: Vec<NyaError>,
}

impl<'interp> Resolver<'interp> {
    /// Create a new resolver bound to the given interpreter.
    pub fn new(interpreter: &'interp mut Interpreter) -> Self {
        info!("Resolver instantiated");

        let ast = interpreter.ast();

        Resolver {
            interpreter,
            ast,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            errors: Vec::new(),
        }
    }

    /// Walk all top‑level statements and return every static diagnostic.
    pub fn resolve(mut self, statements: &[Stmt]) -> Vec<NyaError> {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        self.resolve_stmts(statements);

        self.errors
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_stmts(statements);
                self.end_scope();
            }

            Stmt::Var { name, initializer } => {
                // declare → resolve initializer → define
                self.declare(name);
                if let Some(expr) = initializer {
                    self.resolve_expr(*expr);
                }
                self.define(name);
            }

            Stmt::Function(declaration) => {
                // The name is visible inside its own body (recursion).
                self.declare(&declaration.name);
                self.define(&declaration.name);
                self.resolve_function(declaration);
            }

            Stmt::Expression(expr) | Stmt::Print(expr) => {
                self.resolve_expr(*expr);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(*condition);
                self.resolve_stmt(then_branch);
                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb);
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(*condition);
                self.resolve_stmt(body);
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.error(NyaError::resolve(
                        keyword,
                        "Can't return from top-level code.",
                    ));
                }
                if let Some(expr) = value {
                    self.resolve_expr(*expr);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, id: ExprId) {
        let ast = Rc::clone(&self.ast);

        match &ast[id] {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => self.resolve_expr(*inner),

            Expr::Unary { right, .. } => self.resolve_expr(*right),

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(*left);
                self.resolve_expr(*right);
            }

            Expr::Variable { name } => {
                let in_own_initializer = self
                    .scopes
                    .last()
                    .and_then(|scope| scope.get(&name.lexeme))
                    == Some(&false);

                if in_own_initializer {
                    self.error(NyaError::resolve(
                        name,
                        "Can't read local variable in its own initializer.",
                    ));
                }

                self.resolve_local(id, name);
            }

            Expr::Assign { name, value } => {
                // First resolve RHS, then bind LHS
                self.resolve_expr(*value);
                self.resolve_local(id, name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(*callee);
                for arg in arguments {
                    self.resolve_expr(*arg);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function's parameters + body.
    fn resolve_function(&mut self, declaration: &FunctionDecl) {
        let enclosing = self.current_function;
        self.current_function = FunctionType::Function;

        self.begin_scope();
        for param in &declaration.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&declaration.body);
        self.end_scope();

        self.current_function = enclosing;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else {
            return; // globals may be redefined freely
        };

        if scope.contains_key(&name.lexeme) {
            self.error(NyaError::resolve(
                name,
                "Already a variable with this name in this scope.",
            ));
            return;
        }

        scope.insert(Rc::clone(&name.lexeme), false);
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(Rc::clone(&name.lexeme), true);
        }
    }

    fn error(&mut self, error: NyaError) {
        debug!("Resolve error: {}", error);
        self.errors.push(error);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding‑distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this variable occurrence as a local at depth `d`, or leave it
    /// unrecorded (global) if not found in *any* scope.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                debug!("Resolved '{}' at depth {}", name.lexeme, depth);
                self.interpreter.resolve(id, depth);
                return;
            }
        }

        debug!("Resolved '{}' as global", name.lexeme);
    }
}
