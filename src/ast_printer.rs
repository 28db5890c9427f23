use crate::ast::{Ast, Expr, ExprId, LiteralValue, Stmt};

/// Renders nodes in parenthesized prefix form, e.g. `(+.+ 1 (+.* 2 3))`.
/// Operators print with their nya lexemes.
pub struct AstPrinter<'a> {
    ast: &'a Ast,
}

impl<'a> AstPrinter<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self { ast }
    }

    pub fn print_expr(&self, id: ExprId) -> String {
        match &self.ast[id] {
            // ── literals ────────────────────────────────────────────────
            Expr::Literal(lit) => match lit {
                LiteralValue::Bool(true) => "twue".into(),

                LiteralValue::Bool(false) => "fawse".into(),

                LiteralValue::Nil => "nuww".into(),

                LiteralValue::Str(s) => format!("\"{}\"", s),

                LiteralValue::Number(n) => n.to_string(),
            },

            // ── grouping ────────────────────────────────────────────────
            Expr::Grouping(inner) => format!("(group {})", self.print_expr(*inner)),

            // ── unary operator ──────────────────────────────────────────
            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, self.print_expr(*right))
            }

            // ── binary / logical operator ───────────────────────────────
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                self.print_expr(*left),
                self.print_expr(*right)
            ),

            // ── variable / assign / call ────────────────────────────────
            Expr::Variable { name } => name.lexeme.to_string(),

            Expr::Assign { name, value } => {
                format!("(o/ {} {})", name.lexeme, self.print_expr(*value))
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let mut s = format!("(call {}", self.print_expr(*callee));
                for arg in arguments {
                    s.push(' ');
                    s.push_str(&self.print_expr(*arg));
                }
                s.push(')');
                s
            }
        }
    }

    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(; {})", self.print_expr(*expr)),

            Stmt::Print(expr) => format!("(pwint {})", self.print_expr(*expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(>.< {} {})", name.lexeme, self.print_expr(*init)),
                None => format!("(>.< {})", name.lexeme),
            },

            Stmt::Block(statements) => self.sequence("block", statements),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(^u^ {} {} {})",
                    self.print_expr(*condition),
                    self.print_stmt(then_branch),
                    self.print_stmt(else_branch)
                ),
                None => format!(
                    "(^u^ {} {})",
                    self.print_expr(*condition),
                    self.print_stmt(then_branch)
                ),
            },

            Stmt::While { condition, body } => format!(
                "(^w^ {} {})",
                self.print_expr(*condition),
                self.print_stmt(body)
            ),

            Stmt::Function(declaration) => {
                let params: Vec<&str> = declaration.params.iter().map(|p| &*p.lexeme).collect();
                let mut s = format!("(:D {} ({})", declaration.name.lexeme, params.join(" "));
                for stmt in &declaration.body {
                    s.push(' ');
                    s.push_str(&self.print_stmt(stmt));
                }
                s.push(')');
                s
            }

            Stmt::Return { value, .. } => match value {
                Some(value) => format!("(c: {})", self.print_expr(*value)),
                None => "(c:)".into(),
            },
        }
    }

    fn sequence(&self, head: &str, statements: &[Stmt]) -> String {
        let mut s = format!("({}", head);
        for stmt in statements {
            s.push(' ');
            s.push_str(&self.print_stmt(stmt));
        }
        s.push(')');
        s
    }
}
