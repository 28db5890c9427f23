//! Tree‑walking evaluator.
//!
//! Statements run against a persistent global environment so that repeated
//! calls to [`Interpreter::interpret`] (one per REPL line) see each other's
//! definitions.  Variable references consult the distance table filled in by
//! the [`Resolver`](crate::resolver::Resolver); a missing entry means "global".
//!
//! Function returns travel as [`Flow::Returning`] through the statement
//! executor instead of through the error channel, so `?` only ever
//! propagates genuine runtime errors.

use std::cell::RefCell;
use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Ast, Expr, ExprId, LiteralValue, Stmt};
use crate::callable::{Callable, NativeFunction};
use crate::environment::Environment;
use crate::error::{NyaError, Result};
use crate::natives;
use crate::reporter::Reporter;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Nesting limit for user function calls.  Runaway recursion stops here
/// with a runtime error instead of exhausting memory.
pub const MAX_CALL_DEPTH: usize = 5_000;

/// Grow the host stack when less than this much is left.
const RED_ZONE: usize = 128 * 1024;

/// Size of each stack segment allocated on growth.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f` with at least [`RED_ZONE`] bytes of stack available.  Evaluation
/// depth follows the nesting of the program, not the thread's stack size.
#[inline]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Fell through to the next statement.
    Completed,

    /// A `c:` is unwinding to the nearest function call.
    Returning(Value),
}

pub struct Interpreter {
    ast: Rc<Ast>,
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<ExprId, usize>,
    reporter: Box<dyn Reporter>,
    call_depth: usize,
}

impl Interpreter {
    /// Creates a new Interpreter with the standard natives (`clock`,
    /// `typeof`, `uwuify`).
    pub fn new(reporter: Box<dyn Reporter>) -> Self {
        Self::with_natives(reporter, natives::standard())
    }

    /// Creates a new Interpreter whose global environment is seeded with
    /// exactly `natives`.
    pub fn with_natives(reporter: Box<dyn Reporter>, natives: Vec<NativeFunction>) -> Self {
        info!("Initializing Interpreter with {} native(s)", natives.len());

        let globals = Rc::new(RefCell::new(Environment::new()));

        let mut interpreter = Self {
            ast: Rc::new(Ast::new()),
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            reporter,
            call_depth: 0,
        };

        for native in natives {
            interpreter.define_native(native);
        }

        interpreter
    }

    /// Install (or replace) a global native binding.
    pub fn define_native(&mut self, native: NativeFunction) {
        debug!("Defining native function '{}'", native.name());

        let name = native.name().to_string();
        self.globals
            .borrow_mut()
            .define(&name, Value::Callable(Rc::new(native)));
    }

    /// The expression arena new source text is parsed into.
    pub fn ast_mut(&mut self) -> &mut Ast {
        Rc::make_mut(&mut self.ast)
    }

    /// Shared handle on the arena, for passes that walk it alongside the
    /// interpreter.
    pub fn ast(&self) -> Rc<Ast> {
        Rc::clone(&self.ast)
    }

    /// Record that the reference `id` binds `depth` scopes up.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Scope distance recorded for `id`, `None` for globals.
    pub fn resolved_depth(&self, id: ExprId) -> Option<usize> {
        self.locals.get(&id).copied()
    }

    pub fn reporter(&mut self) -> &mut dyn Reporter {
        self.reporter.as_mut()
    }

    /// Current value of a global binding, if any.
    pub fn global(&self, name: &str) -> Option<Value> {
        let token = Token::new(TokenType::IDENTIFIER, name, 0);
        Environment::get(&self.globals, &token).ok()
    }

    /// Interprets a list of statements (a "program").  The first runtime
    /// error aborts the rest; statements already executed stay executed.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            self.execute(stmt)?;
        }

        info!("Interpretation completed successfully");
        Ok(())
    }

    // ───────────────────────────── statements ──────────────────────────────

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        ensure_sufficient_stack(|| self.execute_stmt(stmt))
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(*expr)?;
                Ok(Flow::Completed)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(*expr)?;
                let text = value.to_string();
                info!("Printed value: {}", text);
                self.reporter.print(&text);
                Ok(Flow::Completed)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(*expr)?,
                    None => Value::Nil,
                };
                debug!("Defining variable '{}' = {}", name.lexeme, value);
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Completed)
            }

            Stmt::Block(statements) => {
                let scope = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, Rc::new(RefCell::new(scope)))
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(*condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Completed)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(*condition)?.is_truthy() {
                    if let Flow::Returning(value) = self.execute(body)? {
                        return Ok(Flow::Returning(value));
                    }
                }
                Ok(Flow::Completed)
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);
                self.environment
                    .borrow_mut()
                    .define_function(Rc::clone(declaration));
                Ok(Flow::Completed)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(*expr)?,
                    None => Value::Nil,
                };
                debug!("Returning value: {}", value);
                Ok(Flow::Returning(value))
            }
        }
    }

    /// Run `statements` in `environment`, restoring the previous environment
    /// on every exit path (fall‑through, return or error).
    pub(crate) fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Flow> {
        let previous = mem::replace(&mut self.environment, environment);
        let result = self.execute_all(statements);
        self.environment = previous;
        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> Result<Flow> {
        for stmt in statements {
            if let Flow::Returning(value) = self.execute(stmt)? {
                return Ok(Flow::Returning(value));
            }
        }
        Ok(Flow::Completed)
    }

    // ───────────────────────────── expressions ─────────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, id: ExprId) -> Result<Value> {
        ensure_sufficient_stack(|| self.evaluate_expr(id))
    }

    fn evaluate_expr(&mut self, id: ExprId) -> Result<Value> {
        let ast = Rc::clone(&self.ast);

        match &ast[id] {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(*inner),

            Expr::Variable { name } => self.look_up_variable(name, id),

            Expr::Assign { name, value } => {
                let value = self.evaluate(*value)?;

                match self.locals.get(&id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                debug!("Assigned value {} to '{}'", value, name.lexeme);
                Ok(value)
            }

            Expr::Unary { operator, right } => {
                let right = self.evaluate(*right)?;

                match operator.token_type {
                    TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),
                    TokenType::MINUS => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(NyaError::runtime(
                            operator,
                            format!("Operand of '{}' must be a number.", operator.lexeme),
                        )),
                    },
                    _ => Err(NyaError::runtime(operator, "Invalid unary operator.")),
                }
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(*left)?;

                let short_circuit = if operator.token_type == TokenType::OR {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(*right)
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(*left)?;
                let right = self.evaluate(*right)?;
                binary(operator, left, right)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(*callee)?;

                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(*argument)?);
                }

                self.call_value(callee, paren, values)
            }
        }
    }

    fn look_up_variable(&self, name: &Token, id: ExprId) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => Environment::get(&self.globals, name),
        }
    }

    /// Invokes a callable (native or user‑defined function).
    fn call_value(&mut self, callee: Value, paren: &Token, arguments: Vec<Value>) -> Result<Value> {
        let Value::Callable(function) = callee else {
            return Err(NyaError::runtime(paren, "Can only call functions."));
        };

        if arguments.len() != function.arity() {
            return Err(NyaError::runtime(
                paren,
                format!(
                    "Expected {} arguments but got {}.",
                    function.arity(),
                    arguments.len()
                ),
            ));
        }

        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(NyaError::runtime(paren, "Stack overflow."));
        }

        debug!("Calling '{}' with {} argument(s)", function.name(), arguments.len());

        self.call_depth += 1;
        let result = function.call(self, paren, arguments);
        self.call_depth -= 1;

        result
    }
}

fn number_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(NyaError::runtime(
            operator,
            format!("Operands of '{}' must be numbers.", operator.lexeme),
        )),
    }
}

/// Arithmetic, comparison and equality.  Both operands are already evaluated.
fn binary(operator: &Token, left: Value, right: Value) -> Result<Value> {
    match operator.token_type {
        TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left == right)),
        TokenType::BANG_EQUAL => return Ok(Value::Bool(left != right)),
        TokenType::PLUS => {
            return match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(_), _) | (_, Value::String(_)) => {
                    Ok(Value::String(format!("{}{}", left, right)))
                }
                _ => Err(NyaError::runtime(
                    operator,
                    format!(
                        "Operands of '{}' must be numbers, or one must be a string.",
                        operator.lexeme
                    ),
                )),
            };
        }
        _ => {}
    }

    let (a, b) = number_operands(operator, &left, &right)?;

    match operator.token_type {
        TokenType::MINUS => Ok(Value::Number(a - b)),
        TokenType::STAR => Ok(Value::Number(a * b)),
        TokenType::SLASH => Ok(Value::Number(a / b)),
        TokenType::PERCENT => Ok(Value::Number(a % b)),
        TokenType::GREATER => Ok(Value::Bool(a > b)),
        TokenType::GREATER_EQUAL => Ok(Value::Bool(a >= b)),
        TokenType::LESS => Ok(Value::Bool(a < b)),
        TokenType::LESS_EQUAL => Ok(Value::Bool(a <= b)),
        _ => Err(NyaError::runtime(operator, "Invalid binary operator.")),
    }
}
