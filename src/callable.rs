//! Things that can be called: user functions (closures) and host natives.
//!
//! The interpreter checks arity before dispatching, so implementations may
//! index `arguments` freely up to [`Callable::arity`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::ast::FunctionDecl;
use crate::environment::Environment;
use crate::error::{NyaError, Result};
use crate::interpreter::{Flow, Interpreter};
use crate::token::Token;
use crate::value::Value;

/// Signature of a host‑provided procedure.  A plain message error is turned
/// into a runtime diagnostic at the call site.
pub type NativeFn = fn(&mut Interpreter, &[Value]) -> std::result::Result<Value, String>;

pub trait Callable: fmt::Debug + fmt::Display {
    fn name(&self) -> &str;

    fn arity(&self) -> usize;

    /// Two callables are the same function when their identities match.
    fn identity(&self) -> (usize, usize);

    /// Invoke with exactly `arity()` arguments.  `paren` is the closing
    /// parenthesis of the call, used for diagnostics.
    fn call(&self, interpreter: &mut Interpreter, paren: &Token, arguments: Vec<Value>)
        -> Result<Value>;
}

/// A function declared in nya source, closed over its defining environment.
#[derive(Debug)]
pub struct UserFunction {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
}

impl UserFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>) -> Self {
        Self {
            declaration,
            closure,
        }
    }
}

impl Callable for UserFunction {
    fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Same declaration closed over the same scope.
    fn identity(&self) -> (usize, usize) {
        (
            Rc::as_ptr(&self.declaration) as usize,
            Rc::as_ptr(&self.closure) as usize,
        )
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        _paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        // Lexical scoping: the new frame hangs off the closure, not the caller.
        let mut environment = Environment::with_enclosing(Rc::clone(&self.closure));

        for (param, value) in self.declaration.params.iter().zip(arguments) {
            debug!("Binding parameter '{}' to {}", param.lexeme, value);
            environment.define(&param.lexeme, value);
        }

        let flow = interpreter.execute_block(
            &self.declaration.body,
            Rc::new(RefCell::new(environment)),
        )?;

        Ok(match flow {
            Flow::Returning(value) => value,
            Flow::Completed => Value::Nil,
        })
    }
}

impl fmt::Display for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A host procedure exposed to nya code under a global name.
#[derive(Debug, Clone)]
pub struct NativeFunction {
    name: String,
    arity: usize,
    func: NativeFn,
}

impl NativeFunction {
    pub fn new<S: Into<String>>(name: S, arity: usize, func: NativeFn) -> Self {
        Self {
            name: name.into(),
            arity,
            func,
        }
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn identity(&self) -> (usize, usize) {
        (self as *const Self as usize, 0)
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        (self.func)(interpreter, &arguments).map_err(|message| NyaError::runtime(paren, message))
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
