use crate::ast::FunctionDecl;
use crate::callable::UserFunction;
use crate::error::{NyaError, Result};
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// What a name is bound to inside one scope.
#[derive(Debug)]
enum Binding {
    Value(Value),

    /// A function declared in this very scope.  Only the declaration is
    /// stored; the closure is this scope and is attached on every read, so
    /// the scope never owns a strong reference to itself.
    Function(Rc<FunctionDecl>),
}

impl Binding {
    /// Materialize the bound value.  `scope` must be the environment that
    /// holds this binding.
    fn load(&self, scope: &Rc<RefCell<Environment>>) -> Value {
        match self {
            Binding::Value(value) => value.clone(),
            Binding::Function(declaration) => Value::Callable(Rc::new(UserFunction::new(
                Rc::clone(declaration),
                Rc::clone(scope),
            ))),
        }
    }
}

/// One lexical scope at run time.
///
/// Scopes form a tree rooted at the globals.  `enclosing` is fixed at
/// construction; sibling blocks and closures may share the same parent.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Binding>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind `name` in this scope, replacing any previous binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), Binding::Value(value));
    }

    /// Bind a function declared in this scope, closing over this scope.
    pub fn define_function(&mut self, declaration: Rc<FunctionDecl>) {
        let name = declaration.name.lexeme.to_string();
        self.values.insert(name, Binding::Function(declaration));
    }

    /// Dynamic lookup through the whole chain starting at `env`.  Used for
    /// unresolved (global) references.
    pub fn get(env: &Rc<RefCell<Environment>>, name: &Token) -> Result<Value> {
        let mut current = Rc::clone(env);

        loop {
            let next = {
                let scope = current.borrow();

                if let Some(binding) = scope.values.get(&*name.lexeme) {
                    return Ok(binding.load(&current));
                }

                scope.enclosing.clone()
            };

            match next {
                Some(parent) => current = parent,
                None => return Err(undefined(name)),
            }
        }
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&*name.lexeme) {
            *slot = Binding::Value(value);
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// The scope `distance` hops up from `env`.
    pub fn ancestor(env: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut current = Rc::clone(env);

        for _ in 0..distance {
            let next = current.borrow().enclosing.clone();

            match next {
                Some(parent) => current = parent,
                None => break,
            }
        }

        current
    }

    /// Read a resolved binding exactly `distance` hops up.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token) -> Result<Value> {
        let scope = Self::ancestor(env, distance);
        let value = scope
            .borrow()
            .values
            .get(&*name.lexeme)
            .map(|binding| binding.load(&scope));

        value.ok_or_else(|| undefined(name))
    }

    /// Overwrite a resolved binding exactly `distance` hops up.
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &Token,
        value: Value,
    ) -> Result<()> {
        let target = Self::ancestor(env, distance);
        let mut target = target.borrow_mut();

        match target.values.get_mut(&*name.lexeme) {
            Some(slot) => {
                *slot = Binding::Value(value);
                Ok(())
            }
            None => Err(undefined(name)),
        }
    }
}

fn undefined(name: &Token) -> NyaError {
    NyaError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}
