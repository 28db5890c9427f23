use std::fmt;
use std::rc::Rc;

use crate::callable::Callable;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Bool(bool),
    Nil,
    /// User functions and natives alike.
    Callable(Rc<dyn Callable>),
}

impl Value {
    /// `nuww` and `fawse` are falsy; everything else, `0` and `""` included,
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    /// Name reported by `typeof`; matches the type keywords of the language.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Numbew",
            Value::String(_) => "Stwing",
            Value::Bool(_) => "Boowean",
            Value::Nil => "nuww",
            Value::Callable(_) => "Function",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            // NaN equals NaN here; ordering comparisons stay IEEE.
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.identity() == b.identity(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                let negative_zero = *n == 0.0 && n.is_sign_negative();

                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 && !negative_zero {
                    let mut buf = itoa::Buffer::new();
                    write!(f, "{}", buf.format(*n as i64))
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::String(s) => write!(f, "{}", s),

            Value::Bool(true) => write!(f, "twue"),

            Value::Bool(false) => write!(f, "fawse"),

            Value::Nil => write!(f, "nuww"),

            Value::Callable(c) => write!(f, "{}", c),
        }
    }
}
