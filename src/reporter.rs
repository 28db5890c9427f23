//! Where printed values and diagnostics go.
//!
//! The pipeline never writes to stdout/stderr directly; it hands text to a
//! [`Reporter`] owned by the interpreter.

use std::cell::RefCell;
use std::rc::Rc;

pub trait Reporter {
    /// One line per executed `pwint` statement.
    fn print(&mut self, text: &str);

    /// One already‑formatted diagnostic (static or runtime).
    fn error(&mut self, message: &str);
}

/// Writes prints to stdout and diagnostics to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn print(&mut self, text: &str) {
        println!("{}", text);
    }

    fn error(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

#[derive(Debug, Default)]
struct Captured {
    prints: Vec<String>,
    errors: Vec<String>,
}

/// Buffers everything in memory.  Clones share one buffer, so a test can
/// hand one clone to the interpreter and inspect the other.
#[derive(Debug, Default, Clone)]
pub struct CapturedOutput {
    inner: Rc<RefCell<Captured>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prints(&self) -> Vec<String> {
        self.inner.borrow().prints.clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.inner.borrow().errors.clone()
    }

    /// Drop everything captured so far.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.prints.clear();
        inner.errors.clear();
    }
}

impl Reporter for CapturedOutput {
    fn print(&mut self, text: &str) {
        self.inner.borrow_mut().prints.push(text.to_string());
    }

    fn error(&mut self, message: &str) {
        self.inner.borrow_mut().errors.push(message.to_string());
    }
}
