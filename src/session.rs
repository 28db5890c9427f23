//! Drives one source text through scan → parse → resolve → execute.
//!
//! A [`Session`] owns a single [`Interpreter`], so globals, closures and the
//! resolved-distance table survive from one [`Session::run`] to the next.
//! This is what makes the REPL stateful.

use log::{debug, info};

use crate::error::NyaError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::reporter::Reporter;
use crate::resolver::Resolver;
use crate::scanner;

/// Outcome of one [`Session::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Everything executed.
    Ok,

    /// Scanning, parsing or resolution reported at least one diagnostic.
    /// Nothing was executed.
    StaticError,

    /// Execution stopped at a runtime error.  Earlier statements (and their
    /// output) stand.
    RuntimeError,
}

pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    /// A session over a fresh interpreter with the standard natives.
    pub fn new(reporter: Box<dyn Reporter>) -> Self {
        Self::with_interpreter(Interpreter::new(reporter))
    }

    pub fn with_interpreter(interpreter: Interpreter) -> Self {
        info!("Session created");
        Self { interpreter }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Run `source` to completion, reporting every diagnostic.
    pub fn run(&mut self, source: &str) -> RunStatus {
        info!("Running {} byte(s) of source", source.len());

        let (tokens, mut errors) = scanner::scan(source);

        let parsed = Parser::new(&tokens, self.interpreter.ast_mut()).parse();
        errors.extend(parsed.errors);
        debug!("Arena holds {} expression node(s)", self.interpreter.ast().len());

        // A failed declaration leaves a hole; the diagnostic for it is
        // already in `errors`.
        let statements: Vec<_> = parsed.statements.into_iter().flatten().collect();

        if !errors.is_empty() {
            return self.static_failure(&errors);
        }

        let errors = Resolver::new(&mut self.interpreter).resolve(&statements);

        if !errors.is_empty() {
            return self.static_failure(&errors);
        }

        match self.interpreter.interpret(&statements) {
            Ok(()) => RunStatus::Ok,

            Err(e) => {
                debug!("Runtime error: {}", e);
                self.interpreter.reporter().error(&e.to_string());
                RunStatus::RuntimeError
            }
        }
    }

    fn static_failure(&mut self, errors: &[NyaError]) -> RunStatus {
        info!("Run aborted with {} static error(s)", errors.len());

        let reporter = self.interpreter.reporter();
        for error in errors {
            reporter.error(&error.to_string());
        }

        RunStatus::StaticError
    }
}
