//! The compiler-backend contract and the reference interpreting backend.

use std::sync::Arc;

use framekit_eval::{EvalResult, Interpreter, Overloads, Runtime, Value};
use framekit_types::ast::MethodDecl;
use framekit_types::{Diagnostics, SourceFile};

use crate::artifact::{Artifact, Invocable};
use crate::checker::Checker;
use crate::entry::EntryPoint;
use crate::error::CompilationError;

/// Turns generated source into an invocable [`Artifact`].
///
/// The assembler depends only on this trait; any backend that accepts the
/// emitted language can stand behind it.
pub trait CompilerBackend: Send + Sync {
    fn compile(&self, source: &str, entry: &EntryPoint) -> Result<Artifact, CompilationError>;
}

/// A method that passed the front end.
#[derive(Debug, Clone)]
pub struct CheckedMethod {
    pub method: MethodDecl,
    /// The constructor overload each `new` expression was resolved to.
    pub overloads: Overloads,
}

/// Reference backend: parses and checks the source, then interprets it.
#[derive(Debug, Clone)]
pub struct InterpretingBackend {
    runtime: Arc<Runtime>,
}

impl InterpretingBackend {
    pub fn new(runtime: Runtime) -> Self {
        Self::shared(Arc::new(runtime))
    }

    pub fn shared(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Front end only: parse and statically check `source` for `entry`.
    pub fn check(
        &self,
        source: &str,
        entry: &EntryPoint,
    ) -> Result<CheckedMethod, CompilationError> {
        let file = SourceFile::new(entry.method_name.clone(), source);
        let parsed = framekit_parser::parse_source(&file);
        let fail = |diagnostics: Diagnostics| {
            CompilationError::new(&entry.method_name, source, diagnostics)
        };

        let method = match parsed.method {
            Some(method) if !parsed.errors.has_errors() => method,
            _ => return Err(fail(parsed.errors)),
        };

        let mut errors = Diagnostics::empty();
        let overloads =
            Checker::new(self.runtime.catalog(), &file, &mut errors).check(&method, entry);
        if errors.has_errors() {
            return Err(fail(errors));
        }
        Ok(CheckedMethod { method, overloads })
    }
}

impl CompilerBackend for InterpretingBackend {
    #[tracing::instrument(level = "debug", skip_all, fields(entry = %entry))]
    fn compile(&self, source: &str, entry: &EntryPoint) -> Result<Artifact, CompilationError> {
        let checked = match self.check(source, entry) {
            Ok(checked) => checked,
            Err(err) => {
                tracing::debug!(errors = err.diagnostics.total_errors, "rejected");
                return Err(err);
            }
        };
        let code = InterpretedMethod {
            runtime: Arc::clone(&self.runtime),
            checked,
        };
        Ok(Artifact::new(entry.clone(), source, code))
    }
}

/// A checked method bound to the runtime it was checked against.
struct InterpretedMethod {
    runtime: Arc<Runtime>,
    checked: CheckedMethod,
}

impl Invocable for InterpretedMethod {
    fn invoke(&self, args: &[Value]) -> EvalResult<Value> {
        Interpreter::new(&self.runtime)
            .with_overloads(&self.checked.overloads)
            .invoke(&self.checked.method, args)
    }
}
