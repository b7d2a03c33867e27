//! Compiled, invocable units.

use std::fmt;
use std::sync::Arc;

use framekit_eval::{EvalError, EvalResult, Value};

use crate::entry::{EntryPoint, EntryShape};

/// Backend-specific executable code behind an [`Artifact`].
///
/// Implementations hold no per-call state; every call starts fresh.
pub trait Invocable: Send + Sync {
    /// Run the compiled method with positional arguments.
    fn invoke(&self, args: &[Value]) -> EvalResult<Value>;
}

/// A compiled method, callable only through its declared entry point.
///
/// Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct Artifact {
    entry: EntryPoint,
    source: Arc<str>,
    code: Arc<dyn Invocable>,
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("entry", &self.entry)
            .field("source_len", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl Artifact {
    pub fn new(entry: EntryPoint, source: &str, code: impl Invocable + 'static) -> Self {
        Self {
            entry,
            source: Arc::from(source),
            code: Arc::new(code),
        }
    }

    pub fn entry(&self) -> &EntryPoint {
        &self.entry
    }

    /// The source text this artifact was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Zero-argument build call.
    pub fn build(&self) -> EvalResult<Value> {
        self.require(EntryShape::Build)?;
        self.code.invoke(&[])
    }

    /// N-argument construct-and-return call.
    pub fn create(&self, args: &[Value]) -> EvalResult<Value> {
        let EntryShape::Create { arity } = self.entry.shape else {
            return Err(self.mismatch("create"));
        };
        if args.len() != arity {
            return Err(EvalError::ArgumentMismatch {
                method: self.entry.method_name.clone(),
                expected: arity,
                found: args.len(),
            });
        }
        self.code.invoke(args)
    }

    /// One-argument void action call.
    pub fn act(&self, arg: Value) -> EvalResult<()> {
        self.require(EntryShape::Action)?;
        self.code.invoke(&[arg]).map(|_| ())
    }

    fn require(&self, shape: EntryShape) -> EvalResult<()> {
        if self.entry.shape == shape {
            Ok(())
        } else {
            Err(self.mismatch(&shape.to_string()))
        }
    }

    fn mismatch(&self, requested: &str) -> EvalError {
        EvalError::EntryPointMismatch {
            method: self.entry.method_name.clone(),
            actual: self.entry.shape.to_string(),
            requested: requested.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Invocable for Echo {
        fn invoke(&self, args: &[Value]) -> EvalResult<Value> {
            Ok(args.first().cloned().unwrap_or(Value::Int(args.len() as i32)))
        }
    }

    #[test]
    fn calls_go_through_declared_entry_only() {
        let artifact = Artifact::new(EntryPoint::create("Create", 1), "src", Echo);
        assert_eq!(artifact.create(&[Value::Int(7)]).unwrap(), Value::Int(7));
        assert!(matches!(
            artifact.build(),
            Err(EvalError::EntryPointMismatch { .. })
        ));
        assert!(matches!(
            artifact.create(&[]),
            Err(EvalError::ArgumentMismatch { expected: 1, found: 0, .. })
        ));
    }

    #[test]
    fn action_discards_result() {
        let artifact = Artifact::new(EntryPoint::action("Act"), "src", Echo);
        assert_eq!(artifact.act(Value::Int(1)), Ok(()));
        assert_eq!(artifact.source(), "src");
        assert!(artifact.create(&[Value::Null]).is_err());
    }

    #[test]
    fn artifact_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Artifact>();
    }
}
