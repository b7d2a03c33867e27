//! Runtime error types for the framekit interpreter.

use framekit_types::TypeName;
use thiserror::Error;

/// A failure while executing a compiled method.
///
/// [`EvalError::Thrown`] is raised by native behaviors and reaches the
/// artifact caller unchanged. The other variants are traps that a checked
/// method can only hit through a misconfigured [`Runtime`](crate::Runtime).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Raised by a native constructor, method, or disposal hook.
    #[error("{0}")]
    Thrown(String),

    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("unknown type: {0}")]
    UnknownType(TypeName),

    #[error("no constructor of '{ty}' accepts ({found})")]
    NoMatchingConstructor { ty: TypeName, found: String },

    #[error("'{ty}' has no member '{member}'")]
    UnknownMember { ty: TypeName, member: String },

    #[error("'{ty}' has no method '{method}'")]
    UnknownMethod { ty: TypeName, method: String },

    /// The catalog describes the method but no native behavior implements it.
    #[error("no behavior registered for {ty}.{method}")]
    MissingBehavior { ty: TypeName, method: String },

    #[error("null reference: {0}")]
    NullReference(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("{method} expects {expected} argument(s), got {found}")]
    ArgumentMismatch {
        method: String,
        expected: usize,
        found: usize,
    },

    /// An artifact was invoked through an entry point it was not built for.
    #[error("'{method}' is a {actual} entry point, not {requested}")]
    EntryPointMismatch {
        method: String,
        actual: String,
        requested: String,
    },
}

impl EvalError {
    /// Convenience for native behaviors signalling a failure.
    pub fn thrown(message: impl Into<String>) -> Self {
        Self::Thrown(message.into())
    }
}

/// Result alias for interpreter operations.
pub type EvalResult<T> = Result<T, EvalError>;
