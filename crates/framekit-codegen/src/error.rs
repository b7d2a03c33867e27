//! Codegen error types.

use framekit_types::TypeName;
use thiserror::Error;

/// Errors raised while building frames or assembling a method.
///
/// Frame-construction errors (`ConstructorNotFound`, `ParameterIndexOutOfRange`,
/// `LiteralTypeMismatch`, `UnknownType`, `NotDisposable`, `MemberNotFound`,
/// `MethodNotFound`) surface before
/// assembly starts. The rest are raised by the assembler, which never emits
/// partial source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    /// No constructor overload matches the requested ordered parameter types.
    #[error("no constructor of '{ty}' matches ({signature})")]
    ConstructorNotFound { ty: TypeName, signature: String },

    /// An override targets a slot outside the selected signature.
    #[error("parameter index {index} is out of range for {target} (arity {arity})")]
    ParameterIndexOutOfRange {
        target: String,
        index: usize,
        arity: usize,
    },

    /// A literal cannot stand in for the parameter or member it was bound to.
    #[error("literal {literal} cannot be used as '{expected}' in {target}")]
    LiteralTypeMismatch {
        target: String,
        expected: TypeName,
        literal: String,
    },

    #[error("'{ty}' is not in the type catalog")]
    UnknownType { ty: TypeName },

    /// A disposal scope was requested for a type that cannot be disposed.
    #[error("'{ty}' is not disposable and cannot open a using scope")]
    NotDisposable { ty: TypeName },

    #[error("'{ty}' has no settable member '{member}'")]
    MemberNotFound { ty: TypeName, member: String },

    #[error("'{ty}' has no method '{method}'")]
    MethodNotFound { ty: TypeName, method: String },

    /// A consumed value has no producing frame and no matching external input.
    #[error("{frame} needs a '{ty}' but no frame produces one and no input matches")]
    MissingInput { frame: String, ty: TypeName },

    /// No frame is ready while some remain unordered.
    #[error("circular dependency between {}", .frames.join(", "))]
    CircularDependency { frames: Vec<String> },

    /// The method's terminal disposition is ambiguous or contradicts its result type.
    #[error("invalid method shape for '{method}': {reason}")]
    InvalidMethodShape { method: String, reason: String },
}

/// Codegen result type alias.
pub type CodegenResult<T> = Result<T, CodegenError>;
