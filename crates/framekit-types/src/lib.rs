//! Shared types for framekit.
//!
//! Spans and diagnostics, the static type catalog consulted by both the
//! frame assembler and the backend, literal values, and the AST of the
//! emitted method language.

mod error;
mod span;
pub mod ast;
pub mod catalog;
pub mod literal;

pub use catalog::{
    ConstructorDescriptor, MemberDescriptor, MethodDescriptor, ParameterDescriptor, Primitive,
    TypeCatalog, TypeDescriptor, TypeName,
};
pub use error::{Diagnostic, Diagnostics, ErrorCategory, ErrorCode, MAX_ERRORS};
pub use literal::Literal;
pub use span::{SourceFile, Span};

/// Reserved words of the emitted language. Never valid as variable names.
pub const KEYWORDS: &[&str] = &[
    "public", "void", "var", "new", "return", "using", "true", "false", "null",
];

/// Whether `name` is a reserved word of the emitted language.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}
