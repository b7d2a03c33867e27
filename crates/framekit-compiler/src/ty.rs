//! Static types seen by the checker.
//!
//! [`Type`] is the semantic type of an expression. It is distinct from
//! [`TypeRef`](framekit_types::ast::TypeRef), the syntactic name the parser
//! produces.

use std::fmt;

use framekit_types::{Literal, TypeCatalog, TypeName};

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// A catalog type, primitive or not.
    Named(TypeName),
    /// The type of the `null` literal.
    Null,
    /// Calls to methods that return nothing.
    Void,
    /// Could not be determined; an error was already reported.
    Unknown,
}

impl Type {
    pub fn of_literal(literal: &Literal) -> Self {
        match literal.primitive() {
            Some(p) => Type::Named(p.type_name()),
            None => Type::Null,
        }
    }

    /// Whether a value of this type may be stored in a slot of `target`.
    ///
    /// `Unknown` is assignable everywhere so one error is not reported twice.
    pub fn is_assignable_to(&self, target: &TypeName, catalog: &TypeCatalog) -> bool {
        match self {
            Type::Unknown => true,
            Type::Void => false,
            Type::Null => target.primitive().map_or(true, |p| p.is_nullable()),
            Type::Named(name) => catalog.is_assignable(name, target),
        }
    }

    /// The catalog name, for `Named` types.
    pub fn name(&self) -> Option<&TypeName> {
        match self {
            Type::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(name) => write!(f, "{name}"),
            Type::Null => f.write_str("null"),
            Type::Void => f.write_str("void"),
            Type::Unknown => f.write_str("<unknown>"),
        }
    }
}
