//! Typed, named intermediate values.

use framekit_types::TypeName;
use serde::Serialize;

/// A value flowing through a generated method: either a method parameter
/// (external input) or a local produced by a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    /// Declared type as advertised to consuming frames.
    pub ty: TypeName,
    /// Generated name. Stable once assigned.
    pub name: String,
    /// Number of dependency slots bound to this variable.
    pub usages: usize,
}

impl Variable {
    pub fn new(ty: TypeName, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
            usages: 0,
        }
    }

    pub fn is_used(&self) -> bool {
        self.usages > 0
    }
}
