//! Entry points: how a compiled method is invoked.

use std::fmt;

use framekit_codegen::MethodShape;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// The fixed invocation shapes an [`Artifact`](crate::Artifact) exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryShape {
    /// No parameters, returns the built value.
    Build,
    /// `arity` parameters consumed left to right, returns a value.
    Create { arity: usize },
    /// One parameter, returns nothing.
    Action,
}

impl EntryShape {
    pub fn arity(self) -> usize {
        match self {
            EntryShape::Build => 0,
            EntryShape::Create { arity } => arity,
            EntryShape::Action => 1,
        }
    }

    pub fn returns_value(self) -> bool {
        !matches!(self, EntryShape::Action)
    }
}

impl fmt::Display for EntryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryShape::Build => f.write_str("build"),
            EntryShape::Create { arity } => write!(f, "create/{arity}"),
            EntryShape::Action => f.write_str("action"),
        }
    }
}

/// The method a backend must expose, and the shape it is invoked through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryPoint {
    pub method_name: String,
    pub shape: EntryShape,
}

impl EntryPoint {
    pub fn build(method_name: impl Into<String>) -> Self {
        Self::new(method_name, EntryShape::Build)
    }

    pub fn create(method_name: impl Into<String>, arity: usize) -> Self {
        Self::new(method_name, EntryShape::Create { arity })
    }

    pub fn action(method_name: impl Into<String>) -> Self {
        Self::new(method_name, EntryShape::Action)
    }

    fn new(method_name: impl Into<String>, shape: EntryShape) -> Self {
        Self {
            method_name: method_name.into(),
            shape,
        }
    }

    /// The entry point matching a method shape's inputs and result.
    ///
    /// A method with a result is `Build` without inputs and `Create`
    /// otherwise; a `void` method must take exactly one input.
    pub fn infer(shape: &MethodShape) -> Result<Self, BuildError> {
        let inputs = shape.inputs().len();
        let entry = match (shape.result(), inputs) {
            (Some(_), 0) => EntryShape::Build,
            (Some(_), arity) => EntryShape::Create { arity },
            (None, 1) => EntryShape::Action,
            (None, n) => {
                return Err(BuildError::UnsupportedShape {
                    method: shape.name().to_string(),
                    reason: format!("a void method must take exactly one input, found {n}"),
                })
            }
        };
        Ok(Self::new(shape.name(), entry))
    }

    /// Whether a method with `params` parameters, returning a value or not,
    /// can serve this entry point.
    pub fn accepts(&self, params: usize, returns_value: bool) -> bool {
        self.shape.arity() == params && self.shape.returns_value() == returns_value
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.method_name, self.shape)
    }
}
