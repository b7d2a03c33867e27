//! Literal values that can be written directly into generated source.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Primitive, TypeName};

/// A constant expression: argument overrides, setter values, and literal
/// tokens parsed back by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i32),
    Double(f64),
    Str(String),
}

impl Literal {
    /// The primitive type of this literal; `None` for `null`.
    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            Literal::Null => None,
            Literal::Bool(_) => Some(Primitive::Boolean),
            Literal::Int(_) => Some(Primitive::Int32),
            Literal::Double(_) => Some(Primitive::Double),
            Literal::Str(_) => Some(Primitive::String),
        }
    }

    /// Whether this literal may stand in for a value of type `ty`.
    ///
    /// `null` fits any non-primitive type and `System.String`.
    pub fn fits(&self, ty: &TypeName) -> bool {
        match (self.primitive(), ty.primitive()) {
            (None, None) => true,
            (None, Some(target)) => target.is_nullable(),
            (Some(own), Some(target)) => own == target,
            (Some(_), None) => false,
        }
    }

    /// Doubles must be finite to have a source form.
    pub fn is_renderable(&self) -> bool {
        match self {
            Literal::Double(d) => d.is_finite(),
            _ => true,
        }
    }
}

impl fmt::Display for Literal {
    /// Render the literal in emitted-source syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(i) => write!(f, "{i}"),
            // `{:?}` keeps the decimal point on whole values (`1.0`).
            Literal::Double(d) => write!(f, "{d:?}"),
            Literal::Str(s) => {
                f.write_str("\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_source_syntax() {
        assert_eq!(Literal::Int(14).to_string(), "14");
        assert_eq!(Literal::Int(-3).to_string(), "-3");
        assert_eq!(Literal::Double(1.23).to_string(), "1.23");
        assert_eq!(Literal::Double(2.0).to_string(), "2.0");
        assert_eq!(Literal::Bool(true).to_string(), "true");
        assert_eq!(Literal::Null.to_string(), "null");
        assert_eq!(Literal::from("Kent").to_string(), "\"Kent\"");
        assert_eq!(
            Literal::from("say \"hi\"\n").to_string(),
            r#""say \"hi\"\n""#
        );
    }

    #[test]
    fn fits_matches_primitive_types() {
        let int = Primitive::Int32.type_name();
        let string = Primitive::String.type_name();
        let widget = TypeName::new("Demo.Widget");
        assert!(Literal::Int(1).fits(&int));
        assert!(!Literal::Double(1.0).fits(&int));
        assert!(Literal::Null.fits(&string));
        assert!(Literal::Null.fits(&widget));
        assert!(!Literal::Null.fits(&int));
        assert!(!Literal::from("x").fits(&widget));
    }

    #[test]
    fn non_finite_doubles_have_no_source_form() {
        assert!(!Literal::Double(f64::NAN).is_renderable());
        assert!(!Literal::Double(f64::INFINITY).is_renderable());
        assert!(Literal::Double(0.5).is_renderable());
    }
}
