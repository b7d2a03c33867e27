//! Backend and pipeline errors.

use framekit_codegen::CodegenError;
use framekit_types::Diagnostics;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A backend rejected generated source.
///
/// Carries the complete source text so the failure can be diagnosed without
/// re-running the assembler.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("compiling '{method}' failed with {} error(s){}", .diagnostics.total_errors, first_error(.diagnostics))]
pub struct CompilationError {
    pub method: String,
    pub generated_source: String,
    pub diagnostics: Diagnostics,
}

impl CompilationError {
    pub fn new(
        method: impl Into<String>,
        generated_source: impl Into<String>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            method: method.into(),
            generated_source: generated_source.into(),
            diagnostics,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn first_error(diagnostics: &Diagnostics) -> String {
    diagnostics
        .errors
        .first()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

/// Any failure of the assemble-then-compile pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// The method shape matches none of the fixed entry-point shapes.
    #[error("'{method}' has no supported entry point: {reason}")]
    UnsupportedShape { method: String, reason: String },
}

pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;
    use framekit_types::{Diagnostic, ErrorCode, Span};

    #[test]
    fn compilation_error_serializes_with_source() {
        let mut diagnostics = Diagnostics::empty();
        diagnostics.push(Diagnostic::new(
            "Build",
            ErrorCode::UNKNOWN_TYPE,
            "unknown type 'Demo.Missing'",
            Span::point(3, 9),
            "    var x = new Demo.Missing();",
        ));
        let err = CompilationError::new("Build", "public void Build() { }", diagnostics);

        let json = err.to_json().expect("serializes");
        let back: CompilationError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
        assert!(err.to_string().contains("1 error(s)"));
    }
}
