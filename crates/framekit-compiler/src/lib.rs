//! framekit compiler: orchestrates the full build pipeline.
//!
//! ```text
//! MethodShape → Assembler → source → CompilerBackend (lex → parse → check) → Artifact
//! ```
//!
//! [`build`] assembles a [`MethodShape`], infers its [`EntryPoint`], and hands
//! the emitted source to a [`CompilerBackend`]. The reference
//! [`InterpretingBackend`] checks the source against its runtime's type
//! catalog and returns an [`Artifact`] that interprets it.

mod artifact;
mod backend;
mod checker;
mod entry;
mod env;
mod error;
mod ty;

pub use artifact::{Artifact, Invocable};
pub use backend::{CheckedMethod, CompilerBackend, InterpretingBackend};
pub use entry::{EntryPoint, EntryShape};
pub use error::{BuildError, BuildResult, CompilationError};

use framekit_codegen::{AssembledMethod, Assembler, GenerationRules, MethodShape};

/// A compiled method together with the source it was assembled into.
#[derive(Debug, Clone)]
pub struct Built {
    pub assembled: AssembledMethod,
    pub artifact: Artifact,
}

/// Assemble `shape` with default rules and compile it with `backend`.
pub fn build(shape: &MethodShape, backend: &dyn CompilerBackend) -> BuildResult<Built> {
    build_with(&Assembler::default(), shape, backend)
}

/// Like [`build`], with an explicitly configured assembler.
#[tracing::instrument(level = "debug", skip_all, fields(method = %shape.name()))]
pub fn build_with(
    assembler: &Assembler,
    shape: &MethodShape,
    backend: &dyn CompilerBackend,
) -> BuildResult<Built> {
    let assembled = assembler.assemble(shape)?;
    let entry = EntryPoint::infer(shape)?;
    tracing::debug!(entry = %entry, fingerprint = %assembled.fingerprint, "compiling");
    let artifact = backend.compile(&assembled.source, &entry)?;
    Ok(Built {
        assembled,
        artifact,
    })
}

/// Assemble with `rules` and compile; a convenience over [`build_with`].
pub fn build_with_rules(
    rules: GenerationRules,
    shape: &MethodShape,
    backend: &dyn CompilerBackend,
) -> BuildResult<Built> {
    build_with(&Assembler::new(rules), shape, backend)
}
