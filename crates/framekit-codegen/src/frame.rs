//! The `Frame` abstraction: one operation contributing to a method body.
//!
//! A frame declares what it produces ([`Frame::creates`]) and what it consumes
//! ([`Frame::uses`]) before ordering begins. Once the assembler has bound and
//! named everything, the frame renders its fragment from a [`FrameContext`].

use std::fmt;

use framekit_types::{Literal, TypeName};

use crate::writer::SourceWriter;

// ══════════════════════════════════════════════════════════════════════════════
// Dependencies
// ══════════════════════════════════════════════════════════════════════════════

/// Where the value of one consumed slot comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentSource {
    /// Resolved by the assembler according to the slot's [`Preference`].
    Default,
    /// A constant written directly into the source.
    Literal(Literal),
    /// The external input at this position.
    Input(usize),
    /// The value produced by another frame of this type.
    Produced(TypeName),
}

impl From<Literal> for ArgumentSource {
    fn from(literal: Literal) -> Self {
        ArgumentSource::Literal(literal)
    }
}

/// Resolution order for [`ArgumentSource::Default`] slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// Claim the next unclaimed external input of the type, else a produced value.
    InputFirst,
    /// Use a produced value of the type, else an external input.
    ProducedFirst,
}

/// One consumed slot of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    pub ty: TypeName,
    pub source: ArgumentSource,
    pub preference: Preference,
}

impl Dependency {
    pub fn new(ty: TypeName, source: ArgumentSource, preference: Preference) -> Self {
        Self {
            ty,
            source,
            preference,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Frame context
// ══════════════════════════════════════════════════════════════════════════════

/// Resolved names handed to a frame at emission time.
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    created: Vec<String>,
    arguments: Vec<String>,
}

impl FrameContext {
    pub fn new(created: Vec<String>, arguments: Vec<String>) -> Self {
        Self { created, arguments }
    }

    /// Generated name of the `index`-th value from [`Frame::creates`].
    pub fn created(&self, index: usize) -> &str {
        self.created.get(index).map(String::as_str).unwrap_or("")
    }

    /// Source expression bound to the `slot`-th entry of [`Frame::uses`].
    pub fn argument(&self, slot: usize) -> &str {
        self.arguments.get(slot).map(String::as_str).unwrap_or("")
    }

    /// Comma-joined expressions for `count` slots starting at `first`.
    pub fn argument_list(&self, first: usize, count: usize) -> String {
        (first..first + count)
            .map(|slot| self.argument(slot))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Frame
// ══════════════════════════════════════════════════════════════════════════════

/// A build-time descriptor of one operation in a generated method body.
pub trait Frame: fmt::Debug + Send + Sync {
    /// Human-readable label used in errors and logs.
    fn describe(&self) -> String;

    /// Declared types of the values this frame produces, in order.
    fn creates(&self) -> Vec<TypeName>;

    /// The slots this frame consumes, in order.
    fn uses(&self) -> Vec<Dependency>;

    /// Whether every frame ordered after this one is nested in its block.
    fn owns_scope(&self) -> bool {
        false
    }

    /// Whether this frame ends the method (`return ...`).
    fn is_terminal(&self) -> bool {
        false
    }

    fn generate(&self, cx: &FrameContext, w: &mut SourceWriter);

    /// Emit this frame around `body`. Only called when [`Frame::owns_scope`]
    /// is true.
    fn generate_scoped(
        &self,
        cx: &FrameContext,
        w: &mut SourceWriter,
        body: &mut dyn FnMut(&mut SourceWriter),
    ) {
        self.generate(cx, w);
        w.open_block();
        body(w);
        w.close_block();
    }
}
