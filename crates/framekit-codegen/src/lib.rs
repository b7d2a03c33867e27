//! framekit frame assembler: turns a graph of frames into method source.
//!
//! # Architecture
//!
//! A caller describes a method as a [`MethodShape`]: a name, ordered
//! external inputs, ordered [`Frame`]s, and an optional result type. The
//! [`Assembler`] then
//!
//! - binds every consumed slot to a literal, an external input, or a value
//!   produced by another frame,
//! - orders frames with a stable topological sort (insertion order breaks
//!   ties, terminal frames go last),
//! - nests every frame ordered after a scope owner inside its block,
//! - names variables through a per-assembly [`NamingContext`],
//! - emits source text with a [`SourceWriter`].
//!
//! ```text
//! public Demo.Widget Create(System.Int32 int32)
//! {
//!     var widget = new Demo.Widget(int32);
//!     return widget;
//! }
//! ```
//!
//! The same shape always yields byte-identical source.

pub mod assembler;
pub mod constructor;
pub mod error;
pub mod frame;
pub mod frame_map;
pub mod method_call;
pub mod naming;
pub mod rules;
pub mod shape;
pub mod variable;
pub mod writer;

pub use assembler::{assemble, AssembledMethod, Assembler};
pub use constructor::{ConstructionMode, ConstructorFrame, Setter};
pub use error::{CodegenError, CodegenResult};
pub use frame::{ArgumentSource, Dependency, Frame, FrameContext, Preference};
pub use frame_map::{FrameMap, FrameMapEntry};
pub use method_call::{MethodCallFrame, ReturnFrame};
pub use naming::NamingContext;
pub use rules::GenerationRules;
pub use shape::MethodShape;
pub use variable::Variable;
pub use writer::SourceWriter;
