//! framekit tree-walking interpreter: executes parsed methods.
//!
//! The [`Runtime`] pairs the static [`TypeCatalog`](framekit_types::TypeCatalog)
//! with native behavior (constructor hooks, method bodies, disposal hooks).
//! The [`Interpreter`] walks a parsed [`MethodDecl`](framekit_types::ast::MethodDecl)
//! against it. Every `using` scope releases its resource exactly once,
//! whether the body completes, returns early, or fails.

mod env;
mod error;
mod interpreter;
mod overloads;
mod runtime;
mod value;

pub use env::Environment;
pub use error::{EvalError, EvalResult};
pub use interpreter::Interpreter;
pub use overloads::Overloads;
pub use runtime::{NativeHook, NativeMethod, Runtime};
pub use value::{Object, ObjectRef, Value};
