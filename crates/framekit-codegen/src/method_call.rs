//! Plain instance method calls and returns.

use framekit_types::{MethodDescriptor, TypeDescriptor, TypeName};

use crate::constructor::{check_literal, signature_text};
use crate::error::{CodegenError, CodegenResult};
use crate::frame::{ArgumentSource, Dependency, Frame, FrameContext, Preference};
use crate::writer::SourceWriter;

// ══════════════════════════════════════════════════════════════════════════════
// MethodCallFrame
// ══════════════════════════════════════════════════════════════════════════════

/// `target.Method(args);`, or `var n = target.Method(args);` when the method
/// returns a value.
///
/// Slot 0 is the call target; slots `1..` are the method arguments.
#[derive(Debug, Clone)]
pub struct MethodCallFrame {
    target: TypeName,
    method: MethodDescriptor,
    target_source: ArgumentSource,
    arguments: Vec<ArgumentSource>,
}

impl MethodCallFrame {
    pub fn new(ty: &TypeDescriptor, method: &str) -> CodegenResult<Self> {
        let method = ty
            .find_method(method)
            .cloned()
            .ok_or_else(|| CodegenError::MethodNotFound {
                ty: ty.name.clone(),
                method: method.to_string(),
            })?;
        Ok(Self {
            target: ty.name.clone(),
            arguments: vec![ArgumentSource::Default; method.params.len()],
            method,
            target_source: ArgumentSource::Default,
        })
    }

    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// Bind the call target explicitly instead of by type.
    pub fn with_target(mut self, source: ArgumentSource) -> Self {
        self.target_source = source;
        self
    }

    /// Replace the default binding of method argument `index`.
    pub fn override_argument(
        &mut self,
        index: usize,
        source: impl Into<ArgumentSource>,
    ) -> CodegenResult<()> {
        let source = source.into();
        let param = self.method.params.get(index).ok_or_else(|| {
            CodegenError::ParameterIndexOutOfRange {
                target: self.describe(),
                index,
                arity: self.method.params.len(),
            }
        })?;
        check_literal(&self.describe(), &param.ty, &source)?;
        self.arguments[index] = source;
        Ok(())
    }
}

impl Frame for MethodCallFrame {
    fn describe(&self) -> String {
        format!(
            "{}.{}({})",
            self.target,
            self.method.name,
            signature_text(&self.method.signature())
        )
    }

    fn creates(&self) -> Vec<TypeName> {
        self.method.returns.iter().cloned().collect()
    }

    fn uses(&self) -> Vec<Dependency> {
        let target = Dependency::new(
            self.target.clone(),
            self.target_source.clone(),
            Preference::ProducedFirst,
        );
        let args = self
            .method
            .params
            .iter()
            .zip(&self.arguments)
            .map(|(param, source)| {
                Dependency::new(param.ty.clone(), source.clone(), Preference::ProducedFirst)
            });
        std::iter::once(target).chain(args).collect()
    }

    fn generate(&self, cx: &FrameContext, w: &mut SourceWriter) {
        let call = format!(
            "{}.{}({})",
            cx.argument(0),
            self.method.name,
            cx.argument_list(1, self.method.params.len())
        );
        if self.method.returns.is_some() {
            w.line(format!("var {} = {};", cx.created(0), call));
        } else {
            w.line(format!("{call};"));
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// ReturnFrame
// ══════════════════════════════════════════════════════════════════════════════

/// `return n;`
///
/// The assembler adds one implicitly when a method has a result type and no
/// terminal frame.
#[derive(Debug, Clone)]
pub struct ReturnFrame {
    ty: TypeName,
    source: ArgumentSource,
}

impl ReturnFrame {
    pub fn new(ty: impl Into<TypeName>) -> Self {
        Self {
            ty: ty.into(),
            source: ArgumentSource::Default,
        }
    }

    pub fn with_source(mut self, source: ArgumentSource) -> Self {
        self.source = source;
        self
    }
}

impl Frame for ReturnFrame {
    fn describe(&self) -> String {
        format!("return {}", self.ty)
    }

    fn creates(&self) -> Vec<TypeName> {
        Vec::new()
    }

    fn uses(&self) -> Vec<Dependency> {
        vec![Dependency::new(
            self.ty.clone(),
            self.source.clone(),
            Preference::ProducedFirst,
        )]
    }

    fn is_terminal(&self) -> bool {
        true
    }

    fn generate(&self, cx: &FrameContext, w: &mut SourceWriter) {
        w.line(format!("return {};", cx.argument(0)));
    }
}
