//! The description of one generated method.

use framekit_types::TypeName;

use crate::frame::Frame;

/// Name, ordered external inputs, ordered frames, and result type of a
/// method to assemble.
///
/// Inputs become the method parameters, in order, whether or not a frame
/// claims them.
#[derive(Debug, Default)]
pub struct MethodShape {
    name: String,
    inputs: Vec<TypeName>,
    result: Option<TypeName>,
    frames: Vec<Box<dyn Frame>>,
}

impl MethodShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append an external input.
    pub fn input(mut self, ty: impl Into<TypeName>) -> Self {
        self.inputs.push(ty.into());
        self
    }

    /// Set the result type; without one the method is `void`.
    pub fn returns(mut self, ty: impl Into<TypeName>) -> Self {
        self.result = Some(ty.into());
        self
    }

    pub fn frame(mut self, frame: impl Frame + 'static) -> Self {
        self.push_frame(frame);
        self
    }

    pub fn push_frame(&mut self, frame: impl Frame + 'static) {
        self.frames.push(Box::new(frame));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[TypeName] {
        &self.inputs
    }

    pub fn result(&self) -> Option<&TypeName> {
        self.result.as_ref()
    }

    pub fn frames(&self) -> &[Box<dyn Frame>] {
        &self.frames
    }
}
