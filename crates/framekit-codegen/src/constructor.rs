//! The constructor-invocation frame.
//!
//! Models "construct an instance of `T`" with three exposure modes, an
//! overload chosen by static signature lookup, per-parameter argument
//! overrides, an optional declared-type override, and post-construction
//! setters.
//!
//! | Mode | Emitted shape |
//! |---|---|
//! | [`ConstructionMode::SimpleVariable`] | `var n = new T(args);` |
//! | `SimpleVariable` + declared type `D` | `D n = new T(args);` |
//! | [`ConstructionMode::UsingNestedVariable`] | `using (var n = new T(args))` + block |
//! | [`ConstructionMode::ReturnValue`] | `return new T(args);` |

use framekit_types::{
    ConstructorDescriptor, MemberDescriptor, TypeCatalog, TypeDescriptor, TypeName,
};

use crate::error::{CodegenError, CodegenResult};
use crate::frame::{ArgumentSource, Dependency, Frame, FrameContext, Preference};
use crate::writer::SourceWriter;

/// How the constructed value is exposed to the rest of the method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstructionMode {
    /// A plain local declaration.
    #[default]
    SimpleVariable,
    /// A local whose disposal wraps every later frame.
    UsingNestedVariable,
    /// Returned directly; no local is declared.
    ReturnValue,
}

/// A post-construction member assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Setter {
    pub member: MemberDescriptor,
    pub source: ArgumentSource,
}

#[derive(Debug, Clone)]
pub struct ConstructorFrame {
    descriptor: TypeDescriptor,
    constructor: ConstructorDescriptor,
    arguments: Vec<ArgumentSource>,
    mode: ConstructionMode,
    declared_type: Option<TypeName>,
    setters: Vec<Setter>,
    /// Members a setter may target: the type's own, then inherited ones.
    members: Vec<MemberDescriptor>,
    disposable: bool,
}

impl ConstructorFrame {
    /// Select the overload of `ty` whose ordered parameter types equal
    /// `signature`.
    ///
    /// Only the descriptor itself is consulted: setters are limited to the
    /// members it declares. Use [`ConstructorFrame::from_catalog`] to see
    /// supertypes as well.
    pub fn new(ty: &TypeDescriptor, signature: &[TypeName]) -> CodegenResult<Self> {
        Self::select(ty, signature, ty.members.clone(), ty.disposable)
    }

    /// Like [`ConstructorFrame::new`], resolving `ty` through `catalog` so
    /// inherited members are settable and disposability follows supertypes.
    pub fn from_catalog(
        catalog: &TypeCatalog,
        ty: &TypeName,
        signature: &[TypeName],
    ) -> CodegenResult<Self> {
        let descriptor = catalog
            .get(ty)
            .ok_or_else(|| CodegenError::UnknownType { ty: ty.clone() })?;
        let hierarchy = catalog.hierarchy(ty);
        let mut members: Vec<MemberDescriptor> = Vec::new();
        for member in hierarchy.iter().flat_map(|d| &d.members) {
            if !members.iter().any(|m| m.name == member.name) {
                members.push(member.clone());
            }
        }
        let disposable = hierarchy.iter().any(|d| d.disposable);
        Self::select(descriptor, signature, members, disposable)
    }

    fn select(
        ty: &TypeDescriptor,
        signature: &[TypeName],
        members: Vec<MemberDescriptor>,
        disposable: bool,
    ) -> CodegenResult<Self> {
        let constructor = ty.find_constructor(signature).cloned().ok_or_else(|| {
            CodegenError::ConstructorNotFound {
                ty: ty.name.clone(),
                signature: signature_text(signature),
            }
        })?;
        Ok(Self {
            descriptor: ty.clone(),
            arguments: vec![ArgumentSource::Default; constructor.arity()],
            constructor,
            mode: ConstructionMode::default(),
            declared_type: None,
            setters: Vec::new(),
            members,
            disposable,
        })
    }

    pub fn target(&self) -> &TypeName {
        &self.descriptor.name
    }

    pub fn constructor(&self) -> &ConstructorDescriptor {
        &self.constructor
    }

    pub fn mode(&self) -> ConstructionMode {
        self.mode
    }

    pub fn setters(&self) -> &[Setter] {
        &self.setters
    }

    /// A disposal scope requires a disposable target.
    pub fn set_mode(&mut self, mode: ConstructionMode) -> CodegenResult<()> {
        if mode == ConstructionMode::UsingNestedVariable && !self.disposable {
            return Err(CodegenError::NotDisposable {
                ty: self.descriptor.name.clone(),
            });
        }
        self.mode = mode;
        Ok(())
    }

    pub fn with_mode(mut self, mode: ConstructionMode) -> CodegenResult<Self> {
        self.set_mode(mode)?;
        Ok(self)
    }

    /// Replace the default binding of constructor argument `index`.
    pub fn override_parameter(
        &mut self,
        index: usize,
        source: impl Into<ArgumentSource>,
    ) -> CodegenResult<()> {
        let source = source.into();
        let param = self.constructor.params.get(index).ok_or_else(|| {
            CodegenError::ParameterIndexOutOfRange {
                target: self.describe(),
                index,
                arity: self.constructor.arity(),
            }
        })?;
        check_literal(&self.describe(), &param.ty, &source)?;
        self.arguments[index] = source;
        Ok(())
    }

    /// Change the static type of the declaration and of the value advertised
    /// to later frames. The constructed type is unchanged.
    pub fn set_declared_type(&mut self, ty: impl Into<TypeName>) {
        self.declared_type = Some(ty.into());
    }

    pub fn with_declared_type(mut self, ty: impl Into<TypeName>) -> Self {
        self.set_declared_type(ty);
        self
    }

    /// Append a member assignment applied right after construction.
    pub fn add_setter(
        &mut self,
        member: MemberDescriptor,
        source: impl Into<ArgumentSource>,
    ) -> CodegenResult<()> {
        if self.members.iter().find(|m| m.name == member.name) != Some(&member) {
            return Err(CodegenError::MemberNotFound {
                ty: self.descriptor.name.clone(),
                member: member.name,
            });
        }
        let source = source.into();
        check_literal(&self.describe(), &member.ty, &source)?;
        self.setters.push(Setter { member, source });
        Ok(())
    }

    fn arguments_text(&self, cx: &FrameContext) -> String {
        cx.argument_list(0, self.constructor.arity())
    }

    fn declaration_token(&self) -> &str {
        self.declared_type
            .as_ref()
            .map(TypeName::as_str)
            .unwrap_or("var")
    }

    fn new_expression(&self, cx: &FrameContext) -> String {
        format!("new {}({})", self.descriptor.name, self.arguments_text(cx))
    }

    fn write_setters(&self, cx: &FrameContext, w: &mut SourceWriter) {
        let arity = self.constructor.arity();
        for (i, setter) in self.setters.iter().enumerate() {
            w.line(format!(
                "{}.{} = {};",
                cx.created(0),
                setter.member.name,
                cx.argument(arity + i)
            ));
        }
    }
}

pub(crate) fn signature_text(types: &[TypeName]) -> String {
    types
        .iter()
        .map(TypeName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reject literals that cannot stand in for `expected`.
pub(crate) fn check_literal(
    target: &str,
    expected: &TypeName,
    source: &ArgumentSource,
) -> CodegenResult<()> {
    match source {
        ArgumentSource::Literal(literal) if !literal.fits(expected) || !literal.is_renderable() => {
            Err(CodegenError::LiteralTypeMismatch {
                target: target.to_string(),
                expected: expected.clone(),
                literal: literal.to_string(),
            })
        }
        _ => Ok(()),
    }
}

impl Frame for ConstructorFrame {
    fn describe(&self) -> String {
        format!(
            "new {}({})",
            self.descriptor.name,
            signature_text(&self.constructor.signature())
        )
    }

    fn creates(&self) -> Vec<TypeName> {
        match self.mode {
            ConstructionMode::ReturnValue => Vec::new(),
            _ => vec![self
                .declared_type
                .clone()
                .unwrap_or_else(|| self.descriptor.name.clone())],
        }
    }

    fn uses(&self) -> Vec<Dependency> {
        let params = self
            .constructor
            .params
            .iter()
            .zip(&self.arguments)
            .map(|(param, source)| {
                Dependency::new(param.ty.clone(), source.clone(), Preference::InputFirst)
            });
        let setters = self.setters.iter().map(|setter| {
            Dependency::new(
                setter.member.ty.clone(),
                setter.source.clone(),
                Preference::InputFirst,
            )
        });
        params.chain(setters).collect()
    }

    fn owns_scope(&self) -> bool {
        self.mode == ConstructionMode::UsingNestedVariable
    }

    fn is_terminal(&self) -> bool {
        self.mode == ConstructionMode::ReturnValue
    }

    fn generate(&self, cx: &FrameContext, w: &mut SourceWriter) {
        match self.mode {
            ConstructionMode::SimpleVariable => {
                w.line(format!(
                    "{} {} = {};",
                    self.declaration_token(),
                    cx.created(0),
                    self.new_expression(cx)
                ));
                self.write_setters(cx, w);
            }
            ConstructionMode::UsingNestedVariable => {
                self.generate_scoped(cx, w, &mut |_: &mut SourceWriter| {});
            }
            ConstructionMode::ReturnValue if self.setters.is_empty() => {
                w.line(format!("return {};", self.new_expression(cx)));
            }
            ConstructionMode::ReturnValue => {
                let arity = self.constructor.arity();
                let inits = self
                    .setters
                    .iter()
                    .enumerate()
                    .map(|(i, s)| format!("{} = {}", s.member.name, cx.argument(arity + i)))
                    .collect::<Vec<_>>()
                    .join(", ");
                w.line(format!(
                    "return {} {{ {} }};",
                    self.new_expression(cx),
                    inits
                ));
            }
        }
    }

    fn generate_scoped(
        &self,
        cx: &FrameContext,
        w: &mut SourceWriter,
        body: &mut dyn FnMut(&mut SourceWriter),
    ) {
        w.line(format!(
            "using ({} {} = {})",
            self.declaration_token(),
            cx.created(0),
            self.new_expression(cx)
        ));
        w.open_block();
        self.write_setters(cx, w);
        body(w);
        w.close_block();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framekit_types::{Literal, Primitive};

    fn int() -> TypeName {
        Primitive::Int32.type_name()
    }

    fn string() -> TypeName {
        Primitive::String.type_name()
    }

    fn base() -> TypeDescriptor {
        TypeDescriptor::class("Demo.Base")
            .member("Tag", int())
            .disposable()
    }

    fn derived() -> TypeDescriptor {
        TypeDescriptor::class("Demo.Derived")
            .implements("Demo.Base")
            .constructor(&[])
    }

    fn widget() -> TypeDescriptor {
        TypeDescriptor::class("Demo.Widget")
            .constructor(&[])
            .constructor(&[("Number", int()), ("Name", string())])
            .member("Number", int())
            .member("Name", string())
            .disposable()
    }

    fn render(frame: &ConstructorFrame, created: &[&str], args: &[&str]) -> String {
        let cx = FrameContext::new(
            created.iter().map(|s| s.to_string()).collect(),
            args.iter().map(|s| s.to_string()).collect(),
        );
        let mut w = SourceWriter::new(4);
        frame.generate(&cx, &mut w);
        w.finish()
    }

    #[test]
    fn selects_overload_by_signature() {
        let frame = ConstructorFrame::new(&widget(), &[int(), string()]).unwrap();
        assert_eq!(frame.constructor().arity(), 2);
        assert_eq!(frame.describe(), "new Demo.Widget(System.Int32, System.String)");
    }

    #[test]
    fn unknown_signature_fails() {
        let err = ConstructorFrame::new(&widget(), &[string()]).unwrap_err();
        assert_eq!(
            err,
            CodegenError::ConstructorNotFound {
                ty: "Demo.Widget".into(),
                signature: "System.String".into(),
            }
        );
    }

    #[test]
    fn override_checks_index_and_literal_type() {
        let mut frame = ConstructorFrame::new(&widget(), &[int(), string()]).unwrap();
        assert!(matches!(
            frame.override_parameter(2, Literal::Int(1)),
            Err(CodegenError::ParameterIndexOutOfRange { index: 2, arity: 2, .. })
        ));
        assert!(matches!(
            frame.override_parameter(0, Literal::from("x")),
            Err(CodegenError::LiteralTypeMismatch { .. })
        ));
        assert!(frame.override_parameter(1, Literal::Null).is_ok());
        assert!(matches!(
            frame.override_parameter(0, Literal::Null),
            Err(CodegenError::LiteralTypeMismatch { .. })
        ));
    }

    #[test]
    fn setter_member_must_belong_to_target() {
        let mut frame = ConstructorFrame::new(&widget(), &[]).unwrap();
        let err = frame
            .add_setter(MemberDescriptor::new("Missing", int()), ArgumentSource::Default)
            .unwrap_err();
        assert!(matches!(err, CodegenError::MemberNotFound { .. }));
        // same name, wrong type
        let err = frame
            .add_setter(MemberDescriptor::new("Number", string()), ArgumentSource::Default)
            .unwrap_err();
        assert!(matches!(err, CodegenError::MemberNotFound { .. }));
    }

    #[test]
    fn catalog_frames_see_inherited_members() {
        let catalog = TypeCatalog::new().with(base()).with(derived());
        let tag = MemberDescriptor::new("Tag", int());

        let mut local = ConstructorFrame::new(&derived(), &[]).unwrap();
        assert!(matches!(
            local.add_setter(tag.clone(), ArgumentSource::Default),
            Err(CodegenError::MemberNotFound { .. })
        ));

        let mut frame =
            ConstructorFrame::from_catalog(&catalog, &"Demo.Derived".into(), &[]).unwrap();
        frame.add_setter(tag, Literal::Int(7)).unwrap();
        assert_eq!(
            render(&frame, &["derived"], &["7"]),
            "var derived = new Demo.Derived();\nderived.Tag = 7;\n"
        );
    }

    #[test]
    fn unknown_catalog_type_fails() {
        let err = ConstructorFrame::from_catalog(&TypeCatalog::new(), &"Demo.Nope".into(), &[])
            .unwrap_err();
        assert_eq!(err, CodegenError::UnknownType { ty: "Demo.Nope".into() });
    }

    #[test]
    fn using_mode_requires_disposable_target() {
        let mut frame = ConstructorFrame::new(&derived(), &[]).unwrap();
        assert_eq!(
            frame.set_mode(ConstructionMode::UsingNestedVariable),
            Err(CodegenError::NotDisposable { ty: "Demo.Derived".into() })
        );
        assert_eq!(frame.mode(), ConstructionMode::SimpleVariable);

        let catalog = TypeCatalog::new().with(base()).with(derived());
        let inherited = ConstructorFrame::from_catalog(&catalog, &"Demo.Derived".into(), &[])
            .unwrap()
            .with_mode(ConstructionMode::UsingNestedVariable)
            .unwrap();
        assert!(inherited.owns_scope());
    }

    #[test]
    fn uses_lists_parameters_then_setters() {
        let mut frame = ConstructorFrame::new(&widget(), &[int(), string()]).unwrap();
        frame
            .add_setter(MemberDescriptor::new("Number", int()), Literal::Int(3))
            .unwrap();
        let uses = frame.uses();
        assert_eq!(uses.len(), 3);
        assert_eq!(uses[2].source, ArgumentSource::Literal(Literal::Int(3)));
        assert!(uses.iter().all(|d| d.preference == Preference::InputFirst));
    }

    #[test]
    fn return_mode_produces_nothing_and_is_terminal() {
        let frame = ConstructorFrame::new(&widget(), &[])
            .unwrap()
            .with_mode(ConstructionMode::ReturnValue)
            .unwrap();
        assert!(frame.creates().is_empty());
        assert!(frame.is_terminal());
        assert_eq!(render(&frame, &[], &[]), "return new Demo.Widget();\n");
    }

    #[test]
    fn return_mode_with_setters_uses_initializer() {
        let mut frame = ConstructorFrame::new(&widget(), &[])
            .unwrap()
            .with_mode(ConstructionMode::ReturnValue)
            .unwrap();
        frame
            .add_setter(MemberDescriptor::new("Number", int()), ArgumentSource::Default)
            .unwrap();
        frame
            .add_setter(MemberDescriptor::new("Name", string()), Literal::from("Kent"))
            .unwrap();
        assert_eq!(
            render(&frame, &[], &["int32", "\"Kent\""]),
            "return new Demo.Widget() { Number = int32, Name = \"Kent\" };\n"
        );
    }

    #[test]
    fn declared_type_changes_only_the_declaration() {
        let frame = ConstructorFrame::new(&widget(), &[])
            .unwrap()
            .with_declared_type("Demo.IWidget");
        assert_eq!(frame.creates(), vec![TypeName::from("Demo.IWidget")]);
        assert_eq!(
            render(&frame, &["iWidget"], &[]),
            "Demo.IWidget iWidget = new Demo.Widget();\n"
        );
    }

    #[test]
    fn using_mode_without_body_emits_empty_block() {
        let frame = ConstructorFrame::new(&widget(), &[])
            .unwrap()
            .with_mode(ConstructionMode::UsingNestedVariable)
            .unwrap();
        assert!(frame.owns_scope());
        assert_eq!(
            render(&frame, &["widget"], &[]),
            "using (var widget = new Demo.Widget())\n{\n}\n"
        );
    }
}
