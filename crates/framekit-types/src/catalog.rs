//! Static type descriptors and the catalog that holds them.
//!
//! Constructor overloads, settable members and callable methods are
//! described up front. Frames pick overloads by matching an ordered list of
//! parameter types against these descriptors; nothing is discovered at
//! generation or execution time.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ══════════════════════════════════════════════════════════════════════════════
// TypeName
// ══════════════════════════════════════════════════════════════════════════════

/// A fully qualified, dotted type name such as `Demo.Widget`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last dotted segment: `Demo.Widget` → `Widget`.
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// The primitive this name denotes, if any.
    pub fn primitive(&self) -> Option<Primitive> {
        Primitive::ALL.into_iter().find(|p| p.type_name_str() == self.0)
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive().is_some()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Primitives
// ══════════════════════════════════════════════════════════════════════════════

/// Built-in value types understood by every catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Int32,
    Double,
    String,
    Boolean,
}

impl Primitive {
    pub const ALL: [Primitive; 4] = [
        Primitive::Int32,
        Primitive::Double,
        Primitive::String,
        Primitive::Boolean,
    ];

    fn type_name_str(self) -> &'static str {
        match self {
            Primitive::Int32 => "System.Int32",
            Primitive::Double => "System.Double",
            Primitive::String => "System.String",
            Primitive::Boolean => "System.Boolean",
        }
    }

    pub fn type_name(self) -> TypeName {
        TypeName::new(self.type_name_str())
    }

    /// `null` is only assignable to reference-like primitives.
    pub fn is_nullable(self) -> bool {
        matches!(self, Primitive::String)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Descriptors
// ══════════════════════════════════════════════════════════════════════════════

/// A named, typed parameter of a constructor or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub ty: TypeName,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// One constructor overload.
///
/// Each parameter value is stored into the instance field of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDescriptor {
    pub params: Vec<ParameterDescriptor>,
}

impl ConstructorDescriptor {
    /// The ordered parameter types identifying this overload.
    pub fn signature(&self) -> Vec<TypeName> {
        self.params.iter().map(|p| p.ty.clone()).collect()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn matches(&self, signature: &[TypeName]) -> bool {
        self.params.len() == signature.len()
            && self.params.iter().zip(signature).all(|(p, ty)| &p.ty == ty)
    }
}

/// A settable member (property) resolved at build time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,
    pub ty: TypeName,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// An instance method callable from generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<ParameterDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeName>,
}

impl MethodDescriptor {
    pub fn signature(&self) -> Vec<TypeName> {
        self.params.iter().map(|p| p.ty.clone()).collect()
    }
}

/// Everything the assembler and backend know about one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: TypeName,
    #[serde(default)]
    pub supertypes: Vec<TypeName>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDescriptor>,
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    /// Instances own a resource released at the end of a disposal scope.
    #[serde(default)]
    pub disposable: bool,
}

impl TypeDescriptor {
    /// Start describing a class-like type with no constructors yet.
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            supertypes: Vec::new(),
            constructors: Vec::new(),
            members: Vec::new(),
            methods: Vec::new(),
            disposable: false,
        }
    }

    /// Add a constructor overload from `(parameter name, type)` pairs.
    pub fn constructor(mut self, params: &[(&str, TypeName)]) -> Self {
        self.constructors.push(ConstructorDescriptor {
            params: params
                .iter()
                .map(|(name, ty)| ParameterDescriptor::new(*name, ty.clone()))
                .collect(),
        });
        self
    }

    pub fn member(mut self, name: &str, ty: TypeName) -> Self {
        self.members.push(MemberDescriptor::new(name, ty));
        self
    }

    pub fn method(
        mut self,
        name: &str,
        params: &[(&str, TypeName)],
        returns: Option<TypeName>,
    ) -> Self {
        self.methods.push(MethodDescriptor {
            name: name.to_string(),
            params: params
                .iter()
                .map(|(n, ty)| ParameterDescriptor::new(*n, ty.clone()))
                .collect(),
            returns,
        });
        self
    }

    pub fn implements(mut self, supertype: impl Into<TypeName>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn disposable(mut self) -> Self {
        self.disposable = true;
        self
    }

    /// Static overload lookup by exact ordered parameter types.
    pub fn find_constructor(&self, signature: &[TypeName]) -> Option<&ConstructorDescriptor> {
        self.constructors.iter().find(|c| c.matches(signature))
    }

    pub fn find_member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// TypeCatalog
// ══════════════════════════════════════════════════════════════════════════════

/// The set of types known to an assembly and its backend.
///
/// Always contains the primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCatalog {
    types: BTreeMap<TypeName, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        let types = Primitive::ALL
            .into_iter()
            .map(|p| (p.type_name(), TypeDescriptor::class(p.type_name())))
            .collect();
        Self { types }
    }

    /// Load extra descriptors from a JSON array, on top of the primitives.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let descriptors: Vec<TypeDescriptor> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for descriptor in descriptors {
            catalog.register(descriptor);
        }
        Ok(catalog)
    }

    /// Register a descriptor, replacing any previous one with the same name.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.types.insert(descriptor.name.clone(), descriptor);
        self
    }

    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, name: &TypeName) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// Whether a value of type `from` may be stored where `to` is expected,
    /// following supertypes transitively.
    pub fn is_assignable(&self, from: &TypeName, to: &TypeName) -> bool {
        let mut seen = BTreeSet::new();
        let mut pending = vec![from];
        while let Some(current) = pending.pop() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(descriptor) = self.types.get(current) {
                pending.extend(descriptor.supertypes.iter());
            }
        }
        false
    }

    /// `ty` followed by its supertypes, breadth first, each listed once.
    pub fn hierarchy(&self, ty: &TypeName) -> Vec<&TypeDescriptor> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        let mut queue = std::collections::VecDeque::from([ty.clone()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(descriptor) = self.types.get(&current) {
                queue.extend(descriptor.supertypes.iter().cloned());
                out.push(descriptor);
            }
        }
        out
    }

    /// A member declared on `ty` or inherited from a supertype.
    pub fn member_of(&self, ty: &TypeName, name: &str) -> Option<&MemberDescriptor> {
        self.hierarchy(ty)
            .into_iter()
            .find_map(|d| d.find_member(name))
    }

    /// A method declared on `ty` or inherited, paired with its declaring type.
    pub fn method_of(
        &self,
        ty: &TypeName,
        name: &str,
    ) -> Option<(&TypeName, &MethodDescriptor)> {
        self.hierarchy(ty)
            .into_iter()
            .find_map(|d| d.find_method(name).map(|m| (&d.name, m)))
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> TypeName {
        Primitive::Int32.type_name()
    }

    fn double() -> TypeName {
        Primitive::Double.type_name()
    }

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(TypeDescriptor::class("Demo.IWidget"))
            .with(TypeDescriptor::class("Demo.BaseWidget").implements("Demo.IWidget"))
            .with(
                TypeDescriptor::class("Demo.Widget")
                    .implements("Demo.BaseWidget")
                    .constructor(&[])
                    .constructor(&[("number", int()), ("amount", double())])
                    .member("Number", int()),
            )
    }

    #[test]
    fn short_name_is_last_segment() {
        assert_eq!(TypeName::new("Demo.Inner.Widget").short_name(), "Widget");
        assert_eq!(TypeName::new("Widget").short_name(), "Widget");
    }

    #[test]
    fn primitives_are_registered() {
        let catalog = TypeCatalog::new();
        for p in Primitive::ALL {
            assert!(catalog.contains(&p.type_name()));
            assert_eq!(p.type_name().primitive(), Some(p));
        }
    }

    #[test]
    fn constructor_lookup_is_exact() {
        let catalog = catalog();
        let widget = catalog.get(&"Demo.Widget".into()).unwrap();
        assert!(widget.find_constructor(&[]).is_some());
        assert!(widget.find_constructor(&[int(), double()]).is_some());
        assert!(widget.find_constructor(&[double(), int()]).is_none());
        assert!(widget.find_constructor(&[int()]).is_none());
    }

    #[test]
    fn assignability_is_transitive() {
        let catalog = catalog();
        let widget = TypeName::new("Demo.Widget");
        assert!(catalog.is_assignable(&widget, &widget));
        assert!(catalog.is_assignable(&widget, &"Demo.IWidget".into()));
        assert!(!catalog.is_assignable(&"Demo.IWidget".into(), &widget));
        assert!(!catalog.is_assignable(&int(), &double()));
    }

    #[test]
    fn loads_descriptors_from_json() {
        let json = r#"[
            {
                "name": "Demo.Gadget",
                "constructors": [{ "params": [{ "name": "number", "ty": "System.Int32" }] }],
                "members": [{ "name": "Label", "ty": "System.String" }],
                "disposable": true
            }
        ]"#;
        let catalog = TypeCatalog::from_json(json).unwrap();
        let gadget = catalog.get(&"Demo.Gadget".into()).unwrap();
        assert!(gadget.disposable);
        assert_eq!(gadget.constructors[0].signature(), vec![int()]);
        assert!(gadget.find_member("Label").is_some());
        assert!(catalog.contains(&int()));
    }

    #[test]
    fn inherited_members_and_methods_resolve() {
        let catalog = TypeCatalog::new()
            .with(TypeDescriptor::class("Demo.Base").member("Label", int()).method(
                "Ping",
                &[],
                None,
            ))
            .with(TypeDescriptor::class("Demo.Leaf").implements("Demo.Base"));
        let leaf = TypeName::new("Demo.Leaf");
        let names: Vec<_> = catalog.hierarchy(&leaf).iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Demo.Leaf", "Demo.Base"]);
        assert!(catalog.member_of(&leaf, "Label").is_some());
        let (owner, _) = catalog.method_of(&leaf, "Ping").unwrap();
        assert_eq!(owner.as_str(), "Demo.Base");
        assert!(catalog.method_of(&leaf, "Pong").is_none());
    }
}
