//! The runtime: a type catalog plus the native behavior behind it.
//!
//! The catalog says what exists; behaviors say what happens. A constructor
//! with no hook just stores each argument into the field named after its
//! parameter. A method must have a registered behavior to be callable.
//! Disposal always counts on the object and then runs the optional hook.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use framekit_types::{ConstructorDescriptor, TypeCatalog, TypeDescriptor, TypeName};

use crate::error::{EvalError, EvalResult};
use crate::value::{Object, ObjectRef, Value};

/// Native implementation of a catalog method.
pub type NativeMethod = Arc<dyn Fn(&ObjectRef, &[Value]) -> EvalResult<Value> + Send + Sync>;

/// Native hook run after construction or on disposal.
pub type NativeHook = Arc<dyn Fn(&ObjectRef) -> EvalResult<()> + Send + Sync>;

#[derive(Default, Clone)]
struct Behavior {
    on_construct: Option<NativeHook>,
    on_dispose: Option<NativeHook>,
    methods: HashMap<String, NativeMethod>,
}

/// Catalog and behaviors shared by every artifact compiled against it.
#[derive(Clone)]
pub struct Runtime {
    catalog: TypeCatalog,
    behaviors: HashMap<TypeName, Behavior>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut typed: Vec<_> = self.behaviors.keys().map(TypeName::as_str).collect();
        typed.sort_unstable();
        f.debug_struct("Runtime")
            .field("types", &self.catalog.iter().count())
            .field("behaviors", &typed)
            .finish()
    }
}

impl Runtime {
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            behaviors: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Run `hook` on every new instance of `ty`, after its fields are set.
    pub fn on_construct<F>(mut self, ty: impl Into<TypeName>, hook: F) -> Self
    where
        F: Fn(&ObjectRef) -> EvalResult<()> + Send + Sync + 'static,
    {
        self.behavior(ty).on_construct = Some(Arc::new(hook));
        self
    }

    /// Run `hook` when a disposal scope releases an instance of `ty`.
    pub fn on_dispose<F>(mut self, ty: impl Into<TypeName>, hook: F) -> Self
    where
        F: Fn(&ObjectRef) -> EvalResult<()> + Send + Sync + 'static,
    {
        self.behavior(ty).on_dispose = Some(Arc::new(hook));
        self
    }

    /// Implement the catalog method `ty.name`.
    pub fn method<F>(mut self, ty: impl Into<TypeName>, name: &str, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> EvalResult<Value> + Send + Sync + 'static,
    {
        self.behavior(ty)
            .methods
            .insert(name.to_string(), Arc::new(body));
        self
    }

    fn behavior(&mut self, ty: impl Into<TypeName>) -> &mut Behavior {
        self.behaviors.entry(ty.into()).or_default()
    }

    /// Whether `value` may be stored in a slot of type `ty`.
    pub fn fits(&self, value: &Value, ty: &TypeName) -> bool {
        match value.type_name() {
            None => ty.primitive().map_or(true, |p| p.is_nullable()),
            Some(actual) => self.catalog.is_assignable(&actual, ty),
        }
    }

    /// Create an instance of `ty` with no overload fixed in advance.
    ///
    /// An overload whose parameter types equal the argument types wins;
    /// otherwise the first one the arguments fit is used.
    pub fn construct(&self, ty: &TypeName, args: &[Value]) -> EvalResult<ObjectRef> {
        let descriptor = self.descriptor(ty)?;
        let exact = |c: &&ConstructorDescriptor| {
            c.arity() == args.len()
                && c.params
                    .iter()
                    .zip(args)
                    .all(|(p, v)| v.type_name().as_ref() == Some(&p.ty))
        };
        let ctor = descriptor
            .constructors
            .iter()
            .find(exact)
            .or_else(|| descriptor.constructors.iter().find(|c| self.accepts(c, args)))
            .ok_or_else(|| no_matching_constructor(ty, args))?;
        self.instantiate(ty, ctor, args)
    }

    /// Create an instance of `ty` through its constructor at `index`.
    pub fn construct_with(
        &self,
        ty: &TypeName,
        index: usize,
        args: &[Value],
    ) -> EvalResult<ObjectRef> {
        let descriptor = self.descriptor(ty)?;
        let ctor = descriptor
            .constructors
            .get(index)
            .filter(|c| self.accepts(c, args))
            .ok_or_else(|| no_matching_constructor(ty, args))?;
        self.instantiate(ty, ctor, args)
    }

    fn descriptor(&self, ty: &TypeName) -> EvalResult<&TypeDescriptor> {
        self.catalog
            .get(ty)
            .ok_or_else(|| EvalError::UnknownType(ty.clone()))
    }

    fn accepts(&self, ctor: &ConstructorDescriptor, args: &[Value]) -> bool {
        ctor.arity() == args.len()
            && ctor.params.iter().zip(args).all(|(p, v)| self.fits(v, &p.ty))
    }

    fn instantiate(
        &self,
        ty: &TypeName,
        ctor: &ConstructorDescriptor,
        args: &[Value],
    ) -> EvalResult<ObjectRef> {
        let object = Object::new(ty.clone());
        for ancestor in self.catalog.hierarchy(ty) {
            for member in &ancestor.members {
                if object.field(&member.name).is_none() {
                    object.set_field(&member.name, Value::default_for(&member.ty));
                }
            }
        }
        for (param, value) in ctor.params.iter().zip(args) {
            object.set_field(&param.name, value.clone());
        }
        if let Some(hook) = self.behaviors.get(ty).and_then(|b| b.on_construct.as_ref()) {
            hook(&object)?;
        }
        tracing::trace!(ty = %ty, arity = args.len(), "constructed");
        Ok(object)
    }

    /// Assign a catalog member on `target`.
    pub fn set_member(&self, target: &ObjectRef, member: &str, value: Value) -> EvalResult<()> {
        let ty = target.type_name();
        let descriptor =
            self.catalog
                .member_of(ty, member)
                .ok_or_else(|| EvalError::UnknownMember {
                    ty: ty.clone(),
                    member: member.to_string(),
                })?;
        if !self.fits(&value, &descriptor.ty) {
            return Err(EvalError::TypeMismatch(format!(
                "{ty}.{member} expects {}, got {value}",
                descriptor.ty
            )));
        }
        target.set_field(member, value);
        Ok(())
    }

    /// Call a catalog method on `target`.
    ///
    /// The behavior registered on the runtime type wins over one registered
    /// on the declaring supertype.
    pub fn call(&self, target: &ObjectRef, method: &str, args: &[Value]) -> EvalResult<Value> {
        let ty = target.type_name();
        let (owner, descriptor) =
            self.catalog
                .method_of(ty, method)
                .ok_or_else(|| EvalError::UnknownMethod {
                    ty: ty.clone(),
                    method: method.to_string(),
                })?;
        if descriptor.params.len() != args.len() {
            return Err(EvalError::ArgumentMismatch {
                method: format!("{owner}.{method}"),
                expected: descriptor.params.len(),
                found: args.len(),
            });
        }
        let body = [ty, owner]
            .into_iter()
            .find_map(|t| self.behaviors.get(t).and_then(|b| b.methods.get(method)))
            .ok_or_else(|| EvalError::MissingBehavior {
                ty: owner.clone(),
                method: method.to_string(),
            })?;
        body(target, args)
    }

    /// Release `target`: count the disposal, then run the dispose hook.
    pub fn dispose(&self, target: &ObjectRef) -> EvalResult<()> {
        let count = target.mark_disposed();
        tracing::debug!(ty = %target.type_name(), count, "disposed");
        match self
            .behaviors
            .get(target.type_name())
            .and_then(|b| b.on_dispose.as_ref())
        {
            Some(hook) => hook(target),
            None => Ok(()),
        }
    }
}

fn no_matching_constructor(ty: &TypeName, args: &[Value]) -> EvalError {
    let found = args
        .iter()
        .map(|v| v.type_name().map_or_else(|| "null".to_string(), |t| t.to_string()))
        .collect::<Vec<_>>()
        .join(", ");
    EvalError::NoMatchingConstructor {
        ty: ty.clone(),
        found,
    }
}
