//! Runtime values and the object model.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use framekit_types::{Literal, Primitive, TypeName};
use parking_lot::Mutex;

/// Shared handle to a runtime object. Cloning shares identity.
pub type ObjectRef = Arc<Object>;

/// A value flowing through an interpreted method.
///
/// Objects compare by identity; everything else by value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Double(f64),
    Str(String),
    Object(ObjectRef),
}

impl Value {
    /// The runtime type of this value; `None` for `null`.
    pub fn type_name(&self) -> Option<TypeName> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(Primitive::Boolean.type_name()),
            Value::Int(_) => Some(Primitive::Int32.type_name()),
            Value::Double(_) => Some(Primitive::Double.type_name()),
            Value::Str(_) => Some(Primitive::String.type_name()),
            Value::Object(obj) => Some(obj.type_name().clone()),
        }
    }

    /// The zero value for a field or local of type `ty`.
    pub fn default_for(ty: &TypeName) -> Self {
        match ty.primitive() {
            Some(Primitive::Int32) => Value::Int(0),
            Some(Primitive::Double) => Value::Double(0.0),
            Some(Primitive::Boolean) => Value::Bool(false),
            Some(Primitive::String) | None => Value::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d:?}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Object(obj) => write!(f, "<{}>", obj.type_name()),
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::Int(*i),
            Literal::Double(d) => Value::Double(*d),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Object
// ══════════════════════════════════════════════════════════════════════════════

/// An instance of a catalog type.
///
/// Fields sit behind a mutex so one object can be shared by concurrent
/// invocations; the disposal counter is observable by tests and hooks.
#[derive(Debug)]
pub struct Object {
    type_name: TypeName,
    fields: Mutex<BTreeMap<String, Value>>,
    disposals: AtomicUsize,
}

impl Object {
    pub fn new(type_name: TypeName) -> ObjectRef {
        Arc::new(Self {
            type_name,
            fields: Mutex::new(BTreeMap::new()),
            disposals: AtomicUsize::new(0),
        })
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// The current value of a field, if it has ever been set.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.lock().get(name).cloned()
    }

    pub fn set_field(&self, name: &str, value: Value) {
        self.fields.lock().insert(name.to_string(), value);
    }

    /// A snapshot of every field, sorted by name.
    pub fn fields(&self) -> BTreeMap<String, Value> {
        self.fields.lock().clone()
    }

    /// How many times the owning disposal scope released this object.
    pub fn dispose_count(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }

    pub fn is_disposed(&self) -> bool {
        self.dispose_count() > 0
    }

    pub(crate) fn mark_disposed(&self) -> usize {
        self.disposals.fetch_add(1, Ordering::SeqCst) + 1
    }
}
