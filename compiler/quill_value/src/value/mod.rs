//! Runtime values for the Quill executor.
//!
//! Scalars are stored inline; strings, key/value pairs and host references
//! are `Arc`-backed so cloning a `Value` onto the calculator stack or into a
//! scope is cheap.

use std::fmt;
use std::sync::Arc;

use crate::function::HostFunction;
use crate::host::{HostObject, HostRef, ListValue, MapValue};

/// Runtime value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value; fresh declarations start here.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// `key: value` pair produced by named arguments.
    KeyValue(Arc<KeyValue>),
    /// Opaque handle to a host-owned object.
    Ref(HostRef),
}

/// Named value carried by `Value::KeyValue`.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: Value,
}

impl Value {
    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn key_value(key: impl Into<String>, value: Value) -> Self {
        Value::KeyValue(Arc::new(KeyValue {
            key: key.into(),
            value,
        }))
    }

    /// Wrap a host object.
    pub fn host<T: HostObject + 'static>(object: T) -> Self {
        Value::Ref(HostRef::new(object))
    }

    /// Host list holding `items`.
    pub fn list(items: Vec<Value>) -> Self {
        Value::host(ListValue::new(items))
    }

    /// Host map holding `entries`.
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::host(MapValue::from_entries(entries))
    }

    pub fn function(function: HostFunction) -> Self {
        Value::host(function)
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_host(&self) -> Option<&HostRef> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Strip key/value wrappers and host scalar views down to the value
    /// operators and coercions work on.
    pub fn scalar(&self) -> Value {
        match self {
            Value::KeyValue(kv) => kv.value.scalar(),
            Value::Ref(r) => match r.scalar() {
                Some(v) => v.scalar(),
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Name of the value's kind, as shown in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::KeyValue(_) => "keyvalue",
            Value::Ref(r) => r.type_name(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::KeyValue(kv) => write!(f, "KeyValue({:?}: {:?})", kv.key, kv.value),
            Value::Ref(r) => write!(f, "Ref({r:?})"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::KeyValue(kv) => write!(f, "{}: {}", kv.key, kv.value),
            Value::Ref(r) => write!(f, "{}", r.describe()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::KeyValue(a), Value::KeyValue(b)) => a == b,
            // Host objects are equal by identity
            (Value::Ref(a), Value::Ref(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}
