//! Host capabilities.
//!
//! The executor never knows the concrete type behind `Value::Ref`. It asks
//! the object for capabilities through `HostObject`'s accessors, each of which
//! defaults to "not supported":
//!
//! - `fields` for `obj.name` projection and assignment
//! - `indexed` for `obj[key]` access and assignment
//! - `entries` for map-like ranging
//! - `len` for sequence ranging (together with `indexed`)
//! - `iterable` for stateful `has_next`/`next` iteration
//! - `resource` for try-resource create/close
//! - `callable` and `method` for calls

mod containers;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::errors::{cannot_range, cannot_set, EvalError};
use crate::function::HostFunction;
use crate::value::Value;

pub use containers::{ListValue, MapValue, Package};

/// A host-owned object reachable from scripts.
///
/// Implementations use interior mutability for anything scripts may change;
/// every accessor takes `&self`.
pub trait HostObject: fmt::Debug + Send + Sync {
    fn type_name(&self) -> &str;

    /// Text shown when the value is printed or stringified for messages.
    fn describe(&self) -> String {
        format!("<{}>", self.type_name())
    }

    /// Scalar the object stands for in coercions and arithmetic.
    fn scalar(&self) -> Option<Value> {
        None
    }

    fn fields(&self) -> Option<&dyn Fields> {
        None
    }

    fn indexed(&self) -> Option<&dyn Indexed> {
        None
    }

    /// Key/value pairs in iteration order, for map-like objects.
    fn entries(&self) -> Option<Vec<(Value, Value)>> {
        None
    }

    fn len(&self) -> Option<usize> {
        None
    }

    fn iterable(&self) -> Option<&dyn Iterable> {
        None
    }

    fn resource(&self) -> Option<&dyn Resource> {
        None
    }

    fn callable(&self) -> Option<HostFunction> {
        None
    }

    /// Method bound to this object. The receiver is passed as an `Arc` so the
    /// returned function can keep it alive.
    fn method(self: Arc<Self>, name: &str) -> Option<HostFunction> {
        let _ = name;
        None
    }
}

/// Named field access.
pub trait Fields {
    fn get_field(&self, name: &str) -> Option<Value>;

    fn set_field(&self, name: &str, value: Value) -> Result<(), EvalError> {
        let _ = value;
        Err(cannot_set(name))
    }
}

/// Keyed or positional access (`obj[key]`).
pub trait Indexed {
    /// `Ok(None)` is a miss; out-of-range positions are errors.
    fn get_index(&self, key: &Value) -> Result<Option<Value>, EvalError>;

    fn set_index(&self, key: &Value, value: Value) -> Result<(), EvalError> {
        let _ = value;
        Err(cannot_set(&format!("[{key}]")))
    }
}

/// Stateful iteration.
pub trait Iterable {
    fn has_next(&self) -> bool;
    fn next(&self) -> Result<Value, EvalError>;
}

/// Value managed by a try-resource clause.
pub trait Resource {
    fn create(&self) -> Result<(), EvalError> {
        Ok(())
    }

    fn close(&self) -> Result<(), EvalError>;
}

/// Shared handle to a host object.
#[derive(Clone)]
pub struct HostRef(Arc<dyn HostObject>);

impl HostRef {
    pub fn new<T: HostObject + 'static>(object: T) -> Self {
        HostRef(Arc::new(object))
    }

    pub fn from_arc(object: Arc<dyn HostObject>) -> Self {
        HostRef(object)
    }

    pub fn ptr_eq(&self, other: &HostRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Look up a bound method.
    pub fn bound_method(&self, name: &str) -> Option<HostFunction> {
        Arc::clone(&self.0).method(name)
    }
}

impl Deref for HostRef {
    type Target = dyn HostObject;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Elements of an indexable sequence or a string, for spread arguments.
///
/// Strings yield their bytes as ints.
pub fn sequence_items(value: &Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::Str(s) => Ok(s.bytes().map(|b| Value::Int(i64::from(b))).collect()),
        Value::KeyValue(kv) => sequence_items(&kv.value),
        Value::Ref(r) => {
            let (Some(len), Some(indexed)) = (r.len(), r.indexed()) else {
                return Err(cannot_range(r.type_name()));
            };
            let mut items = Vec::with_capacity(len);
            for i in 0..len {
                let key = Value::Int(i64::try_from(i).unwrap_or(i64::MAX));
                items.push(indexed.get_index(&key)?.unwrap_or_default());
            }
            Ok(items)
        }
        other => Err(cannot_range(other.type_name())),
    }
}
