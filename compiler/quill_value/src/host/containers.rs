//! Ready-made host containers: lists, maps and packages.
//!
//! These are ordinary host objects; the executor treats them exactly like
//! any type a host registers. Composite call results are returned as lists.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::{Fields, HostObject, Indexed};
use crate::coerce::{as_int, as_string};
use crate::errors::{index_out_of_bounds, EvalError};
use crate::function::{HostFunction, ParamKind, Signature};
use crate::value::Value;

/// Growable sequence of values.
#[derive(Debug, Default)]
pub struct ListValue {
    items: Mutex<Vec<Value>>,
}

impl ListValue {
    pub fn new(items: Vec<Value>) -> Self {
        ListValue {
            items: Mutex::new(items),
        }
    }

    /// Snapshot of the current elements.
    pub fn items(&self) -> Vec<Value> {
        self.items.lock().clone()
    }

    pub fn push(&self, value: Value) {
        self.items.lock().push(value);
    }

    fn position(&self, key: &Value, len: usize) -> Result<usize, EvalError> {
        let index = as_int(key)?;
        usize::try_from(index)
            .ok()
            .filter(|i| *i < len)
            .ok_or_else(|| index_out_of_bounds(index))
    }
}

impl HostObject for ListValue {
    fn type_name(&self) -> &str {
        "list"
    }

    fn describe(&self) -> String {
        // Held lock: this list is already being rendered further up.
        let Some(items) = self.items.try_lock() else {
            return "[...]".to_string();
        };
        let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
        format!("[{}]", parts.join(", "))
    }

    fn indexed(&self) -> Option<&dyn Indexed> {
        Some(self)
    }

    fn len(&self) -> Option<usize> {
        Some(self.items.lock().len())
    }

    fn method(self: Arc<Self>, name: &str) -> Option<HostFunction> {
        match name {
            "len" => {
                let list = Arc::clone(&self);
                Some(HostFunction::new("len", Signature::fixed(vec![]), move |_| {
                    let len = list.items.lock().len();
                    Ok(vec![Value::Int(i64::try_from(len).unwrap_or(i64::MAX))])
                }))
            }
            "append" => {
                let list = Arc::clone(&self);
                Some(HostFunction::new(
                    "append",
                    Signature::variadic(vec![], ParamKind::Any),
                    move |args| {
                        list.items.lock().extend(args);
                        Ok(vec![])
                    },
                ))
            }
            _ => None,
        }
    }
}

impl Indexed for ListValue {
    fn get_index(&self, key: &Value) -> Result<Option<Value>, EvalError> {
        let items = self.items.lock();
        let pos = self.position(key, items.len())?;
        Ok(items.get(pos).cloned())
    }

    fn set_index(&self, key: &Value, value: Value) -> Result<(), EvalError> {
        let mut items = self.items.lock();
        let pos = self.position(key, items.len())?;
        if let Some(slot) = items.get_mut(pos) {
            *slot = value;
        }
        Ok(())
    }
}

/// String-keyed map, iterated in key order.
#[derive(Debug, Default)]
pub struct MapValue {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MapValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        MapValue {
            entries: Mutex::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.entries.lock().insert(key.into(), value);
    }
}

impl HostObject for MapValue {
    fn type_name(&self) -> &str {
        "map"
    }

    fn describe(&self) -> String {
        let Some(entries) = self.entries.try_lock() else {
            return "{...}".to_string();
        };
        let parts: Vec<String> = entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        format!("{{{}}}", parts.join(", "))
    }

    fn fields(&self) -> Option<&dyn Fields> {
        Some(self)
    }

    fn indexed(&self) -> Option<&dyn Indexed> {
        Some(self)
    }

    fn entries(&self) -> Option<Vec<(Value, Value)>> {
        let entries = self.entries.lock();
        Some(
            entries
                .iter()
                .map(|(k, v)| (Value::string(k.as_str()), v.clone()))
                .collect(),
        )
    }

    fn len(&self) -> Option<usize> {
        Some(self.entries.lock().len())
    }

    fn method(self: Arc<Self>, name: &str) -> Option<HostFunction> {
        match name {
            "keys" => {
                let map = Arc::clone(&self);
                Some(HostFunction::new("keys", Signature::fixed(vec![]), move |_| {
                    let keys = map
                        .entries
                        .lock()
                        .keys()
                        .map(|k| Value::string(k.as_str()))
                        .collect();
                    Ok(vec![Value::list(keys)])
                }))
            }
            _ => None,
        }
    }
}

impl Fields for MapValue {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.get(name)
    }

    fn set_field(&self, name: &str, value: Value) -> Result<(), EvalError> {
        self.insert(name, value);
        Ok(())
    }
}

impl Indexed for MapValue {
    fn get_index(&self, key: &Value) -> Result<Option<Value>, EvalError> {
        Ok(self.get(&as_string(key)?))
    }

    fn set_index(&self, key: &Value, value: Value) -> Result<(), EvalError> {
        self.insert(as_string(key)?, value);
        Ok(())
    }
}

/// Named set of host functions and constants, reachable as `name.member`.
#[derive(Debug)]
pub struct Package {
    name: String,
    functions: FxHashMap<String, HostFunction>,
    constants: FxHashMap<String, Value>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            functions: FxHashMap::default(),
            constants: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn function(mut self, function: HostFunction) -> Self {
        self.functions.insert(function.name().to_string(), function);
        self
    }

    #[must_use]
    pub fn constant(mut self, name: impl Into<String>, value: Value) -> Self {
        self.constants.insert(name.into(), value);
        self
    }
}

impl HostObject for Package {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        format!("<package {}>", self.name)
    }

    fn fields(&self) -> Option<&dyn Fields> {
        Some(self)
    }

    fn method(self: Arc<Self>, name: &str) -> Option<HostFunction> {
        self.functions.get(name).cloned()
    }
}

impl Fields for Package {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.constants
            .get(name)
            .cloned()
            .or_else(|| self.functions.get(name).cloned().map(Value::function))
    }
}
