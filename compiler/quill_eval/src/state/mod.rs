//! Scope store: variables, script functions and host registry lookups.
//!
//! `State` is what the executor resolves names against. Variable lookups walk
//! the current scope's resolution chain; a dotted name projects each further
//! segment through the previous value; a root name no scope binds falls back
//! to the registry's packages.

mod environment;
mod functions;

use std::sync::Arc;

use quill_value::{as_int, cannot_index, index_out_of_bounds, EvalError, Value};

use crate::registry::Registry;

pub use environment::{Environment, LocalScope, Scope, BLANK};
pub use functions::FunctionTable;

#[derive(Debug)]
pub struct State<'s> {
    env: Environment,
    functions: FunctionTable<'s>,
    registry: Arc<Registry>,
}

impl<'s> State<'s> {
    pub fn new(registry: Arc<Registry>) -> Self {
        State {
            env: Environment::new(),
            functions: FunctionTable::new(),
            registry,
        }
    }

    /// Bind `name` to Nil in the current scope. No-op for `_`.
    pub fn declare(&mut self, name: &str) {
        self.env.declare(name);
    }

    /// Bind `name` to `value` in the current scope.
    pub fn define(&mut self, name: &str, value: Value) {
        self.env.define(name, value);
    }

    /// Mutate the first declaring scope. Returns false when `name` is undeclared.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        self.env.assign(name, value)
    }

    /// Resolve a plain or dotted name. A missing segment is a miss.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut segments = name.split('.');
        let root = segments.next()?;
        let mut value = self.resolve_root(root)?;
        for segment in segments {
            value = project_field(&value, segment)?;
        }
        Some(value)
    }

    /// Variable bound in scope, else a registered package.
    pub fn resolve_root(&self, name: &str) -> Option<Value> {
        self.env
            .lookup(name)
            .or_else(|| self.registry.package(name))
    }

    /// Whether a scope binds `name` (packages excluded).
    pub fn is_declared(&self, name: &str) -> bool {
        self.env.lookup(name).is_some()
    }

    pub fn new_scope(&mut self) {
        self.env.push_scope();
    }

    /// Scope for a function body: resolves through globals only.
    pub fn new_root_scope(&mut self) {
        self.env.push_root_scope();
    }

    pub fn end_scope(&mut self) {
        self.env.pop_scope();
    }

    pub fn depth(&self) -> usize {
        self.env.depth()
    }

    pub fn global_scope(&self) -> LocalScope<Scope> {
        self.env.global().clone()
    }

    pub fn functions(&self) -> &FunctionTable<'s> {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionTable<'s> {
        &mut self.functions
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

/// `value.name`: field capability first, then key access with a string key.
///
/// Key/value pairs expose `key` and `value`; other names see through to the
/// pair's value.
pub fn project_field(value: &Value, name: &str) -> Option<Value> {
    match value {
        Value::KeyValue(kv) => match name {
            "key" => Some(Value::string(kv.key.as_str())),
            "value" => Some(kv.value.clone()),
            _ => project_field(&kv.value, name),
        },
        Value::Ref(r) => r
            .fields()
            .and_then(|fields| fields.get_field(name))
            .or_else(|| {
                r.indexed()
                    .and_then(|indexed| indexed.get_index(&Value::string(name)).ok().flatten())
            }),
        _ => None,
    }
}

/// `container[key]`. A keyed miss reads as Nil; strings index by byte.
pub fn index_value(container: &Value, key: &Value) -> Result<Value, EvalError> {
    match container {
        Value::KeyValue(kv) => index_value(&kv.value, key),
        Value::Ref(r) => match r.indexed() {
            Some(indexed) => Ok(indexed.get_index(key)?.unwrap_or_default()),
            None => Err(cannot_index(r.type_name())),
        },
        Value::Str(s) => {
            let index = as_int(key)?;
            usize::try_from(index)
                .ok()
                .and_then(|i| s.as_bytes().get(i))
                .map(|b| Value::Int(i64::from(*b)))
                .ok_or_else(|| index_out_of_bounds(index))
        }
        other => Err(cannot_index(other.type_name())),
    }
}
