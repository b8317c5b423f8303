//! Chained lexical scopes.
//!
//! Uses a scope stack (not cloning) for scope management. Each scope holds
//! a *resolution parent* used for lookups; the stack itself records the
//! dynamic parent restored on exit. A root scope resolves straight to the
//! global scope while still sitting above its caller on the stack.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use quill_value::Value;

/// The blank placeholder; never bound.
pub const BLANK: &str = "_";

/// A single-threaded scope handle with interior mutability.
///
/// All scope allocations go through `LocalScope::new`. Scopes are not
/// thread-safe; each executor runs single-threaded.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &LocalScope<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A single scope containing variable bindings.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<String, Value>,
    /// Resolution parent.
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Bind `name` to Nil in this scope.
    #[inline]
    pub fn declare(&mut self, name: &str) {
        self.define(name, Value::Nil);
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    #[inline]
    pub fn define(&mut self, name: &str, value: Value) {
        if name == BLANK {
            return;
        }
        self.bindings.insert(name.to_string(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    /// Mutate the first scope along the resolution chain that declares `name`.
    ///
    /// Returns false when no scope does.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            return true;
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().assign(name, value);
        }
        false
    }

    /// Whether this scope itself (not a parent) binds `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Names bound in this scope, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Scope stack with the global scope at the bottom.
pub struct Environment {
    scopes: Vec<LocalScope<Scope>>,
    global: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a scope resolving through the current one.
    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Push a scope resolving directly through the global scope.
    #[inline]
    pub fn push_root_scope(&mut self) {
        let parent = self.global.clone();
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Pop the current scope. The global scope is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    #[inline]
    pub fn current_scope(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    pub fn global(&self) -> &LocalScope<Scope> {
        &self.global
    }

    #[inline]
    pub fn declare(&mut self, name: &str) {
        self.current().borrow_mut().declare(name);
    }

    #[inline]
    pub fn define(&mut self, name: &str, value: Value) {
        self.current().borrow_mut().define(name, value);
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.current().borrow().lookup(name)
    }

    #[inline]
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        self.current().borrow_mut().assign(name, value)
    }

    fn current(&self) -> &LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("depth", &self.scopes.len())
            .field("globals", &self.global.borrow().names())
            .finish()
    }
}
