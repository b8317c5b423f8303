//! Host registry of builtin functions and packages.
//!
//! A registry is consulted by name during dispatch: builtins take priority
//! over script functions, packages resolve dotted roots (`math.sqrt`) that no
//! scope binds. Each `Executor` holds an `Arc<Registry>`; `Registry::global()`
//! is the process-wide default instance.
//!
//! Registration is write-once per name. The panicking `register_*` methods
//! treat a duplicate as a programming error; `try_register_*` report it.

use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use quill_value::{HostFunction, Value};

/// Duplicate registration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("function {0:?} already registered")]
    DuplicateBuiltin(String),
    #[error("package {0:?} already registered")]
    DuplicatePackage(String),
}

static GLOBAL: LazyLock<Arc<Registry>> = LazyLock::new(|| Arc::new(Registry::with_core()));

/// Builtin and package tables.
#[derive(Default)]
pub struct Registry {
    builtins: RwLock<FxHashMap<String, HostFunction>>,
    packages: RwLock<FxHashMap<String, Value>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the core builtins (`between`).
    pub fn with_core() -> Self {
        let registry = Self::new();
        registry.register_builtin("between", quill_calc::between_function());
        registry
    }

    /// The process-wide registry.
    pub fn global() -> Arc<Registry> {
        Arc::clone(&GLOBAL)
    }

    pub fn try_register_builtin(
        &self,
        name: &str,
        function: HostFunction,
    ) -> Result<(), RegistryError> {
        let mut builtins = self.builtins.write();
        if builtins.contains_key(name) {
            return Err(RegistryError::DuplicateBuiltin(name.to_string()));
        }
        tracing::debug!(name, "registered builtin");
        builtins.insert(name.to_string(), function);
        Ok(())
    }

    /// Register a builtin function.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    #[track_caller]
    pub fn register_builtin(&self, name: &str, function: HostFunction) {
        if let Err(err) = self.try_register_builtin(name, function) {
            panic!("{err}");
        }
    }

    pub fn try_register_package(&self, name: &str, package: Value) -> Result<(), RegistryError> {
        let mut packages = self.packages.write();
        if packages.contains_key(name) {
            return Err(RegistryError::DuplicatePackage(name.to_string()));
        }
        tracing::debug!(name, "registered package");
        packages.insert(name.to_string(), package);
        Ok(())
    }

    /// Register a package value under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    #[track_caller]
    pub fn register_package(&self, name: &str, package: Value) {
        if let Err(err) = self.try_register_package(name, package) {
            panic!("{err}");
        }
    }

    pub fn builtin(&self, name: &str) -> Option<HostFunction> {
        self.builtins.read().get(name).cloned()
    }

    pub fn package(&self, name: &str) -> Option<Value> {
        self.packages.read().get(name).cloned()
    }

    pub fn has_builtin(&self, name: &str) -> bool {
        self.builtins.read().contains_key(name)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builtins: Vec<String> = self.builtins.read().keys().cloned().collect();
        builtins.sort();
        let mut packages: Vec<String> = self.packages.read().keys().cloned().collect();
        packages.sort();
        f.debug_struct("Registry")
            .field("builtins", &builtins)
            .field("packages", &packages)
            .finish()
    }
}
