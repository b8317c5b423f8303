//! Script function table.
//!
//! Public functions are keyed by name. Private functions (leading `_`) are
//! keyed by their declaring unit as well, so two units may each define
//! `_helper` and only see their own.

use rustc_hash::FxHashMap;

use quill_ir::FuncDecl;
use quill_value::{duplicate_function, EvalError};

#[derive(Clone, Debug, Default)]
pub struct FunctionTable<'s> {
    functions: FxHashMap<String, &'s FuncDecl>,
}

impl<'s> FunctionTable<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table key of `name` as seen from `unit`.
    pub fn key(unit: &str, name: &str) -> String {
        if name.starts_with('_') {
            format!("!{unit}!{name}")
        } else {
            name.to_string()
        }
    }

    /// Add a declaration. A second declaration under the same key fails,
    /// naming the first one's position.
    pub fn register(&mut self, decl: &'s FuncDecl) -> Result<(), EvalError> {
        let key = Self::key(&decl.pos.unit, &decl.name);
        if let Some(previous) = self.functions.get(&key) {
            return Err(
                duplicate_function(decl.is_private(), &decl.name, &previous.pos).at(&decl.pos),
            );
        }
        self.functions.insert(key, decl);
        Ok(())
    }

    /// Find `name` as called from `unit`.
    pub fn lookup(&self, unit: &str, name: &str) -> Option<&'s FuncDecl> {
        self.functions.get(&Self::key(unit, name)).copied()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
