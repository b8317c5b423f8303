//! `ExecutorBuilder` for creating executors with various configurations.

use std::sync::Arc;

use quill_calc::Calculator;
use quill_ir::Script;
use quill_value::{EvalError, Value};

use super::{validate, Executor};
use crate::diagnostics::CallStack;
use crate::registry::Registry;
use crate::state::State;

/// Builder for `Executor`.
///
/// Defaults: the process-wide registry, no call depth limit, no globals.
#[derive(Default)]
pub struct ExecutorBuilder<'s> {
    scripts: Vec<&'s Script>,
    registry: Option<Arc<Registry>>,
    max_call_depth: Option<usize>,
    globals: Vec<(String, Value)>,
}

impl<'s> ExecutorBuilder<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source unit's functions. May be called once per unit.
    #[must_use]
    pub fn script(mut self, script: &'s Script) -> Self {
        self.scripts.push(script);
        self
    }

    /// Resolve builtins and packages against `registry` instead of the global one.
    #[must_use]
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Fail script calls nested deeper than `depth` with `StackOverflow`.
    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    /// Bind a global before any script code runs.
    #[must_use]
    pub fn global(mut self, name: impl Into<String>, value: Value) -> Self {
        self.globals.push((name.into(), value));
        self
    }

    /// Validate and register every function, then build the executor.
    ///
    /// Fails on a misplaced `break`/`continue` or a duplicate function.
    pub fn build(self) -> Result<Executor<'s>, EvalError> {
        let ExecutorBuilder {
            scripts,
            registry,
            max_call_depth,
            globals,
        } = self;

        let mut state = State::new(registry.unwrap_or_else(Registry::global));
        for script in scripts.iter().copied() {
            for decl in &script.functions {
                validate::check_function(decl)?;
                state.functions_mut().register(decl)?;
            }
        }
        for (name, value) in globals {
            state.define(&name, value);
        }
        tracing::debug!(
            functions = state.functions().len(),
            max_call_depth,
            "executor ready"
        );

        Ok(Executor {
            calc: Calculator::new(),
            state,
            call_stack: CallStack::new(max_call_depth),
            current_function: None,
        })
    }
}
