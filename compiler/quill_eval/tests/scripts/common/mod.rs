//! Shared helpers for script tests.

#![allow(dead_code, reason = "helpers are shared across test modules")]


use std::sync::Arc;

use quill_eval::{EvalError, Executor, Registry, Value};
use quill_ir::{AstBuilder, Script, Stmt};

#[allow(unused_imports, reason = "not every test module uses every fixture")]
pub use fixtures::*;

pub fn b() -> AstBuilder {
    AstBuilder::new("test.q")
}

/// Registry with the core builtins only.
pub fn registry() -> Arc<Registry> {
    Arc::new(Registry::with_core())
}

/// `func main() { body }`.
pub fn main(body: Vec<Stmt>) -> Script {
    b().main(body)
}

/// Executor over `script` with a global `result` declared for scripts to write.
pub fn executor_with(script: &Script, registry: Arc<Registry>) -> Executor<'_> {
    quill_eval::init_tracing();
    Executor::builder()
        .script(script)
        .registry(registry)
        .global("result", Value::Nil)
        .build()
        .expect("script should build")
}

/// Run `main` and return the global `result`.
pub fn run_result(script: &Script) -> Value {
    run_result_with(script, registry())
}

pub fn run_result_with(script: &Script, registry: Arc<Registry>) -> Value {
    let mut exec = executor_with(script, registry);
    exec.run().expect("script should run");
    exec.get_global("result").expect("result is declared")
}

/// Run `main`, expecting it to fail.
pub fn run_err(script: &Script) -> EvalError {
    run_err_with(script, registry())
}

pub fn run_err_with(script: &Script, registry: Arc<Registry>) -> EvalError {
    let mut exec = executor_with(script, registry);
    exec.run().expect_err("script should fail")
}
