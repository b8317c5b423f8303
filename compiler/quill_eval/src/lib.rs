//! Quill Eval - scope store and executor for Quill scripts.
//!
//! # Architecture
//!
//! - `State`: chained lexical scopes, the script function table and the
//!   host registry the executor resolves names against
//! - `Executor`: walks statements and expressions, driving a
//!   `quill_calc::Calculator` for operator evaluation
//! - `Registry`: process-wide (or injected) builtin functions and packages
//! - `ControlSignal`: break/continue/return threaded through statement results
//!
//! # Re-exports
//!
//! Value and error types come from `quill_value`, AST types from `quill_ir`.

mod diagnostics;
pub mod executor;
mod registry;
mod signal;
pub mod state;

use std::sync::Once;

pub use diagnostics::{CallFrame, CallStack};
pub use executor::{Executor, ExecutorBuilder};
pub use registry::{Registry, RegistryError};
pub use signal::{ControlSignal, ExecResult};
pub use state::{Environment, FunctionTable, LocalScope, Scope, State};

pub use quill_ir::{AstBuilder, Position, Script};
pub use quill_value::{
    EvalError, EvalErrorKind, EvalResult, HostFunction, HostObject, ParamKind, Signature, Value,
};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// The executor only emits events; embedding hosts call this once at startup
/// (or install their own subscriber instead). Does nothing when `RUST_LOG`
/// is unset or invalid, or when a global subscriber already exists. Repeated
/// calls are no-ops.
///
/// `RUST_LOG=quill_eval=debug` shows call dispatch, `=trace` adds loop
/// iterations.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return;
        };
        let installed = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init();
        if installed.is_err() {
            tracing::debug!("global subscriber already set");
        }
    });
}
