//! Tree-walking executor.
//!
//! The executor owns a `Calculator` for operator evaluation and a `State` for
//! names. Expressions push their value onto the calculator; statements report
//! how they finished through `ControlSignal`. Nested evaluations whose value
//! is consumed by the executor itself (conditions, arguments, right-hand
//! sides) run against an isolated stack.
//!
//! # Module Structure
//!
//! - `builder`: `ExecutorBuilder`, function registration and validation
//! - `scope_guard`: RAII guards for scopes, stacks and call frames
//! - `expr`: expression evaluation
//! - `path`: variable/field/index reads and assignment targets
//! - `assign`: `=`, `:=`, `op=`, `++`/`--`
//! - `control`: blocks, `if`, loops
//! - `range`: `for ... range` cursors
//! - `switch`, `try_stmt`: the remaining compound statements
//! - `call`: function dispatch
//! - `validate`: `break`/`continue` placement

mod assign;
mod builder;
mod call;
mod control;
mod expr;
mod path;
mod range;
mod scope_guard;
mod switch;
mod try_stmt;
mod validate;

use quill_calc::Calculator;
use quill_ir::{Expr, FuncDecl, Position, Stmt};
use quill_value::{main_not_defined, undefined_function, EvalError, Value};

use crate::diagnostics::CallStack;
use crate::signal::ExecResult;
use crate::state::{LocalScope, Scope, State};

pub use builder::ExecutorBuilder;
pub use scope_guard::ScopedExecutor;

/// Executes scripts against a scope store and host registry.
///
/// `'s` is the lifetime of the scripts whose functions the executor calls.
#[derive(Debug)]
pub struct Executor<'s> {
    calc: Calculator,
    state: State<'s>,
    call_stack: CallStack,
    /// Script function whose body is executing; its unit qualifies private calls.
    current_function: Option<&'s FuncDecl>,
}

impl<'s> Executor<'s> {
    pub fn builder() -> ExecutorBuilder<'s> {
        ExecutorBuilder::new()
    }

    /// Executor for a single script using the global registry.
    pub fn new(script: &'s quill_ir::Script) -> Result<Self, EvalError> {
        Self::builder().script(script).build()
    }

    /// Invoke `main()`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self) -> Result<(), EvalError> {
        let main = self
            .state
            .functions()
            .lookup(Position::HOST_UNIT, "main")
            .ok_or_else(main_not_defined)?;
        self.call_script(main, Vec::new(), None)?;
        Ok(())
    }

    /// Call a public script function (or builtin) from the host.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Option<Value>, EvalError> {
        if let Some(decl) = self.state.functions().lookup(Position::HOST_UNIT, name) {
            return self.call_script(decl, args, None);
        }
        if let Some(builtin) = self.state.registry().builtin(name) {
            let args = builtin.signature().bind(args).map_err(|(_, err)| err)?;
            return call::invoke(&builtin, args).map(call::collect_results);
        }
        Err(undefined_function(name))
    }

    /// Execute a single statement in the current scope.
    pub fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        validate::check_statement(stmt)?;
        self.exec_stmt(stmt)
    }

    /// Evaluate an expression in isolation. `None` when it produced no value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Option<Value>, EvalError> {
        self.evaluate_isolated(expr)
    }

    /// The global scope, shared with the host before and after `run`.
    pub fn global_scope(&self) -> LocalScope<Scope> {
        self.state.global_scope()
    }

    pub fn set_global(&mut self, name: &str, value: Value) {
        self.state.global_scope().borrow_mut().define(name, value);
    }

    pub fn get_global(&self, name: &str) -> Option<Value> {
        self.state.global_scope().borrow().lookup(name)
    }

    pub fn state(&self) -> &State<'s> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State<'s> {
        &mut self.state
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calc
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }
}
