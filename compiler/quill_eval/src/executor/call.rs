//! Function dispatch.
//!
//! Resolution order for `name(args)`:
//!
//! 1. builtin in the registry
//! 2. script function; `_private` names resolve within the calling unit
//! 3. a callable value at `name` (variable, package member, field)
//! 4. a method bound to the receiver of a dotted name (`list.append`)
//!
//! Script calls run in a root scope with exact arity. Host calls cast
//! arguments to the declared parameter kinds and convert panics into
//! `HostPanic` errors.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use quill_ir::{CallExpr, FuncDecl, Position};
use quill_value::{
    host_panic, parameter_mismatch, sequence_items, undefined_function, EvalError,
    HostFunction, Value,
};

use super::Executor;
use crate::signal::ControlSignal;

impl<'s> Executor<'s> {
    #[tracing::instrument(level = "debug", skip_all, fields(name = %call.name))]
    pub(crate) fn eval_call(&mut self, call: &CallExpr) -> Result<Option<Value>, EvalError> {
        if let Some(builtin) = self.state.registry().builtin(&call.name) {
            tracing::debug!("builtin");
            return self.call_host(&builtin, call);
        }

        let unit = self.calling_unit(&call.pos);
        if let Some(decl) = self.state.functions().lookup(&unit, &call.name) {
            tracing::debug!("script function");
            let args = self.eval_args(call)?;
            return self.call_script(decl, args, Some(call.pos.clone()));
        }

        if let Some(function) = self.resolve_host_callee(call) {
            tracing::debug!(function = function.name(), "host callable");
            return self.call_host(&function, call);
        }

        Err(undefined_function(&call.name))
    }

    /// Unit private names resolve in: the running function's, else the call site's.
    fn calling_unit(&self, call_pos: &Position) -> Arc<str> {
        match self.current_function {
            Some(decl) => Arc::clone(&decl.pos.unit),
            None => Arc::clone(&call_pos.unit),
        }
    }

    fn resolve_host_callee(&self, call: &CallExpr) -> Option<HostFunction> {
        if let Some(Value::Ref(object)) = self.state.get(&call.name) {
            if let Some(function) = object.callable() {
                return Some(function);
            }
        }
        let (receiver, member) = call.receiver_and_member()?;
        match self.state.get(receiver)? {
            Value::Ref(object) => object.bound_method(member),
            Value::KeyValue(kv) => kv.value.as_host()?.bound_method(member),
            _ => None,
        }
    }

    /// Evaluate arguments left to right, each in isolation, expanding a
    /// trailing spread argument.
    fn eval_args(&mut self, call: &CallExpr) -> Result<Vec<Value>, EvalError> {
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_value(arg, "argument")?);
        }
        if call.spread {
            let last = args
                .pop()
                .ok_or_else(|| EvalError::new("'...' with no arguments"))?;
            let items = match call.args.last() {
                Some(expr) => sequence_items(&last).map_err(|e| e.at(&expr.pos))?,
                None => sequence_items(&last)?,
            };
            args.extend(items);
        }
        Ok(args)
    }

    fn call_host(
        &mut self,
        function: &HostFunction,
        call: &CallExpr,
    ) -> Result<Option<Value>, EvalError> {
        let args = self.eval_args(call)?;
        let args = function
            .signature()
            .bind(args)
            .map_err(|(index, err)| match index.and_then(|i| call.args.get(i)) {
                Some(arg) => err.at(&arg.pos),
                None => err,
            })?;
        invoke(function, args).map(collect_results)
    }

    /// Run a script function in a fresh root scope.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %decl.name))]
    pub(crate) fn call_script(
        &mut self,
        decl: &'s FuncDecl,
        args: Vec<Value>,
        call_position: Option<Position>,
    ) -> Result<Option<Value>, EvalError> {
        if args.len() != decl.params.len() {
            return Err(parameter_mismatch(decl.params.len(), args.len()));
        }

        let mut frame = self.enter_function(decl, call_position)?;
        for (param, arg) in decl.params.iter().zip(args) {
            frame.state.define(param, arg);
        }
        let outcome = frame
            .exec_stmts(&decl.body)
            .map_err(|err| frame.call_stack.attach_backtrace(err))?;

        Ok(match outcome {
            ControlSignal::Return(value) => Some(value),
            ControlSignal::Normal | ControlSignal::Break | ControlSignal::Continue => None,
        })
    }
}

/// Call a host function, converting a panic into an error.
pub(crate) fn invoke(function: &HostFunction, args: Vec<Value>) -> Result<Vec<Value>, EvalError> {
    match panic::catch_unwind(AssertUnwindSafe(|| function.call(args))) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::debug!(function = function.name(), %message, "host function panicked");
            Err(host_panic(message))
        }
    }
}

/// No results, one value, or a list of all of them.
pub(crate) fn collect_results(mut results: Vec<Value>) -> Option<Value> {
    match results.len() {
        0 => None,
        1 => results.pop(),
        _ => Some(Value::list(results)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "host function panicked".to_string()
}
