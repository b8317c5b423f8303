//! RAII guards for executor state.
//!
//! Every guard holds `&mut Executor` and implements `Deref`/`DerefMut`, so
//! code inside a scope uses the executor as usual. Whatever the guard set up
//! is undone on drop, on every exit path including `?` and unwinding panics:
//!
//! - `scoped()` pops the block scope it pushed
//! - `isolated()` restores the calculator stack it swapped out
//! - `enter_function()` pops the call frame and root scope and restores the
//!   current function

use std::ops::{Deref, DerefMut};

use quill_ir::{FuncDecl, Position};
use quill_value::{EvalError, Value};

use super::Executor;
use crate::diagnostics::CallFrame;

enum Restore<'s> {
    Scope,
    Stack(Vec<Value>),
    Function { previous: Option<&'s FuncDecl> },
}

/// Guard undoing one piece of executor state on drop.
pub struct ScopedExecutor<'guard, 's> {
    executor: &'guard mut Executor<'s>,
    restore: Restore<'s>,
}

impl Drop for ScopedExecutor<'_, '_> {
    fn drop(&mut self) {
        match &mut self.restore {
            Restore::Scope => self.executor.state.end_scope(),
            Restore::Stack(saved) => {
                self.executor.calc.replace_stack(std::mem::take(saved));
            }
            Restore::Function { previous } => {
                self.executor.current_function = *previous;
                self.executor.call_stack.pop();
                self.executor.state.end_scope();
            }
        }
    }
}

impl<'s> Deref for ScopedExecutor<'_, 's> {
    type Target = Executor<'s>;

    fn deref(&self) -> &Self::Target {
        self.executor
    }
}

impl DerefMut for ScopedExecutor<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.executor
    }
}

impl<'s> Executor<'s> {
    /// Push a block scope, popped when the guard drops.
    pub(crate) fn scoped(&mut self) -> ScopedExecutor<'_, 's> {
        self.state.new_scope();
        ScopedExecutor {
            executor: self,
            restore: Restore::Scope,
        }
    }

    /// Run `f` inside a new block scope.
    pub(crate) fn with_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedExecutor<'_, 's>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Give the calculator a fresh stack until the guard drops.
    pub(crate) fn isolated(&mut self) -> ScopedExecutor<'_, 's> {
        let saved = self.calc.replace_stack(Vec::new());
        ScopedExecutor {
            executor: self,
            restore: Restore::Stack(saved),
        }
    }

    /// Enter a script function: call frame, root scope, current function.
    ///
    /// Fails without changing anything when the call depth limit is reached.
    pub(crate) fn enter_function(
        &mut self,
        decl: &'s FuncDecl,
        call_position: Option<Position>,
    ) -> Result<ScopedExecutor<'_, 's>, EvalError> {
        self.call_stack
            .push(CallFrame::new(decl.name.as_str(), call_position))?;
        self.state.new_root_scope();
        let previous = self.current_function.replace(decl);
        Ok(ScopedExecutor {
            executor: self,
            restore: Restore::Function { previous },
        })
    }
}
