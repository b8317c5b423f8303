//! Control signals.
//!
//! Statements report how they finished through `ControlSignal`; failures
//! travel on the `Err` side of `ExecResult`. Loops absorb `Break` and
//! `Continue`, call boundaries absorb `Return`.

use quill_value::{EvalError, Value};

/// How a statement finished.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlSignal {
    Normal,
    Break,
    Continue,
    Return(Value),
}

impl ControlSignal {
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, ControlSignal::Normal)
    }
}

/// Result of executing a statement.
pub type ExecResult = Result<ControlSignal, EvalError>;
