//! Call stack tracking for script function calls.
//!
//! Each script call pushes a `CallFrame`; the frame is popped when the call
//! unwinds. When an error leaves a script function, the live frames are
//! snapshotted into an `EvalBacktrace` and attached to the error.

use quill_ir::Position;
use quill_value::{stack_overflow, BacktraceFrame, EvalBacktrace, EvalError};

/// A single frame in the live call stack.
#[derive(Clone, Debug, PartialEq)]
pub struct CallFrame {
    /// Script function name.
    pub name: String,
    /// Where the call was made, not where the function is declared.
    pub call_position: Option<Position>,
}

impl CallFrame {
    pub fn new(name: impl Into<String>, call_position: Option<Position>) -> Self {
        CallFrame {
            name: name.into(),
            call_position,
        }
    }
}

/// Live call stack of the executor.
///
/// `max_depth` is `None` by default: recursion is bounded only by the
/// platform stack. Hosts that run untrusted scripts set a limit through
/// `ExecutorBuilder::max_call_depth`.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a call frame, checking the depth limit.
    ///
    /// The frame is NOT pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(stack_overflow(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the most recent call frame.
    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Snapshot of the current frames, most recent call first.
    pub fn capture(&self) -> EvalBacktrace {
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|f| BacktraceFrame {
                name: f.name.clone(),
                position: f.call_position.clone(),
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Attach a backtrace of this stack to an error, unless the stack is empty.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}
