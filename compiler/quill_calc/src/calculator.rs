//! The `Calculator`: an operand stack plus named operators.

use std::fmt::Write as _;
use std::ops::{Deref, DerefMut};

use quill_value::{empty_stack, EvalError, Value};

use crate::operators::{binary_op, unary_op};

/// Micro-program instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Push(Value),
    Swap,
    Dup,
    Drop,
    Over,
    Rot,
    /// Apply a unary operator, by name, to the top.
    Op1(String),
    /// Apply a binary operator, by name, to the top two.
    Op2(String),
}

impl Instruction {
    pub fn op1(name: &str) -> Self {
        Instruction::Op1(name.to_string())
    }

    pub fn op2(name: &str) -> Self {
        Instruction::Op2(name.to_string())
    }
}

/// Operand stack owned by a single evaluation context.
#[derive(Debug, Default)]
pub struct Calculator {
    stack: Vec<Value>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Result<Value, EvalError> {
        self.stack.pop().ok_or_else(empty_stack)
    }

    /// Pops the top two values as `(second, top)`.
    pub fn pop2(&mut self) -> Result<(Value, Value), EvalError> {
        self.require(2)?;
        let b = self.pop()?;
        let a = self.pop()?;
        Ok((a, b))
    }

    pub fn peek(&self) -> Result<&Value, EvalError> {
        self.stack.last().ok_or_else(empty_stack)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// `a b -- b a`
    pub fn swap(&mut self) -> Result<(), EvalError> {
        self.require(2)?;
        let n = self.stack.len();
        self.stack.swap(n - 2, n - 1);
        Ok(())
    }

    /// `a -- a a`
    pub fn dup(&mut self) -> Result<(), EvalError> {
        let top = self.peek()?.clone();
        self.stack.push(top);
        Ok(())
    }

    /// `a --`
    pub fn drop(&mut self) -> Result<(), EvalError> {
        self.pop().map(|_| ())
    }

    /// `a b -- a b a`
    pub fn over(&mut self) -> Result<(), EvalError> {
        self.require(2)?;
        let second = self.stack[self.stack.len() - 2].clone();
        self.stack.push(second);
        Ok(())
    }

    /// `a b c -- b c a`
    pub fn rot(&mut self) -> Result<(), EvalError> {
        self.require(3)?;
        let n = self.stack.len();
        self.stack[n - 3..].rotate_left(1);
        Ok(())
    }

    /// Replace the top with `name` applied to it.
    pub fn op1(&mut self, name: &str) -> Result<(), EvalError> {
        let value = self.pop()?;
        let result = unary_op(name, &value)?;
        self.push(result);
        Ok(())
    }

    /// Replace the top two with `name` applied to them.
    pub fn op2(&mut self, name: &str) -> Result<(), EvalError> {
        let (a, b) = self.pop2()?;
        let result = binary_op(name, &a, &b)?;
        self.push(result);
        Ok(())
    }

    /// Run `task` against an empty stack and return whatever it left on top.
    ///
    /// The previous stack is restored afterwards whether the task succeeds,
    /// fails or panics.
    pub fn calculate<F>(&mut self, task: F) -> Result<Option<Value>, EvalError>
    where
        F: FnOnce(&mut Calculator) -> Result<(), EvalError>,
    {
        let mut isolated = self.isolated();
        task(&mut *isolated)?;
        Ok(isolated.stack.pop())
    }

    /// Swap in an empty stack until the returned guard drops.
    pub fn isolated(&mut self) -> IsolatedStack<'_> {
        let saved = self.replace_stack(Vec::new());
        IsolatedStack {
            calculator: self,
            saved,
        }
    }

    /// Install `stack`, returning the previous one.
    pub fn replace_stack(&mut self, stack: Vec<Value>) -> Vec<Value> {
        std::mem::replace(&mut self.stack, stack)
    }

    /// Run a micro-program.
    pub fn process(&mut self, program: &[Instruction]) -> Result<(), EvalError> {
        for instruction in program {
            match instruction {
                Instruction::Push(v) => self.push(v.clone()),
                Instruction::Swap => self.swap()?,
                Instruction::Dup => self.dup()?,
                Instruction::Drop => self.drop()?,
                Instruction::Over => self.over()?,
                Instruction::Rot => self.rot()?,
                Instruction::Op1(name) => self.op1(name)?,
                Instruction::Op2(name) => self.op2(name)?,
            }
        }
        Ok(())
    }

    /// Stack contents, top last, one per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (i, value) in self.stack.iter().enumerate() {
            let _ = writeln!(out, "{i}: {value:?}");
        }
        tracing::trace!(depth = self.stack.len(), "calculator dump");
        out
    }

    fn require(&self, depth: usize) -> Result<(), EvalError> {
        if self.stack.len() < depth {
            return Err(empty_stack());
        }
        Ok(())
    }
}

/// RAII guard that restores the calculator's previous stack on drop.
///
/// Dereferences to the `Calculator`, which holds an empty stack while the
/// guard is alive.
pub struct IsolatedStack<'a> {
    calculator: &'a mut Calculator,
    saved: Vec<Value>,
}

impl Drop for IsolatedStack<'_> {
    fn drop(&mut self) {
        let saved = std::mem::take(&mut self.saved);
        self.calculator.replace_stack(saved);
    }
}

impl Deref for IsolatedStack<'_> {
    type Target = Calculator;

    fn deref(&self) -> &Self::Target {
        self.calculator
    }
}

impl DerefMut for IsolatedStack<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.calculator
    }
}
