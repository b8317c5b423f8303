//! Assignment and increment/decrement.
//!
//! Assignments are expressions: the stored value is pushed back so chained
//! assignments (`a = b = 1`) and conditions can use it.

use quill_calc::binary_op;
use quill_ir::{AssignOp, Expr, Path};
use quill_value::{cannot_set, EvalError, Value};

use super::Executor;

impl Executor<'_> {
    pub(crate) fn eval_assign(
        &mut self,
        target: &Path,
        op: AssignOp,
        value: &Expr,
    ) -> Result<(), EvalError> {
        let value = self.eval_value(value, "assignment")?;
        let stored = match op {
            AssignOp::Declare => {
                if !target.is_simple() {
                    return Err(cannot_set(&target.to_string()));
                }
                self.state.define(target.root(), value.clone());
                value
            }
            AssignOp::Set => {
                let place = self.resolve_place(target)?;
                place.write(&mut self.state, value.clone())?;
                value
            }
            AssignOp::Compound(op) => {
                let place = self.resolve_place(target)?;
                let current = place.read(&self.state)?;
                let updated = binary_op(op.as_symbol(), &current, &value)?;
                place.write(&mut self.state, updated.clone())?;
                updated
            }
        };
        self.calc.push(stored);
        Ok(())
    }

    /// `++x` / `x++` / `--x` / `x--`. Pushes the new value for prefix forms
    /// and the old one for postfix forms.
    pub(crate) fn eval_inc_dec(
        &mut self,
        target: &Path,
        increment: bool,
        prefix: bool,
    ) -> Result<(), EvalError> {
        let place = self.resolve_place(target)?;
        let old = place.read(&self.state)?;
        let op = if increment { "+" } else { "-" };
        let new = binary_op(op, &old, &Value::Int(1))?;
        place.write(&mut self.state, new.clone())?;
        self.calc.push(if prefix { new } else { old });
        Ok(())
    }
}
