//! Expression evaluation.
//!
//! `eval_expr` pushes the expression's value onto the calculator, or nothing
//! for a call that returned no result. Binary chains are applied left to
//! right immediately after each right operand is pushed, so `a+b-c-d`
//! evaluates as `((a+b)-c)-d`.

use quill_ir::{Expr, ExprKind};
use quill_value::{as_bool, no_result, EvalError, Value};

use super::Executor;

impl Executor<'_> {
    /// Evaluate `expr` onto the current stack.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<(), EvalError> {
        self.eval_kind(expr).map_err(|e| e.at(&expr.pos))
    }

    fn eval_kind(&mut self, expr: &Expr) -> Result<(), EvalError> {
        match &expr.kind {
            ExprKind::Int(i) => self.calc.push(Value::Int(*i)),
            ExprKind::Float(f) => self.calc.push(Value::Float(*f)),
            ExprKind::Str(s) => self.calc.push(Value::string(s.as_str())),
            ExprKind::Bool(b) => self.calc.push(Value::Bool(*b)),
            ExprKind::Null => self.calc.push(Value::Nil),
            ExprKind::Paren(inner) => self.eval_expr(inner)?,
            ExprKind::Path(path) => {
                let value = self.read_path(path)?;
                self.calc.push(value);
            }
            ExprKind::Unary { op, operand } => {
                self.eval_operand(operand)?;
                self.calc.op1(op.as_symbol())?;
            }
            ExprKind::Binary { first, rest } => {
                self.eval_operand(first)?;
                for (op, operand) in rest {
                    self.eval_operand(operand)?;
                    self.calc.op2(op.as_symbol())?;
                }
            }
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => {
                if self.condition(cond)? {
                    self.eval_expr(then)?;
                } else {
                    self.eval_expr(otherwise)?;
                }
            }
            ExprKind::Assign { target, op, value } => self.eval_assign(target, *op, value)?,
            ExprKind::IncDec {
                target,
                increment,
                prefix,
            } => self.eval_inc_dec(target, *increment, *prefix)?,
            ExprKind::Call(call) => {
                if let Some(value) = self.eval_call(call)? {
                    self.calc.push(value);
                }
            }
            ExprKind::KeyValue { key, value } => {
                let value = self.eval_value(value, "key/value")?;
                self.calc.push(Value::key_value(key.as_str(), value));
            }
        }
        Ok(())
    }

    /// Evaluate an operand that must leave exactly one value on the stack.
    fn eval_operand(&mut self, expr: &Expr) -> Result<(), EvalError> {
        let before = self.calc.len();
        self.eval_expr(expr)?;
        if self.calc.len() == before {
            return Err(no_result("operand").at(&expr.pos));
        }
        Ok(())
    }

    /// Evaluate against a fresh stack; the outer stack is untouched whether
    /// or not evaluation succeeds.
    pub(crate) fn evaluate_isolated(&mut self, expr: &Expr) -> Result<Option<Value>, EvalError> {
        let mut isolated = self.isolated();
        isolated.eval_expr(expr)?;
        Ok(isolated.calc.pop().ok())
    }

    /// Isolated evaluation that must produce a value; `what` names the
    /// consumer in the `NoResult` error.
    pub(crate) fn eval_value(&mut self, expr: &Expr, what: &str) -> Result<Value, EvalError> {
        self.evaluate_isolated(expr)?
            .ok_or_else(|| no_result(what).at(&expr.pos))
    }

    pub(crate) fn condition(&mut self, expr: &Expr) -> Result<bool, EvalError> {
        let value = self.eval_value(expr, "condition")?;
        as_bool(&value).map_err(|e| e.at(&expr.pos))
    }
}
