//! Operator implementations for the calculator.
//!
//! Binary operands are unified first (see `quill_value::unify`), then the
//! handler for the unified kind runs. Each handler returns `None` for
//! operators its kind does not support; the dispatcher turns that into an
//! `UnsupportedOperation` naming the original operand kinds.

use quill_ir::{BinaryOp, UnaryOp};
use quill_value::{
    division_by_zero, float_eq, modulo_by_zero, negative_shift, undefined_operation, unify,
    unsupported_binary, unsupported_unary, EvalError, EvalResult, Value,
};

/// Apply a unary operator looked up by name.
pub fn unary_op(name: &str, value: &Value) -> EvalResult {
    let op = UnaryOp::from_symbol(name).ok_or_else(|| undefined_operation(name))?;
    evaluate_unary(op, value)
}

/// Apply a binary operator looked up by name.
pub fn binary_op(name: &str, left: &Value, right: &Value) -> EvalResult {
    let op = BinaryOp::from_symbol(name).ok_or_else(|| undefined_operation(name))?;
    evaluate_binary(op, left, right)
}

pub fn evaluate_unary(op: UnaryOp, value: &Value) -> EvalResult {
    let value = value.scalar();
    let result = match (op, &value) {
        (UnaryOp::Not, Value::Bool(b)) => Some(Value::Bool(!b)),
        (UnaryOp::Not, Value::Int(n)) => Some(Value::Bool(*n == 0)),
        (UnaryOp::Neg, Value::Int(n)) => Some(Value::Int(n.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(f)) => Some(Value::Float(-f)),
        (UnaryOp::Neg, Value::Bool(b)) => Some(Value::Bool(!b)),
        _ => None,
    };
    result.ok_or_else(|| unsupported_unary(op.as_symbol(), value.type_name()))
}

pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let (a, b) = unify(left, right)?;
    let result = match (&a, &b) {
        (Value::Float(x), Value::Float(y)) => eval_float_binary(*x, *y, op),
        (Value::Int(x), Value::Int(y)) => eval_int_binary(*x, *y, op)?,
        (Value::Str(x), Value::Str(y)) => eval_string_binary(x, y, op),
        (Value::Bool(x), Value::Bool(y)) => eval_bool_binary(*x, *y, op),
        _ => None,
    };
    result.ok_or_else(|| {
        unsupported_binary(
            left.scalar().type_name(),
            op.as_symbol(),
            right.scalar().type_name(),
        )
    })
}

// Type-Specific Evaluation Functions

/// Comparisons treat floats within `EPSILON` as equal.
fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> Option<Value> {
    let eq = float_eq(a, b);
    let value = match op {
        BinaryOp::Add => Value::Float(a + b),
        BinaryOp::Sub => Value::Float(a - b),
        BinaryOp::Mul => Value::Float(a * b),
        BinaryOp::Div => Value::Float(a / b),
        BinaryOp::Mod => Value::Float(a % b),
        BinaryOp::Eq => Value::Bool(eq),
        BinaryOp::NotEq => Value::Bool(!eq),
        BinaryOp::Lt => Value::Bool(!eq && a < b),
        BinaryOp::LtEq => Value::Bool(eq || a <= b),
        BinaryOp::Gt => Value::Bool(!eq && a > b),
        BinaryOp::GtEq => Value::Bool(eq || a >= b),
        _ => return None,
    };
    Some(value)
}

/// Arithmetic wraps; division and remainder truncate toward zero.
fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> Result<Option<Value>, EvalError> {
    let value = match op {
        BinaryOp::Add => Value::Int(a.wrapping_add(b)),
        BinaryOp::Sub => Value::Int(a.wrapping_sub(b)),
        BinaryOp::Mul => Value::Int(a.wrapping_mul(b)),
        BinaryOp::Div if b == 0 => return Err(division_by_zero()),
        BinaryOp::Div => Value::Int(a.wrapping_div(b)),
        BinaryOp::Mod if b == 0 => return Err(modulo_by_zero()),
        BinaryOp::Mod => Value::Int(a.wrapping_rem(b)),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        BinaryOp::BitAnd => Value::Int(a & b),
        BinaryOp::BitOr => Value::Int(a | b),
        BinaryOp::BitXor => Value::Int(a ^ b),
        BinaryOp::BitClear => Value::Int(a & !b),
        BinaryOp::Shl => Value::Int(shift_left(a, b)?),
        BinaryOp::Shr => Value::Int(shift_right(a, b)?),
        BinaryOp::And | BinaryOp::Or => return Ok(None),
    };
    Ok(Some(value))
}

/// Shifts of 64 or more clear every bit.
fn shift_left(a: i64, amount: i64) -> Result<i64, EvalError> {
    match u32::try_from(amount) {
        Ok(n) if n < 64 => Ok(a << n),
        Ok(_) => Ok(0),
        Err(_) if amount < 0 => Err(negative_shift(amount)),
        Err(_) => Ok(0),
    }
}

/// Arithmetic shift; 64 or more leaves only the sign.
fn shift_right(a: i64, amount: i64) -> Result<i64, EvalError> {
    if amount < 0 {
        return Err(negative_shift(amount));
    }
    let n = u32::try_from(amount.min(63)).unwrap_or(63);
    Ok(a >> n)
}

/// Concatenation and lexicographic comparison.
fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> Option<Value> {
    let value = match op {
        BinaryOp::Add => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Value::string(s)
        }
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        _ => return None,
    };
    Some(value)
}

/// Both operands are already evaluated; `&&` and `||` never short-circuit.
fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> Option<Value> {
    let value = match op {
        BinaryOp::Eq => a == b,
        BinaryOp::NotEq => a != b,
        BinaryOp::And => a && b,
        BinaryOp::Or => a || b,
        _ => return None,
    };
    Some(Value::Bool(value))
}
