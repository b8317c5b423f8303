//! Dynamic coercion rules.
//!
//! Every conversion first looks through key/value wrappers and host scalar
//! views (`Value::scalar`). `unify` brings a binary operator's operands to a
//! common kind; the left operand decides which kind that is, except that an
//! int meeting a float widens.

use crate::errors::{cast_error, conversion, unsupported_conversion, EvalError};
use crate::function::ParamKind;
use crate::value::Value;

/// Tolerance for float equality and truthiness.
pub const EPSILON: f64 = 1e-9;

const TRUE_WORDS: [&str; 4] = ["true", "yes", "t", "y"];
const FALSE_WORDS: [&str; 4] = ["false", "no", "f", "n"];

#[inline]
pub fn float_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Float truncates toward zero, strings parse, bools are 1/0.
#[expect(clippy::cast_possible_truncation, reason = "truncation is the conversion")]
pub fn as_int(value: &Value) -> Result<i64, EvalError> {
    match value.scalar() {
        Value::Int(n) => Ok(n),
        Value::Float(f) => Ok(f.trunc() as i64),
        Value::Str(s) => s.parse::<i64>().map_err(|_| conversion(value, "int")),
        Value::Bool(b) => Ok(i64::from(b)),
        _ => Err(conversion(value, "int")),
    }
}

#[expect(clippy::cast_precision_loss, reason = "int widens to float")]
pub fn as_float(value: &Value) -> Result<f64, EvalError> {
    match value.scalar() {
        Value::Float(f) => Ok(f),
        Value::Int(n) => Ok(n as f64),
        Value::Str(s) => s.parse::<f64>().map_err(|_| conversion(value, "float")),
        Value::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
        _ => Err(conversion(value, "float")),
    }
}

/// Floats render with six decimals (`2.250000`).
pub fn as_string(value: &Value) -> Result<String, EvalError> {
    match value.scalar() {
        Value::Str(s) => Ok(s.to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) => Ok(format!("{f:.6}")),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(conversion(value, "string")),
    }
}

/// Strings must be one of the recognised words; numbers are true when nonzero.
pub fn as_bool(value: &Value) -> Result<bool, EvalError> {
    match value.scalar() {
        Value::Bool(b) => Ok(b),
        Value::Str(s) => {
            if TRUE_WORDS.contains(&&*s) {
                Ok(true)
            } else if FALSE_WORDS.contains(&&*s) {
                Ok(false)
            } else {
                Err(conversion(value, "bool"))
            }
        }
        Value::Int(n) => Ok(n != 0),
        Value::Float(f) => Ok(f.abs() >= EPSILON),
        _ => Err(conversion(value, "bool")),
    }
}

/// Bring two operands to a common kind.
#[expect(clippy::cast_precision_loss, reason = "int widens to float")]
pub fn unify(a: &Value, b: &Value) -> Result<(Value, Value), EvalError> {
    let (a, b) = (a.scalar(), b.scalar());
    match (&a, &b) {
        (Value::Float(_), Value::Float(_)) => Ok((a, b)),
        (Value::Int(x), Value::Float(_)) => Ok((Value::Float(*x as f64), b)),
        (Value::Float(_), _) => Ok((a, Value::Float(as_float(&b)?))),
        (Value::Int(_), _) => Ok((a, Value::Int(as_int(&b)?))),
        (Value::Str(_), _) => Ok((a, Value::string(as_string(&b)?))),
        (Value::Bool(_), _) => Ok((a, Value::Bool(as_bool(&b)?))),
        _ => Err(unsupported_conversion(a.type_name(), b.type_name())),
    }
}

/// Equality after unification; floats compare within `EPSILON`.
pub fn equals(a: &Value, b: &Value) -> Result<bool, EvalError> {
    let (a, b) = unify(a, b)?;
    Ok(match (&a, &b) {
        (Value::Float(x), Value::Float(y)) => float_eq(*x, *y),
        _ => a == b,
    })
}

/// Convert argument `index` to a declared parameter kind.
pub fn cast(value: &Value, kind: ParamKind, index: usize) -> Result<Value, EvalError> {
    let converted = match kind {
        ParamKind::Any => return Ok(value.clone()),
        ParamKind::Int => as_int(value).map(Value::Int),
        ParamKind::Float => as_float(value).map(Value::Float),
        ParamKind::Bool => as_bool(value).map(Value::Bool),
        ParamKind::Str => as_string(value).map(Value::string),
    };
    converted.map_err(|_| cast_error(index, value, kind.name()))
}
