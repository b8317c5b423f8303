//! Routines written as calculator micro-programs.

use quill_value::{as_bool, EvalError, HostFunction, ParamKind, Signature, Value};

use crate::calculator::{Calculator, Instruction};

/// `min <= value && value <= max`, evaluated with the calculator's own
/// coercion and epsilon rules.
pub fn between(
    calculator: &mut Calculator,
    value: &Value,
    min: &Value,
    max: &Value,
) -> Result<bool, EvalError> {
    let program = [
        Instruction::Push(value.clone()),
        Instruction::Dup,
        Instruction::Push(min.clone()),
        Instruction::op2(">="),
        Instruction::Swap,
        Instruction::Push(max.clone()),
        Instruction::op2("<="),
        Instruction::op2("&&"),
    ];
    match calculator.calculate(|calc| calc.process(&program))? {
        Some(result) => as_bool(&result),
        None => Ok(false),
    }
}

/// `between(value, min, max)` as a host function over a private calculator.
pub fn between_function() -> HostFunction {
    HostFunction::new(
        "between",
        Signature::fixed(vec![ParamKind::Any, ParamKind::Any, ParamKind::Any]),
        |args| match args.as_slice() {
            [value, min, max] => {
                let mut calculator = Calculator::new();
                let inside = between(&mut calculator, value, min, max)?;
                Ok(vec![Value::Bool(inside)])
            }
            _ => Err(quill_value::parameter_mismatch(3, args.len())),
        },
    )
}
