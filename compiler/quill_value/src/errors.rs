//! Runtime error type for the calculator and executor.
//!
//! `EvalErrorKind` gives every failure a typed category so hosts and tests
//! match on kinds instead of parsing strings. Factory functions are the public
//! way to build errors; the executor attaches a position exactly once as the
//! error leaves the node that caused it.

use std::fmt;

use quill_ir::Position;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalErrorKind {
    // Coercion
    #[error("cannot convert {value:?} to {target}")]
    Conversion { value: String, target: &'static str },
    #[error("unable to convert {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    // Calculator
    #[error("undefined operation {op:?}")]
    UndefinedOperation { op: String },
    #[error("operation \"{desc}\" unsupported")]
    UnsupportedOperation { desc: String },
    #[error("stack is empty")]
    EmptyStack,
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,

    // Names
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },
    #[error("undefined function: {name}")]
    UndefinedFunction { name: String },
    #[error("{} has no field {name:?}", .value.type_name())]
    NoField { value: Value, name: String },
    #[error("cannot set {target}")]
    CannotSet { target: String },
    #[error("cannot index {type_name}")]
    CannotIndex { type_name: String },
    #[error("cannot range over {type_name}")]
    CannotRange { type_name: String },
    #[error("index {index} out of bounds")]
    IndexOutOfBounds { index: i64 },

    // Calls
    #[error("parameter mismatch, expected {expected} got {got}")]
    ParameterMismatch { expected: usize, got: usize },
    #[error("argument {index}: cannot cast {value} to {target}")]
    Cast {
        index: usize,
        value: String,
        target: &'static str,
    },
    #[error("no result from {what}")]
    NoResult { what: String },
    #[error("maximum call depth exceeded (limit: {depth})")]
    StackOverflow { depth: usize },
    #[error("panic: {message}")]
    HostPanic { message: String },

    // Setup
    #[error("{visibility} function {name:?} already defined at {previous}")]
    DuplicateFunction {
        visibility: &'static str,
        name: String,
        previous: String,
    },
    #[error("{keyword} not allowed here")]
    InvalidControl { keyword: &'static str },

    /// Host-raised or otherwise uncategorized failure.
    #[error("{message}")]
    Custom { message: String },
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq)]
pub struct BacktraceFrame {
    /// Script function name.
    pub name: String,
    /// Where the call was made.
    pub position: Option<Position>,
}

/// Snapshot of the script call stack at an error site, most recent call first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(pos) = &frame.position {
                write!(f, " at {pos}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Source location of the node that failed. Set once, by the innermost node.
    pub position: Option<Position>,
    /// Script call stack at the error site.
    pub backtrace: Option<EvalBacktrace>,
}

impl EvalError {
    /// Create an uncategorized error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    pub fn from_kind(kind: EvalErrorKind) -> Self {
        Self {
            kind,
            position: None,
            backtrace: None,
        }
    }

    /// Attach a position unless one is already present.
    #[must_use]
    pub fn at(mut self, position: &Position) -> Self {
        if self.position.is_none() {
            self.position = Some(position.clone());
        }
        self
    }

    /// Attach a backtrace unless one is already present.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.backtrace.is_none() {
            self.backtrace = Some(backtrace);
        }
        self
    }

    /// The message without position.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(pos) => write!(f, "{pos}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::from_kind(kind)
    }
}

// Coercion Errors

/// Value cannot be converted to the target kind.
#[cold]
pub fn conversion(value: &Value, target: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Conversion {
        value: value.to_string(),
        target,
    })
}

/// No conversion rule between two kinds.
#[cold]
pub fn unsupported_conversion(from: &str, to: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedConversion {
        from: from.to_string(),
        to: to.to_string(),
    })
}

/// Cast of argument `index` to a declared parameter kind failed.
#[cold]
pub fn cast_error(index: usize, value: &Value, target: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Cast {
        index,
        value: value.to_string(),
        target,
    })
}

// Calculator Errors

/// Operator name not in the operator table.
#[cold]
pub fn undefined_operation(op: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedOperation { op: op.to_string() })
}

/// Unary operator has no handler for the operand's kind.
#[cold]
pub fn unsupported_unary(op: &str, operand: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedOperation {
        desc: format!("{op} {operand}"),
    })
}

/// Binary operator has no handler for the operands' kinds.
#[cold]
pub fn unsupported_binary(lhs: &str, op: &str, rhs: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedOperation {
        desc: format!("{lhs} {op} {rhs}"),
    })
}

#[cold]
pub fn empty_stack() -> EvalError {
    EvalError::from_kind(EvalErrorKind::EmptyStack)
}

/// Shift by a negative amount.
#[cold]
pub fn negative_shift(amount: i64) -> EvalError {
    EvalError::new(format!("negative shift amount {amount}"))
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

// Name Errors

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    })
}

/// `main` is missing from the function table.
#[cold]
pub fn main_not_defined() -> EvalError {
    EvalError::new("main() function not defined")
}

/// Field projection failed; carries the value it was attempted on.
#[cold]
pub fn no_field(value: &Value, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoField {
        value: value.clone(),
        name: name.to_string(),
    })
}

#[cold]
pub fn cannot_set(target: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotSet {
        target: target.to_string(),
    })
}

#[cold]
pub fn cannot_index(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotIndex {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn cannot_range(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotRange {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn index_out_of_bounds(index: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index })
}

// Call Errors

#[cold]
pub fn parameter_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ParameterMismatch { expected, got })
}

/// An expression that had to produce a value produced none.
#[cold]
pub fn no_result(what: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoResult {
        what: what.to_string(),
    })
}

#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn host_panic(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::HostPanic {
        message: message.into(),
    })
}

// Setup Errors

#[cold]
pub fn duplicate_function(private: bool, name: &str, previous: &Position) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateFunction {
        visibility: if private { "private" } else { "public" },
        name: name.to_string(),
        previous: previous.to_string(),
    })
}

/// `break`/`continue` outside a loop.
#[cold]
pub fn invalid_control(keyword: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidControl { keyword })
}
