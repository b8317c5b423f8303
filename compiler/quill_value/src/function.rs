//! Host callables.
//!
//! A `HostFunction` pairs a closure over `Vec<Value>` with the `Signature`
//! the executor casts arguments against before the call. Failures come back
//! as `Err`; successful calls return zero or more results.

use std::fmt;
use std::sync::Arc;

use crate::coerce::cast;
use crate::errors::{parameter_mismatch, EvalError};
use crate::host::HostObject;
use crate::value::Value;

/// Declared kind of a host parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Passed through unchanged.
    Any,
    Int,
    Float,
    Bool,
    Str,
}

impl ParamKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Str => "string",
        }
    }
}

/// Parameter kinds of a host function.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<ParamKind>,
    /// Kind of every argument past `params`, if the function is variadic.
    pub variadic: Option<ParamKind>,
}

impl Signature {
    pub fn fixed(params: Vec<ParamKind>) -> Self {
        Signature {
            params,
            variadic: None,
        }
    }

    pub fn variadic(params: Vec<ParamKind>, rest: ParamKind) -> Self {
        Signature {
            params,
            variadic: Some(rest),
        }
    }

    /// Check arity and cast each argument to its declared kind.
    ///
    /// On a cast failure the error carries the index of the offending argument
    /// so the caller can point at it.
    pub fn bind(&self, args: Vec<Value>) -> Result<Vec<Value>, (Option<usize>, EvalError)> {
        let fixed = self.params.len();
        let arity_ok = match self.variadic {
            Some(_) => args.len() >= fixed,
            None => args.len() == fixed,
        };
        if !arity_ok {
            return Err((None, parameter_mismatch(fixed, args.len())));
        }
        args.into_iter()
            .enumerate()
            .map(|(i, arg)| {
                let kind = self
                    .params
                    .get(i)
                    .copied()
                    .or(self.variadic)
                    .unwrap_or(ParamKind::Any);
                cast(&arg, kind, i).map_err(|e| (Some(i), e))
            })
            .collect()
    }
}

/// Closure type behind a `HostFunction`.
pub type HostFn = dyn Fn(Vec<Value>) -> Result<Vec<Value>, EvalError> + Send + Sync;

/// Named host callable.
#[derive(Clone)]
pub struct HostFunction {
    name: Arc<str>,
    signature: Signature,
    func: Arc<HostFn>,
}

impl HostFunction {
    pub fn new<F>(name: &str, signature: Signature, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Vec<Value>, EvalError> + Send + Sync + 'static,
    {
        HostFunction {
            name: name.into(),
            signature,
            func: Arc::new(func),
        }
    }

    /// `fn(float) -> float` helper for math-style functions.
    pub fn float1(name: &str, f: fn(f64) -> f64) -> Self {
        HostFunction::new(
            name,
            Signature::fixed(vec![ParamKind::Float]),
            move |args| match args.as_slice() {
                [Value::Float(x)] => Ok(vec![Value::Float(f(*x))]),
                _ => Err(parameter_mismatch(1, args.len())),
            },
        )
    }

    /// `fn(float, float) -> float` helper.
    pub fn float2(name: &str, f: fn(f64, f64) -> f64) -> Self {
        HostFunction::new(
            name,
            Signature::fixed(vec![ParamKind::Float, ParamKind::Float]),
            move |args| match args.as_slice() {
                [Value::Float(x), Value::Float(y)] => Ok(vec![Value::Float(f(*x, *y))]),
                _ => Err(parameter_mismatch(2, args.len())),
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Invoke with already-bound arguments.
    pub fn call(&self, args: Vec<Value>) -> Result<Vec<Value>, EvalError> {
        (self.func)(args)
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl HostObject for HostFunction {
    fn type_name(&self) -> &str {
        "function"
    }

    fn describe(&self) -> String {
        format!("<function {}>", self.name)
    }

    fn callable(&self) -> Option<HostFunction> {
        Some(self.clone())
    }
}
