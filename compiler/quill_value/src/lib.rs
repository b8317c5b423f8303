//! Quill Value - the dynamic value domain shared by the calculator and executor.
//!
//! # Architecture
//!
//! - `Value`: tagged union of scalars, key/value pairs and opaque host references
//! - `coerce`: conversion rules (`as_int`, `unify`, `cast`, ...)
//! - `HostObject`: capability accessors a host type opts into (fields, keys,
//!   iteration, resources, calls, methods)
//! - `HostFunction` / `Signature`: host callables with declared parameter kinds
//! - `EvalError` / `EvalErrorKind`: the single runtime error type

pub mod coerce;
mod errors;
mod function;
mod host;
mod value;

pub use coerce::{as_bool, as_float, as_int, as_string, cast, equals, float_eq, unify, EPSILON};
pub use errors::{
    cannot_index, cannot_range, cannot_set, cast_error, conversion, division_by_zero,
    duplicate_function, empty_stack, host_panic, index_out_of_bounds, invalid_control,
    main_not_defined, modulo_by_zero, negative_shift, no_field, no_result, parameter_mismatch,
    stack_overflow, undefined_function, undefined_operation, undefined_variable,
    unsupported_binary, unsupported_conversion, unsupported_unary, BacktraceFrame, EvalBacktrace,
    EvalError, EvalErrorKind, EvalResult,
};
pub use function::{HostFn, HostFunction, ParamKind, Signature};
pub use host::{
    sequence_items, Fields, HostObject, HostRef, Indexed, Iterable, ListValue, MapValue, Package,
    Resource,
};
pub use value::{KeyValue, Value};
