//! `for key, value := range source`.
//!
//! A `RangeCursor` walks the source lazily, one `(key, value)` pair per
//! iteration, so `break` leaves a host iterator positioned after the element
//! that triggered it. Sources, in order of preference:
//!
//! - host iterator: key is a counter, value is `next()`
//! - host map-like entries: key/value per entry
//! - host sequence (`len` + index access): key is the index
//! - string: key is the byte index, value the byte as int
//! - int `n`: key and value both `0..n`

use std::sync::Arc;
use std::vec;

use quill_ir::{Expr, Stmt};
use quill_value::{cannot_range, EvalError, HostRef, Value};

use super::Executor;
use crate::signal::{ControlSignal, ExecResult};

enum RangeCursor {
    Count { end: i64, next: i64 },
    Bytes { text: Arc<str>, next: usize },
    Iterator { object: HostRef, next: i64 },
    Entries(vec::IntoIter<(Value, Value)>),
    Sequence { object: HostRef, len: usize, next: usize },
}

fn int(i: usize) -> Value {
    Value::Int(i64::try_from(i).unwrap_or(i64::MAX))
}

impl RangeCursor {
    fn new(source: &Value) -> Result<Self, EvalError> {
        match source {
            Value::Int(n) => Ok(RangeCursor::Count { end: *n, next: 0 }),
            Value::Str(s) => Ok(RangeCursor::Bytes {
                text: Arc::clone(s),
                next: 0,
            }),
            Value::KeyValue(kv) => RangeCursor::new(&kv.value),
            Value::Ref(r) => {
                if r.iterable().is_some() {
                    return Ok(RangeCursor::Iterator {
                        object: r.clone(),
                        next: 0,
                    });
                }
                if let Some(entries) = r.entries() {
                    return Ok(RangeCursor::Entries(entries.into_iter()));
                }
                match (r.len(), r.indexed()) {
                    (Some(len), Some(_)) => Ok(RangeCursor::Sequence {
                        object: r.clone(),
                        len,
                        next: 0,
                    }),
                    _ => Err(cannot_range(r.type_name())),
                }
            }
            other => Err(cannot_range(other.type_name())),
        }
    }

    fn next(&mut self) -> Result<Option<(Value, Value)>, EvalError> {
        match self {
            RangeCursor::Count { end, next } => {
                if *next >= *end {
                    return Ok(None);
                }
                let i = *next;
                *next += 1;
                Ok(Some((Value::Int(i), Value::Int(i))))
            }
            RangeCursor::Bytes { text, next } => {
                let Some(byte) = text.as_bytes().get(*next).copied() else {
                    return Ok(None);
                };
                let key = int(*next);
                *next += 1;
                Ok(Some((key, Value::Int(i64::from(byte)))))
            }
            RangeCursor::Iterator { object, next } => {
                let Some(iterable) = object.iterable() else {
                    return Ok(None);
                };
                if !iterable.has_next() {
                    return Ok(None);
                }
                let value = iterable.next()?;
                let key = Value::Int(*next);
                *next += 1;
                Ok(Some((key, value)))
            }
            RangeCursor::Entries(entries) => Ok(entries.next()),
            RangeCursor::Sequence { object, len, next } => {
                if *next >= *len {
                    return Ok(None);
                }
                let key = int(*next);
                *next += 1;
                let value = match object.indexed() {
                    Some(indexed) => indexed.get_index(&key)?.unwrap_or_default(),
                    None => Value::Nil,
                };
                Ok(Some((key, value)))
            }
        }
    }
}

impl Executor<'_> {
    pub(crate) fn exec_range(
        &mut self,
        key: Option<&str>,
        value: Option<&str>,
        declare: bool,
        source: &Expr,
        body: &[Stmt],
    ) -> ExecResult {
        let source_value = self.eval_value(source, "range")?;
        let mut cursor = RangeCursor::new(&source_value).map_err(|e| e.at(&source.pos))?;

        self.with_scope(|scoped| {
            if declare {
                for name in [key, value].into_iter().flatten() {
                    scoped.state.declare(name);
                }
            }
            while let Some((k, v)) = cursor.next().map_err(|e| e.at(&source.pos))? {
                scoped.bind_range_var(key, k);
                scoped.bind_range_var(value, v);
                match scoped.exec_block(body)? {
                    ControlSignal::Break => break,
                    ControlSignal::Return(returned) => return Ok(ControlSignal::Return(returned)),
                    ControlSignal::Normal | ControlSignal::Continue => {}
                }
            }
            Ok(ControlSignal::Normal)
        })
    }

    /// Set a range variable, declaring it in the range scope if no scope does.
    fn bind_range_var(&mut self, name: Option<&str>, value: Value) {
        if let Some(name) = name {
            if !self.state.set(name, value.clone()) {
                self.state.define(name, value);
            }
        }
    }
}
