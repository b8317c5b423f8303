//! Reading and writing through paths (`a`, `a.b`, `a[i].c`).
//!
//! A path flattens to a root name and a chain of accesses. Reads follow the
//! whole chain. Writes follow all but the last access and resolve a `Place`
//! that knows how to store into the container it ends on.

use quill_ir::{Expr, Path};
use quill_value::{cannot_set, no_field, undefined_variable, EvalError, Value};

use super::Executor;
use crate::state::{index_value, project_field, State};

#[derive(Clone, Copy)]
enum Access<'e> {
    Field(&'e str),
    Index(&'e Expr),
}

fn accesses(path: &Path) -> Vec<Access<'_>> {
    let mut accesses = Vec::new();
    for (i, segment) in path.segments.iter().enumerate() {
        if i > 0 {
            accesses.push(Access::Field(&segment.name));
        }
        accesses.extend(segment.index.iter().map(Access::Index));
    }
    accesses
}

/// Assignable location.
pub(crate) enum Place {
    Variable(String),
    Field { container: Value, name: String },
    Index { container: Value, key: Value },
}

impl Place {
    pub(crate) fn read(&self, state: &State<'_>) -> Result<Value, EvalError> {
        match self {
            Place::Variable(name) => state
                .resolve_root(name)
                .ok_or_else(|| undefined_variable(name)),
            Place::Field { container, name } => {
                project_field(container, name).ok_or_else(|| no_field(container, name))
            }
            Place::Index { container, key } => index_value(container, key),
        }
    }

    /// Store `value`. An undeclared variable is declared in the current scope.
    pub(crate) fn write(&self, state: &mut State<'_>, value: Value) -> Result<(), EvalError> {
        match self {
            Place::Variable(name) => {
                if !state.set(name, value.clone()) {
                    state.define(name, value);
                }
                Ok(())
            }
            Place::Field { container, name } => match unwrap_pair(container) {
                Value::Ref(r) => match r.fields() {
                    Some(fields) => fields.set_field(name, value),
                    None => Err(cannot_set(name)),
                },
                _ => Err(cannot_set(name)),
            },
            Place::Index { container, key } => match unwrap_pair(container) {
                Value::Ref(r) => match r.indexed() {
                    Some(indexed) => indexed.set_index(key, value),
                    None => Err(cannot_set(&format!("{}[{key}]", r.type_name()))),
                },
                other => Err(cannot_set(&format!("{}[{key}]", other.type_name()))),
            },
        }
    }
}

fn unwrap_pair(value: &Value) -> &Value {
    match value {
        Value::KeyValue(kv) => unwrap_pair(&kv.value),
        other => other,
    }
}

impl Executor<'_> {
    /// Value of a path expression.
    pub(crate) fn read_path(&mut self, path: &Path) -> Result<Value, EvalError> {
        let root = path.root();
        let value = self
            .state
            .resolve_root(root)
            .ok_or_else(|| undefined_variable(root))?;
        self.follow(value, &accesses(path))
    }

    /// Resolve an assignment target, evaluating its index expressions once.
    pub(crate) fn resolve_place(&mut self, path: &Path) -> Result<Place, EvalError> {
        let accesses = accesses(path);
        let Some((last, leading)) = accesses.split_last() else {
            return Ok(Place::Variable(path.root().to_string()));
        };
        let root = path.root();
        let root_value = self
            .state
            .resolve_root(root)
            .ok_or_else(|| undefined_variable(root))?;
        let container = self.follow(root_value, leading)?;
        Ok(match *last {
            Access::Field(name) => Place::Field {
                container,
                name: name.to_string(),
            },
            Access::Index(expr) => Place::Index {
                container,
                key: self.eval_value(expr, "index")?,
            },
        })
    }

    fn follow(&mut self, mut value: Value, accesses: &[Access<'_>]) -> Result<Value, EvalError> {
        for access in accesses {
            value = match *access {
                Access::Field(name) => {
                    project_field(&value, name).ok_or_else(|| no_field(&value, name))?
                }
                Access::Index(expr) => {
                    let key = self.eval_value(expr, "index")?;
                    index_value(&value, &key).map_err(|e| e.at(&expr.pos))?
                }
            };
        }
        Ok(value)
    }
}
