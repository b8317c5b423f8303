//! Expression nodes.

use std::fmt;

use super::operators::{AssignOp, BinaryOp, UnaryOp};
use crate::Position;

/// Expression node.
#[derive(Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Position,
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Position) -> Self {
        Expr { kind, pos }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.pos)
    }
}

/// Expression kinds, one per precedence level plus primaries.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// `target = value`, `target := value`, `target op= value`.
    Assign {
        target: Path,
        op: AssignOp,
        value: Box<Expr>,
    },

    /// `cond ? then : otherwise`
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },

    /// `first op1 e1 op2 e2 ...` at a single precedence level, applied left to right.
    Binary {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    // Literals
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,

    /// Variable or reference access: `a`, `a.b.c`, `a[1]["k"]`.
    Path(Path),

    /// `++x`, `x++`, `--x`, `x--`.
    IncDec {
        target: Path,
        increment: bool,
        prefix: bool,
    },

    Paren(Box<Expr>),

    Call(CallExpr),

    /// `key: value` argument, used by hosts taking named options.
    KeyValue {
        key: String,
        value: Box<Expr>,
    },
}

/// Function call.
///
/// `name` may be dotted (`pkg.fn`, `obj.method`); the executor decides
/// how to dispatch it.
#[derive(Clone, Debug, PartialEq)]
pub struct CallExpr {
    pub name: String,
    pub args: Vec<Expr>,
    /// Trailing `...`: expand the last argument's elements.
    pub spread: bool,
    pub pos: Position,
}

impl CallExpr {
    /// Splits a dotted name into receiver path and member (`a.b.c` -> `a.b`, `c`).
    pub fn receiver_and_member(&self) -> Option<(&str, &str)> {
        self.name.rsplit_once('.')
    }
}

/// Dotted, optionally indexed, identifier path.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub segments: Vec<Segment>,
}

/// One `.`-separated component of a path with its trailing `[index]` accesses.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub name: String,
    pub index: Vec<Expr>,
}

impl Segment {
    pub fn named(name: impl Into<String>) -> Self {
        Segment {
            name: name.into(),
            index: Vec::new(),
        }
    }
}

impl Path {
    /// Builds an unindexed path from `a.b.c`.
    pub fn from_dotted(name: &str) -> Self {
        Path {
            segments: name.split('.').map(Segment::named).collect(),
        }
    }

    /// First segment's name, the variable the path starts from.
    pub fn root(&self) -> &str {
        self.segments.first().map_or("", |s| s.name.as_str())
    }

    /// A single name with no indexing: a plain variable.
    pub fn is_simple(&self) -> bool {
        matches!(self.segments.as_slice(), [only] if only.index.is_empty())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name)?;
            for _ in &segment.index {
                f.write_str("[]")?;
            }
        }
        Ok(())
    }
}
