//! Statements, functions and scripts.

use std::fmt;

use super::expr::Expr;
use crate::Position;

/// Statement node.
#[derive(Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Position,
}

impl Stmt {
    pub fn new(kind: StmtKind, pos: Position) -> Self {
        Stmt { kind, pos }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.pos)
    }
}

/// Statement kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `{ ... }`, runs in its own scope.
    Block(Vec<Stmt>),

    Expr(Expr),

    If {
        cond: Expr,
        then: Vec<Stmt>,
        /// Either a `Block` or a chained `If`.
        otherwise: Option<Box<Stmt>>,
    },

    /// `for init; cond; step { body }`
    For {
        init: Option<Expr>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Vec<Stmt>,
    },

    /// `for key, value := range source { body }` (or `=` when `declare` is false).
    ForRange {
        key: Option<String>,
        value: Option<String>,
        declare: bool,
        source: Expr,
        body: Vec<Stmt>,
    },

    While {
        cond: Expr,
        body: Vec<Stmt>,
    },

    /// Body first, loops while `cond` is true.
    DoWhile {
        body: Vec<Stmt>,
        cond: Expr,
    },

    /// Body first, loops until `cond` is true.
    RepeatUntil {
        body: Vec<Stmt>,
        cond: Expr,
    },

    Return(Option<Expr>),
    Break,
    Continue,

    Switch {
        subject: Option<Expr>,
        cases: Vec<SwitchCase>,
        default: Option<Vec<Stmt>>,
    },

    /// `try (r1; r2) { body } catch (e) { ... } finally { ... }`
    Try {
        resources: Vec<Expr>,
        body: Vec<Stmt>,
        catch: Option<CatchClause>,
        finally: Option<Vec<Stmt>>,
    },

    Empty,
}

/// `case v1, v2: body`
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    pub values: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub pos: Position,
}

/// `catch (name) { body }`; `_` discards the message.
#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub name: String,
    pub body: Vec<Stmt>,
}

/// Script function declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub pos: Position,
}

impl FuncDecl {
    /// Leading underscore marks a function private to its source unit.
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_')
    }
}

/// A parsed source unit: its function declarations in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    pub functions: Vec<FuncDecl>,
}

impl Script {
    pub fn new(functions: Vec<FuncDecl>) -> Self {
        Script { functions }
    }

    /// Appends another unit's declarations.
    pub fn merge(&mut self, other: Script) {
        self.functions.extend(other.functions);
    }
}
