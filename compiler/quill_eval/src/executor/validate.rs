//! Placement checks run before execution.
//!
//! `break` and `continue` must sit inside a loop of the same function.
//! `switch` and `try` do not count as loops; a `break` inside them targets
//! the enclosing loop.

use quill_ir::{FuncDecl, Stmt, StmtKind};
use quill_value::{invalid_control, EvalError};

pub(crate) fn check_function(decl: &FuncDecl) -> Result<(), EvalError> {
    check_block(&decl.body, 0)
}

pub(crate) fn check_statement(stmt: &Stmt) -> Result<(), EvalError> {
    check(stmt, 0)
}

fn check_block(body: &[Stmt], loops: usize) -> Result<(), EvalError> {
    body.iter().try_for_each(|stmt| check(stmt, loops))
}

fn check(stmt: &Stmt, loops: usize) -> Result<(), EvalError> {
    match &stmt.kind {
        StmtKind::Break if loops == 0 => Err(invalid_control("break").at(&stmt.pos)),
        StmtKind::Continue if loops == 0 => Err(invalid_control("continue").at(&stmt.pos)),
        StmtKind::Block(body) => check_block(body, loops),
        StmtKind::If {
            then, otherwise, ..
        } => {
            check_block(then, loops)?;
            match otherwise {
                Some(otherwise) => check(otherwise, loops),
                None => Ok(()),
            }
        }
        StmtKind::For { body, .. }
        | StmtKind::ForRange { body, .. }
        | StmtKind::While { body, .. }
        | StmtKind::DoWhile { body, .. }
        | StmtKind::RepeatUntil { body, .. } => check_block(body, loops + 1),
        StmtKind::Switch { cases, default, .. } => {
            for case in cases {
                check_block(&case.body, loops)?;
            }
            match default {
                Some(body) => check_block(body, loops),
                None => Ok(()),
            }
        }
        StmtKind::Try {
            body,
            catch,
            finally,
            ..
        } => {
            check_block(body, loops)?;
            if let Some(catch) = catch {
                check_block(&catch.body, loops)?;
            }
            match finally {
                Some(body) => check_block(body, loops),
                None => Ok(()),
            }
        }
        StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Expr(_)
        | StmtKind::Return(_)
        | StmtKind::Empty => Ok(()),
    }
}
