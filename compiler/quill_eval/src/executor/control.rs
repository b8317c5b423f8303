//! Statements, blocks, `if` and the loop primitive.
//!
//! `for`, `while`, `do-while` and `repeat-until` all run through
//! `exec_loop`: an optional init, an optional pre-condition, the body, an
//! optional step and an optional post-condition, looping while each
//! condition equals `desired`.

use quill_ir::{Expr, Stmt, StmtKind};
use quill_value::Value;

use super::Executor;
use crate::signal::{ControlSignal, ExecResult};

struct Loop<'a> {
    init: Option<&'a Expr>,
    pre: Option<&'a Expr>,
    body: &'a [Stmt],
    step: Option<&'a Expr>,
    post: Option<&'a Expr>,
    desired: bool,
}

impl Executor<'_> {
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        self.exec_kind(stmt).map_err(|e| e.at(&stmt.pos))
    }

    fn exec_kind(&mut self, stmt: &Stmt) -> ExecResult {
        match &stmt.kind {
            StmtKind::Block(body) => self.exec_block(body),
            StmtKind::Expr(expr) => {
                self.evaluate_isolated(expr)?;
                Ok(ControlSignal::Normal)
            }
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => {
                if self.condition(cond)? {
                    self.exec_block(then)
                } else if let Some(otherwise) = otherwise {
                    self.exec_stmt(otherwise)
                } else {
                    Ok(ControlSignal::Normal)
                }
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => self.exec_loop(&Loop {
                init: init.as_ref(),
                pre: cond.as_ref(),
                body,
                step: step.as_ref(),
                post: None,
                desired: true,
            }),
            StmtKind::While { cond, body } => self.exec_loop(&Loop {
                init: None,
                pre: Some(cond),
                body,
                step: None,
                post: None,
                desired: true,
            }),
            StmtKind::DoWhile { body, cond } => self.exec_loop(&Loop {
                init: None,
                pre: None,
                body,
                step: None,
                post: Some(cond),
                desired: true,
            }),
            StmtKind::RepeatUntil { body, cond } => self.exec_loop(&Loop {
                init: None,
                pre: None,
                body,
                step: None,
                post: Some(cond),
                desired: false,
            }),
            StmtKind::ForRange {
                key,
                value,
                declare,
                source,
                body,
            } => self.exec_range(key.as_deref(), value.as_deref(), *declare, source, body),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_value(expr, "return")?,
                    None => Value::Nil,
                };
                Ok(ControlSignal::Return(value))
            }
            StmtKind::Break => Ok(ControlSignal::Break),
            StmtKind::Continue => Ok(ControlSignal::Continue),
            StmtKind::Switch {
                subject,
                cases,
                default,
            } => self.exec_switch(subject.as_ref(), cases, default.as_deref()),
            StmtKind::Try {
                resources,
                body,
                catch,
                finally,
            } => self.exec_try(resources, body, catch.as_ref(), finally.as_deref()),
            StmtKind::Empty => Ok(ControlSignal::Normal),
        }
    }

    /// Run statements in order in the current scope, stopping at the first
    /// non-normal signal.
    pub(crate) fn exec_stmts(&mut self, body: &[Stmt]) -> ExecResult {
        for stmt in body {
            let signal = self.exec_stmt(stmt)?;
            if !signal.is_normal() {
                return Ok(signal);
            }
        }
        Ok(ControlSignal::Normal)
    }

    /// Run statements in a new block scope.
    pub(crate) fn exec_block(&mut self, body: &[Stmt]) -> ExecResult {
        self.with_scope(|scoped| scoped.exec_stmts(body))
    }

    fn exec_loop(&mut self, shape: &Loop<'_>) -> ExecResult {
        self.with_scope(|scoped| {
            if let Some(init) = shape.init {
                scoped.evaluate_isolated(init)?;
            }
            let mut iteration: u64 = 0;
            loop {
                if let Some(pre) = shape.pre {
                    if scoped.condition(pre)? != shape.desired {
                        break;
                    }
                }
                tracing::trace!(iteration, "loop iteration");
                match scoped.exec_block(shape.body)? {
                    ControlSignal::Break => break,
                    ControlSignal::Return(value) => return Ok(ControlSignal::Return(value)),
                    ControlSignal::Normal | ControlSignal::Continue => {}
                }
                if let Some(step) = shape.step {
                    scoped.evaluate_isolated(step)?;
                }
                if let Some(post) = shape.post {
                    if scoped.condition(post)? != shape.desired {
                        break;
                    }
                }
                iteration = iteration.wrapping_add(1);
            }
            Ok(ControlSignal::Normal)
        })
    }
}
