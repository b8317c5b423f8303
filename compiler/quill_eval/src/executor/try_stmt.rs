//! `try (resources) { body } catch (name) { ... } finally { ... }`.
//!
//! Resources are evaluated in order inside the try scope. A resource whose
//! `create` fails stops creation; every resource already created is still
//! closed. After the body, created resources close in reverse order; every
//! close is attempted and the first failure becomes the outcome when the body
//! did not fail. Failures then go to `catch`; `finally` runs last and
//! replaces the outcome when it fails or transfers control itself.
//!
//! `return`, `break` and `continue` are not failures: they skip `catch` and
//! pass through once resources are closed and `finally` has run.

use quill_ir::{CatchClause, Expr, Stmt};
use quill_value::{EvalError, HostRef, Value};

use super::Executor;
use crate::signal::{ControlSignal, ExecResult};
use crate::state::BLANK;

impl Executor<'_> {
    pub(crate) fn exec_try(
        &mut self,
        resources: &[Expr],
        body: &[Stmt],
        catch: Option<&CatchClause>,
        finally: Option<&[Stmt]>,
    ) -> ExecResult {
        let outcome = self.with_scope(|scoped| scoped.exec_try_body(resources, body));

        let outcome = match (outcome, catch) {
            (Err(err), Some(clause)) => self.exec_catch(clause, &err),
            (outcome, _) => outcome,
        };

        let Some(finally) = finally else {
            return outcome;
        };
        match self.exec_block(finally) {
            Ok(ControlSignal::Normal) => outcome,
            overriding => overriding,
        }
    }

    fn exec_try_body(&mut self, resources: &[Expr], body: &[Stmt]) -> ExecResult {
        let mut created = Vec::with_capacity(resources.len());
        let outcome = match self.create_resources(resources, &mut created) {
            Ok(()) => self.exec_block(body),
            Err(err) => Err(err),
        };
        let closed = close_resources(&created);
        match (outcome, closed) {
            (Ok(_), Err(err)) => Err(err),
            (outcome, _) => outcome,
        }
    }

    fn create_resources(
        &mut self,
        resources: &[Expr],
        created: &mut Vec<HostRef>,
    ) -> Result<(), EvalError> {
        for expr in resources {
            let Some(value) = self.evaluate_isolated(expr)? else {
                continue;
            };
            let Value::Ref(object) = value else {
                continue;
            };
            let Some(resource) = object.resource() else {
                continue;
            };
            resource.create().map_err(|e| e.at(&expr.pos))?;
            created.push(object);
        }
        Ok(())
    }

    fn exec_catch(&mut self, clause: &CatchClause, err: &EvalError) -> ExecResult {
        tracing::debug!(error = %err, "caught");
        self.with_scope(|scoped| {
            if clause.name != BLANK {
                scoped
                    .state
                    .define(&clause.name, Value::string(err.to_string()));
            }
            scoped.exec_stmts(&clause.body)
        })
    }
}

/// Close in reverse creation order, attempting every close.
fn close_resources(created: &[HostRef]) -> Result<(), EvalError> {
    let mut first_failure = None;
    for object in created.iter().rev() {
        let Some(resource) = object.resource() else {
            continue;
        };
        if let Err(err) = resource.close() {
            tracing::warn!(resource = object.type_name(), error = %err, "resource close failed");
            first_failure.get_or_insert(err);
        }
    }
    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
