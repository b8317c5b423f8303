//! `switch`.
//!
//! With a subject, a case matches when one of its values equals the subject.
//! Without one, a case matches when one of its values is truthy. Conversion
//! failures during matching count as non-matches. The first matching case
//! runs; there is no fallthrough.

use quill_ir::{Expr, Stmt, SwitchCase};
use quill_value::{as_bool, equals};

use super::Executor;
use crate::signal::{ControlSignal, ExecResult};

impl Executor<'_> {
    pub(crate) fn exec_switch(
        &mut self,
        subject: Option<&Expr>,
        cases: &[SwitchCase],
        default: Option<&[Stmt]>,
    ) -> ExecResult {
        let subject = match subject {
            Some(expr) => Some(self.eval_value(expr, "switch")?),
            None => None,
        };

        for case in cases {
            for candidate in &case.values {
                let candidate = self.eval_value(candidate, "case")?;
                let matched = match &subject {
                    Some(subject) => equals(subject, &candidate).unwrap_or(false),
                    None => as_bool(&candidate).unwrap_or(false),
                };
                if matched {
                    return self
                        .exec_block(&case.body)
                        .map_err(|e| e.at(&case.pos));
                }
            }
        }

        match default {
            Some(body) => self.exec_block(body),
            None => Ok(ControlSignal::Normal),
        }
    }
}
