//! Quill Calc - the stack evaluator.
//!
//! The executor evaluates expressions by pushing operands onto a
//! `Calculator` and applying operators by name. Nested evaluations (call
//! arguments, conditions) run against a fresh stack through `calculate`,
//! so a failing or short-circuited evaluation can never leave stray values
//! behind for the outer one.

mod calculator;
pub mod library;
mod operators;

pub use calculator::{Calculator, Instruction, IsolatedStack};
pub use library::{between, between_function};
pub use operators::{binary_op, evaluate_binary, evaluate_unary, unary_op};
