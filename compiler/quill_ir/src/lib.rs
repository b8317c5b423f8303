//! Quill IR - AST types for the Quill scripting runtime.
//!
//! This crate contains the data structures the executor walks:
//! - `Position` for diagnostics (`unit:line:column`)
//! - Operators (`BinaryOp`, `UnaryOp`, `AssignOp`)
//! - AST nodes (`Script`, `FuncDecl`, `Stmt`, `Expr`)
//! - `AstBuilder` for hosts and tests that assemble trees without a parser
//!
//! Binary expressions are stored as flat chains (`first op operand op operand ...`)
//! one per precedence level, so the evaluator applies each operator immediately
//! after its right operand and gets left associativity for free.

pub mod ast;
mod build;
mod position;

pub use ast::{
    AssignOp, BinaryOp, CallExpr, CatchClause, Expr, ExprKind, FuncDecl, Path, Script, Segment,
    Stmt, StmtKind, SwitchCase, UnaryOp,
};
pub use build::AstBuilder;
pub use position::Position;
