//! Abstract syntax tree consumed by the executor.
//!
//! Every node carries a `Position`. Nodes own their children directly;
//! trees are built once (by a parser or `AstBuilder`) and only read afterwards.

mod expr;
mod operators;
mod stmt;

pub use expr::{CallExpr, Expr, ExprKind, Path, Segment};
pub use operators::{AssignOp, BinaryOp, UnaryOp};
pub use stmt::{CatchClause, FuncDecl, Script, Stmt, StmtKind, SwitchCase};
