//! Programmatic AST construction.
//!
//! `AstBuilder` stamps every node it creates with the same unit and a line
//! the caller can move with `at`. Hosts embedding the executor without a
//! parser and the test suites use it to write scripts as Rust expressions.

use std::sync::Arc;

use crate::ast::{
    AssignOp, BinaryOp, CallExpr, CatchClause, Expr, ExprKind, FuncDecl, Path, Script, Segment,
    Stmt, StmtKind, SwitchCase, UnaryOp,
};
use crate::Position;

#[derive(Clone, Debug)]
pub struct AstBuilder {
    unit: Arc<str>,
    line: u32,
    column: u32,
}

impl AstBuilder {
    pub fn new(unit: impl Into<Arc<str>>) -> Self {
        AstBuilder {
            unit: unit.into(),
            line: 1,
            column: 1,
        }
    }

    /// A builder stamping nodes at another line/column of the same unit.
    #[must_use]
    pub fn at(&self, line: u32, column: u32) -> Self {
        AstBuilder {
            unit: Arc::clone(&self.unit),
            line,
            column,
        }
    }

    pub fn pos(&self) -> Position {
        Position::new(Arc::clone(&self.unit), self.line, self.column)
    }

    fn expr(&self, kind: ExprKind) -> Expr {
        Expr::new(kind, self.pos())
    }

    fn stmt(&self, kind: StmtKind) -> Stmt {
        Stmt::new(kind, self.pos())
    }

    // Literals

    pub fn int(&self, value: i64) -> Expr {
        self.expr(ExprKind::Int(value))
    }

    pub fn float(&self, value: f64) -> Expr {
        self.expr(ExprKind::Float(value))
    }

    pub fn str(&self, value: &str) -> Expr {
        self.expr(ExprKind::Str(value.to_string()))
    }

    pub fn boolean(&self, value: bool) -> Expr {
        self.expr(ExprKind::Bool(value))
    }

    pub fn null(&self) -> Expr {
        self.expr(ExprKind::Null)
    }

    // Paths

    /// `a` or `a.b.c`.
    pub fn var(&self, name: &str) -> Expr {
        self.expr(ExprKind::Path(Path::from_dotted(name)))
    }

    /// `name[i][j]...`
    pub fn index(&self, name: &str, index: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Path(Self::indexed_path(name, index)))
    }

    /// Path whose last segment carries the given index accesses.
    pub fn indexed_path(name: &str, index: Vec<Expr>) -> Path {
        let mut path = Path::from_dotted(name);
        if let Some(last) = path.segments.last_mut() {
            last.index = index;
        }
        path
    }

    pub fn path(&self, segments: Vec<Segment>) -> Expr {
        self.expr(ExprKind::Path(Path { segments }))
    }

    // Operators

    pub fn binary(&self, first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
        self.expr(ExprKind::Binary {
            first: Box::new(first),
            rest,
        })
    }

    /// Single `lhs op rhs`.
    pub fn bin(&self, lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
        self.binary(lhs, vec![(op, rhs)])
    }

    pub fn unary(&self, op: UnaryOp, operand: Expr) -> Expr {
        self.expr(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn paren(&self, inner: Expr) -> Expr {
        self.expr(ExprKind::Paren(Box::new(inner)))
    }

    pub fn ternary(&self, cond: Expr, then: Expr, otherwise: Expr) -> Expr {
        self.expr(ExprKind::Ternary {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    // Assignment

    pub fn assign_to(&self, target: Path, op: AssignOp, value: Expr) -> Expr {
        self.expr(ExprKind::Assign {
            target,
            op,
            value: Box::new(value),
        })
    }

    /// `name = value`
    pub fn assign(&self, name: &str, value: Expr) -> Expr {
        self.assign_to(Path::from_dotted(name), AssignOp::Set, value)
    }

    /// `name := value`
    pub fn declare(&self, name: &str, value: Expr) -> Expr {
        self.assign_to(Path::from_dotted(name), AssignOp::Declare, value)
    }

    /// `name op= value`
    pub fn compound(&self, name: &str, op: BinaryOp, value: Expr) -> Expr {
        self.assign_to(Path::from_dotted(name), AssignOp::Compound(op), value)
    }

    pub fn inc_dec(&self, target: Path, increment: bool, prefix: bool) -> Expr {
        self.expr(ExprKind::IncDec {
            target,
            increment,
            prefix,
        })
    }

    /// `name++`
    pub fn post_inc(&self, name: &str) -> Expr {
        self.inc_dec(Path::from_dotted(name), true, false)
    }

    /// `++name`
    pub fn pre_inc(&self, name: &str) -> Expr {
        self.inc_dec(Path::from_dotted(name), true, true)
    }

    /// `name--`
    pub fn post_dec(&self, name: &str) -> Expr {
        self.inc_dec(Path::from_dotted(name), false, false)
    }

    /// `--name`
    pub fn pre_dec(&self, name: &str) -> Expr {
        self.inc_dec(Path::from_dotted(name), false, true)
    }

    // Calls

    pub fn call(&self, name: &str, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call(self.call_expr(name, args, false)))
    }

    /// `name(args...)`
    pub fn call_spread(&self, name: &str, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call(self.call_expr(name, args, true)))
    }

    pub fn call_expr(&self, name: &str, args: Vec<Expr>, spread: bool) -> CallExpr {
        CallExpr {
            name: name.to_string(),
            args,
            spread,
            pos: self.pos(),
        }
    }

    pub fn key_value(&self, key: &str, value: Expr) -> Expr {
        self.expr(ExprKind::KeyValue {
            key: key.to_string(),
            value: Box::new(value),
        })
    }

    // Statements

    pub fn expr_stmt(&self, expr: Expr) -> Stmt {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn block(&self, body: Vec<Stmt>) -> Stmt {
        self.stmt(StmtKind::Block(body))
    }

    pub fn if_(&self, cond: Expr, then: Vec<Stmt>, otherwise: Option<Stmt>) -> Stmt {
        self.stmt(StmtKind::If {
            cond,
            then,
            otherwise: otherwise.map(Box::new),
        })
    }

    pub fn for_(
        &self,
        init: Option<Expr>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Vec<Stmt>,
    ) -> Stmt {
        self.stmt(StmtKind::For {
            init,
            cond,
            step,
            body,
        })
    }

    pub fn for_range(
        &self,
        key: Option<&str>,
        value: Option<&str>,
        declare: bool,
        source: Expr,
        body: Vec<Stmt>,
    ) -> Stmt {
        self.stmt(StmtKind::ForRange {
            key: key.map(str::to_string),
            value: value.map(str::to_string),
            declare,
            source,
            body,
        })
    }

    pub fn while_(&self, cond: Expr, body: Vec<Stmt>) -> Stmt {
        self.stmt(StmtKind::While { cond, body })
    }

    pub fn do_while(&self, body: Vec<Stmt>, cond: Expr) -> Stmt {
        self.stmt(StmtKind::DoWhile { body, cond })
    }

    pub fn repeat_until(&self, body: Vec<Stmt>, cond: Expr) -> Stmt {
        self.stmt(StmtKind::RepeatUntil { body, cond })
    }

    pub fn ret(&self, value: Option<Expr>) -> Stmt {
        self.stmt(StmtKind::Return(value))
    }

    pub fn brk(&self) -> Stmt {
        self.stmt(StmtKind::Break)
    }

    pub fn cont(&self) -> Stmt {
        self.stmt(StmtKind::Continue)
    }

    pub fn empty(&self) -> Stmt {
        self.stmt(StmtKind::Empty)
    }

    pub fn case(&self, values: Vec<Expr>, body: Vec<Stmt>) -> SwitchCase {
        SwitchCase {
            values,
            body,
            pos: self.pos(),
        }
    }

    pub fn switch(
        &self,
        subject: Option<Expr>,
        cases: Vec<SwitchCase>,
        default: Option<Vec<Stmt>>,
    ) -> Stmt {
        self.stmt(StmtKind::Switch {
            subject,
            cases,
            default,
        })
    }

    pub fn try_(
        &self,
        resources: Vec<Expr>,
        body: Vec<Stmt>,
        catch: Option<(&str, Vec<Stmt>)>,
        finally: Option<Vec<Stmt>>,
    ) -> Stmt {
        self.stmt(StmtKind::Try {
            resources,
            body,
            catch: catch.map(|(name, body)| CatchClause {
                name: name.to_string(),
                body,
            }),
            finally,
        })
    }

    // Declarations

    pub fn func(&self, name: &str, params: &[&str], body: Vec<Stmt>) -> FuncDecl {
        FuncDecl {
            name: name.to_string(),
            params: params.iter().map(|p| (*p).to_string()).collect(),
            body,
            pos: self.pos(),
        }
    }

    /// `func main() { body }` wrapped in a script.
    pub fn main(&self, body: Vec<Stmt>) -> Script {
        Script::new(vec![self.func("main", &[], body)])
    }
}
