//! Operators, precedence chains and assignment.

use pretty_assertions::assert_eq;
use quill_eval::{EvalErrorKind, Value};
use quill_ir::{BinaryOp, UnaryOp};

use crate::common::{b, main, run_err, run_result};

fn result_of(expr: quill_ir::Expr) -> Value {
    let b = b();
    run_result(&main(vec![b.expr_stmt(b.assign("result", expr))]))
}

#[test]
fn additive_chain_is_left_associative() {
    let b = b();
    // 1+2-3-4
    let expr = b.binary(
        b.int(1),
        vec![
            (BinaryOp::Add, b.int(2)),
            (BinaryOp::Sub, b.int(3)),
            (BinaryOp::Sub, b.int(4)),
        ],
    );
    assert_eq!(result_of(expr), Value::Int(-4));
}

#[test]
fn multiplicative_binds_tighter() {
    let b = b();
    // 1+2*6-3
    let product = b.bin(b.int(2), BinaryOp::Mul, b.int(6));
    let expr = b.binary(
        b.int(1),
        vec![(BinaryOp::Add, product), (BinaryOp::Sub, b.int(3))],
    );
    assert_eq!(result_of(expr), Value::Int(10));
}

#[test]
fn parenthesised_grouping() {
    let b = b();
    // (1+2)*6
    let sum = b.paren(b.bin(b.int(1), BinaryOp::Add, b.int(2)));
    assert_eq!(
        result_of(b.bin(sum, BinaryOp::Mul, b.int(6))),
        Value::Int(18)
    );
}

#[test]
fn int_meets_float_widens() {
    let b = b();
    assert_eq!(
        result_of(b.bin(b.int(1), BinaryOp::Add, b.float(0.5))),
        Value::Float(1.5)
    );
}

#[test]
fn string_concatenation_and_ordering() {
    let b = b();
    assert_eq!(
        result_of(b.bin(b.str("ab"), BinaryOp::Add, b.int(1))),
        Value::from("ab1")
    );
    // Lexicographic, not numeric.
    assert_eq!(
        result_of(b.bin(b.str("10"), BinaryOp::Lt, b.str("9"))),
        Value::Bool(true)
    );
}

#[test]
fn unary_operators() {
    let b = b();
    assert_eq!(
        result_of(b.unary(UnaryOp::Neg, b.int(5))),
        Value::Int(-5)
    );
    assert_eq!(
        result_of(b.unary(UnaryOp::Not, b.boolean(false))),
        Value::Bool(true)
    );
    assert_eq!(
        result_of(b.unary(UnaryOp::Neg, b.boolean(true))),
        Value::Bool(false)
    );
}

#[test]
fn logical_operators_evaluate_both_sides() {
    let b = b();
    // false && (result = 1) == 1 still assigns.
    let side_effect = b.paren(b.bin(b.assign("result", b.int(1)), BinaryOp::Eq, b.int(1)));
    let script = main(vec![b.expr_stmt(b.bin(
        b.boolean(false),
        BinaryOp::And,
        side_effect,
    ))]);
    assert_eq!(run_result(&script), Value::Int(1));
}

#[test]
fn ternary_picks_branch() {
    let b = b();
    let expr = b.ternary(
        b.bin(b.int(3), BinaryOp::Gt, b.int(2)),
        b.str("yes"),
        b.str("no"),
    );
    assert_eq!(result_of(expr), Value::from("yes"));
}

#[test]
fn division_by_zero_is_positioned() {
    let b = b();
    let at = b.at(4, 12);
    let script = main(vec![at.expr_stmt(at.bin(b.int(1), BinaryOp::Div, b.int(0)))]);
    let err = run_err(&script);
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.to_string(), "test.q:4:12: division by zero");
}

#[test]
fn shift_with_float_is_unsupported() {
    let b = b();
    let err = run_err(&main(vec![b.expr_stmt(b.bin(
        b.int(1),
        BinaryOp::Shl,
        b.float(1.5),
    ))]));
    assert_eq!(err.message(), "operation \"int << float\" unsupported");
}

// Assignment

#[test]
fn chained_assignment_keeps_value() {
    let b = b();
    // a = result = 5
    let script = main(vec![
        b.expr_stmt(b.assign("a", b.assign("result", b.int(5)))),
        b.expr_stmt(b.compound("result", BinaryOp::Add, b.var("a"))),
    ]);
    assert_eq!(run_result(&script), Value::Int(10));
}

#[test]
fn compound_assignment() {
    let b = b();
    let script = main(vec![
        b.expr_stmt(b.assign("result", b.int(3))),
        b.expr_stmt(b.compound("result", BinaryOp::Mul, b.int(4))),
        b.expr_stmt(b.compound("result", BinaryOp::Sub, b.int(2))),
    ]);
    assert_eq!(run_result(&script), Value::Int(10));
}

#[test]
fn increment_and_decrement() {
    let b = b();
    // x := 5; a := x++; c := ++x; result = a*100 + c*10 + x--
    let script = main(vec![
        b.expr_stmt(b.declare("x", b.int(5))),
        b.expr_stmt(b.declare("a", b.post_inc("x"))),
        b.expr_stmt(b.declare("c", b.pre_inc("x"))),
        b.expr_stmt(b.assign(
            "result",
            b.binary(
                b.bin(b.var("a"), BinaryOp::Mul, b.int(100)),
                vec![
                    (BinaryOp::Add, b.bin(b.var("c"), BinaryOp::Mul, b.int(10))),
                    (BinaryOp::Add, b.post_dec("x")),
                ],
            ),
        )),
    ]);
    // a=5, c=7, x-- yields 7
    assert_eq!(run_result(&script), Value::Int(577));
}

#[test]
fn undefined_variable_is_reported() {
    let b = b();
    let err = run_err(&main(vec![b.expr_stmt(b.var("nope"))]));
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "nope".to_string()
        }
    );
}

#[test]
fn indexed_and_field_assignment() {
    let b = b();
    let script = main(vec![
        b.expr_stmt(b.declare("m", b.call("map", vec![]))),
        b.expr_stmt(b.assign("m.count", b.int(2))),
        b.expr_stmt(b.assign_to(
            quill_ir::AstBuilder::indexed_path("m", vec![b.str("total")]),
            quill_ir::AssignOp::Set,
            b.int(40),
        )),
        b.expr_stmt(b.assign(
            "result",
            b.bin(b.var("m.count"), BinaryOp::Add, b.index("m", vec![b.str("total")])),
        )),
    ]);
    let registry = crate::common::registry();
    registry.register_builtin("map", crate::common::map_builtin());
    assert_eq!(crate::common::run_result_with(&script, registry), Value::Int(42));
}

#[test]
fn cannot_set_field_on_read_only_host() {
    let b = b();
    let registry = crate::common::registry();
    registry.register_package("origin", Value::host(crate::common::Point { x: 1, y: 2 }));
    let script = main(vec![b.expr_stmt(b.assign("origin.x", b.int(5)))]);
    let err = crate::common::run_err_with(&script, registry);
    assert_eq!(
        err.kind,
        EvalErrorKind::CannotSet {
            target: "x".to_string()
        }
    );
}

#[test]
fn host_scalar_view_in_arithmetic() {
    let b = b();
    let registry = crate::common::registry();
    registry.register_package("p", Value::host(crate::common::Point { x: 3, y: 4 }));
    let script = main(vec![
        b.expr_stmt(b.assign("result", b.bin(b.var("p"), BinaryOp::Mul, b.int(2)))),
    ]);
    assert_eq!(crate::common::run_result_with(&script, registry), Value::Int(14));
}

#[test]
fn key_value_argument() {
    let b = b();
    let script = main(vec![
        b.expr_stmt(b.declare("kv", b.key_value("width", b.int(3)))),
        b.expr_stmt(b.assign(
            "result",
            b.bin(b.var("kv.key"), BinaryOp::Add, b.var("kv.value")),
        )),
    ]);
    assert_eq!(run_result(&script), Value::from("width3"));
}
