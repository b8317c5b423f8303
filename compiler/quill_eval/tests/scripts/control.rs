//! Scopes, loops, ranges and switch.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use quill_eval::{EvalErrorKind, Value};
use quill_ir::{BinaryOp, Expr, Script};

use crate::common::{b, main, registry, run_err, run_result, run_result_with, Countdown};

fn set_result(value: Expr) -> quill_ir::Stmt {
    let b = b();
    b.expr_stmt(b.assign("result", value))
}

// Scopes

#[test]
fn declaration_in_block_shadows() {
    let b = b();
    let script = main(vec![
        b.expr_stmt(b.declare("a", b.int(42))),
        b.block(vec![b.expr_stmt(b.declare("a", b.int(96)))]),
        set_result(b.var("a")),
    ]);
    assert_eq!(run_result(&script), Value::Int(42));
}

#[test]
fn assignment_in_block_updates_outer() {
    let b = b();
    let script = main(vec![
        b.expr_stmt(b.declare("a", b.int(42))),
        b.block(vec![b.expr_stmt(b.assign("a", b.int(96)))]),
        set_result(b.var("a")),
    ]);
    assert_eq!(run_result(&script), Value::Int(96));
}

#[test]
fn auto_declared_variable_is_block_local() {
    let b = b();
    let script = main(vec![
        b.block(vec![b.expr_stmt(b.assign("fresh", b.int(1)))]),
        set_result(b.var("fresh")),
    ]);
    assert_eq!(
        run_err(&script).kind,
        EvalErrorKind::UndefinedVariable {
            name: "fresh".to_string()
        }
    );
}

#[test]
fn if_else_chain() {
    let b = b();
    let classify = |n: i64| {
        main(vec![b.if_(
            b.bin(b.int(n), BinaryOp::Lt, b.int(0)),
            vec![set_result(b.str("negative"))],
            Some(b.if_(
                b.bin(b.int(n), BinaryOp::Eq, b.int(0)),
                vec![set_result(b.str("zero"))],
                Some(b.block(vec![set_result(b.str("positive"))])),
            )),
        )])
    };
    assert_eq!(run_result(&classify(-3)), Value::from("negative"));
    assert_eq!(run_result(&classify(0)), Value::from("zero"));
    assert_eq!(run_result(&classify(8)), Value::from("positive"));
}

// Loops

#[test]
fn float_step_loop_terminates() {
    let b = b();
    // for i := 0; i < 10; i = i + 0.5 { result = i }
    let script = main(vec![b.for_(
        Some(b.declare("i", b.int(0))),
        Some(b.bin(b.var("i"), BinaryOp::Lt, b.int(10))),
        Some(b.assign("i", b.bin(b.var("i"), BinaryOp::Add, b.float(0.5)))),
        vec![set_result(b.var("i"))],
    )]);
    assert_eq!(run_result(&script), Value::Float(9.5));
}

#[test]
fn for_loop_variable_is_scoped_to_loop() {
    let b = b();
    let script = main(vec![
        b.for_(
            Some(b.declare("i", b.int(0))),
            Some(b.bin(b.var("i"), BinaryOp::Lt, b.int(3))),
            Some(b.post_inc("i")),
            vec![],
        ),
        set_result(b.var("i")),
    ]);
    assert!(matches!(
        run_err(&script).kind,
        EvalErrorKind::UndefinedVariable { .. }
    ));
}

#[test]
fn while_with_continue_and_break() {
    let b = b();
    // i := 0; while true { i++; if i % 2 == 0 { continue }; if i > 7 { break }; result += i }
    let script = main(vec![
        b.expr_stmt(b.declare("i", b.int(0))),
        set_result(b.int(0)),
        b.while_(
            b.boolean(true),
            vec![
                b.expr_stmt(b.post_inc("i")),
                b.if_(
                    b.bin(
                        b.bin(b.var("i"), BinaryOp::Mod, b.int(2)),
                        BinaryOp::Eq,
                        b.int(0),
                    ),
                    vec![b.cont()],
                    None,
                ),
                b.if_(b.bin(b.var("i"), BinaryOp::Gt, b.int(7)), vec![b.brk()], None),
                b.expr_stmt(b.compound("result", BinaryOp::Add, b.var("i"))),
            ],
        ),
    ]);
    // 1 + 3 + 5 + 7
    assert_eq!(run_result(&script), Value::Int(16));
}

#[test]
fn do_while_runs_body_first() {
    let b = b();
    let script = main(vec![
        set_result(b.int(0)),
        b.do_while(
            vec![b.expr_stmt(b.post_inc("result"))],
            b.boolean(false),
        ),
    ]);
    assert_eq!(run_result(&script), Value::Int(1));
}

#[test]
fn repeat_until_stops_when_true() {
    let b = b();
    let script = main(vec![
        set_result(b.int(0)),
        b.repeat_until(
            vec![b.expr_stmt(b.compound("result", BinaryOp::Add, b.int(3)))],
            b.bin(b.var("result"), BinaryOp::GtEq, b.int(10)),
        ),
    ]);
    assert_eq!(run_result(&script), Value::Int(12));
}

#[test]
fn continue_in_do_while_checks_condition() {
    let b = b();
    let script = main(vec![
        set_result(b.int(0)),
        b.do_while(
            vec![b.expr_stmt(b.post_inc("result")), b.cont()],
            b.bin(b.var("result"), BinaryOp::Lt, b.int(4)),
        ),
    ]);
    assert_eq!(run_result(&script), Value::Int(4));
}

#[test]
fn condition_must_be_boolean_like() {
    let b = b();
    let script = main(vec![b.while_(b.str("maybe"), vec![])]);
    assert!(matches!(
        run_err(&script).kind,
        EvalErrorKind::Conversion { target: "bool", .. }
    ));
}

// Ranges

fn range_script(source: Expr, body: Vec<quill_ir::Stmt>) -> Script {
    let b = b();
    main(vec![b.for_range(Some("k"), Some("v"), true, source, body)])
}

#[test]
fn range_over_int() {
    let b = b();
    let script = range_script(b.int(10), vec![set_result(b.var("v"))]);
    assert_eq!(run_result(&script), Value::Int(9));
}

#[test]
fn range_over_string_yields_bytes() {
    let b = b();
    let script = range_script(b.str("Hello World!"), vec![set_result(b.var("v"))]);
    assert_eq!(run_result(&script), Value::Int(i64::from(b'!')));

    let keys = range_script(b.str("abc"), vec![set_result(b.var("k"))]);
    assert_eq!(run_result(&keys), Value::Int(2));
}

#[test]
fn break_in_range_stops_at_trigger() {
    let b = b();
    let script = range_script(
        b.int(10),
        vec![
            set_result(b.var("v")),
            b.if_(b.bin(b.var("v"), BinaryOp::Eq, b.int(5)), vec![b.brk()], None),
        ],
    );
    assert_eq!(run_result(&script), Value::Int(5));
}

#[test]
fn range_over_host_iterator() {
    let b = b();
    let countdown = Arc::new(Countdown::new(5));
    let registry = registry();
    registry.register_package(
        "ticks",
        Value::Ref(quill_value::HostRef::from_arc(countdown.clone())),
    );
    // for k, v := range ticks { result = v; if k == 2 { break } }
    let script = range_script(
        b.var("ticks"),
        vec![
            set_result(b.var("v")),
            b.if_(b.bin(b.var("k"), BinaryOp::Eq, b.int(2)), vec![b.brk()], None),
        ],
    );
    assert_eq!(run_result_with(&script, registry), Value::Int(30));
    assert_eq!(countdown.position(), 3);
}

#[test]
fn range_over_map_entries() {
    let b = b();
    let registry = registry();
    registry.register_package(
        "prices",
        Value::map([("apple", Value::Int(3)), ("pear", Value::Int(4))]),
    );
    // result = ""; for k, v := range prices { result = result + k + v }
    let script = main(vec![
        set_result(b.str("")),
        b.for_range(
            Some("k"),
            Some("v"),
            true,
            b.var("prices"),
            vec![set_result(b.binary(
                b.var("result"),
                vec![(BinaryOp::Add, b.var("k")), (BinaryOp::Add, b.var("v"))],
            ))],
        ),
    ]);
    assert_eq!(run_result_with(&script, registry), Value::from("apple3pear4"));
}

#[test]
fn range_over_list() {
    let b = b();
    let registry = registry();
    registry.register_package(
        "items",
        Value::list(vec![Value::Int(2), Value::Int(3), Value::Int(4)]),
    );
    let script = main(vec![
        set_result(b.int(1)),
        b.for_range(
            None,
            Some("v"),
            true,
            b.var("items"),
            vec![b.expr_stmt(b.compound("result", BinaryOp::Mul, b.var("v")))],
        ),
    ]);
    assert_eq!(run_result_with(&script, registry), Value::Int(24));
}

#[test]
fn range_assigns_outer_variables() {
    let b = b();
    // k := -1; for k = range 3 {}; result = k
    let script = main(vec![
        b.expr_stmt(b.declare("k", b.int(-1))),
        b.for_range(Some("k"), None, false, b.int(3), vec![]),
        set_result(b.var("k")),
    ]);
    assert_eq!(run_result(&script), Value::Int(2));
}

#[test]
fn range_over_float_fails() {
    let b = b();
    let err = run_err(&range_script(b.float(2.5), vec![]));
    assert_eq!(
        err.kind,
        EvalErrorKind::CannotRange {
            type_name: "float".to_string()
        }
    );
}

// Switch

fn switch_on(subject: Option<Expr>) -> Script {
    let b = b();
    main(vec![b.switch(
        subject,
        vec![
            b.case(vec![b.int(1), b.int(2)], vec![set_result(b.str("small"))]),
            b.case(vec![b.int(3)], vec![set_result(b.str("three"))]),
            b.case(vec![b.int(3)], vec![set_result(b.str("again"))]),
        ],
        Some(vec![set_result(b.str("other"))]),
    )])
}

#[test]
fn switch_matches_first_case() {
    let b = b();
    assert_eq!(run_result(&switch_on(Some(b.int(2)))), Value::from("small"));
    assert_eq!(run_result(&switch_on(Some(b.int(3)))), Value::from("three"));
    assert_eq!(run_result(&switch_on(Some(b.int(9)))), Value::from("other"));
}

#[test]
fn switch_conversion_failure_is_no_match() {
    let b = b();
    assert_eq!(
        run_result(&switch_on(Some(b.str("abc")))),
        Value::from("other")
    );
}

#[test]
fn switch_without_subject_takes_first_truthy() {
    let b = b();
    let script = main(vec![
        b.expr_stmt(b.declare("n", b.int(15))),
        b.switch(
            None,
            vec![
                b.case(
                    vec![b.bin(b.var("n"), BinaryOp::Lt, b.int(10))],
                    vec![set_result(b.str("low"))],
                ),
                b.case(
                    vec![b.bin(b.var("n"), BinaryOp::Lt, b.int(20))],
                    vec![set_result(b.str("mid"))],
                ),
                b.case(
                    vec![b.bin(b.var("n"), BinaryOp::Lt, b.int(30))],
                    vec![set_result(b.str("high"))],
                ),
            ],
            None,
        ),
    ]);
    assert_eq!(run_result(&script), Value::from("mid"));
}
