//! Script functions: calls, recursion, visibility and the host surface.

use pretty_assertions::assert_eq;
use quill_eval::{EvalErrorKind, Executor, Value};
use quill_ir::{AstBuilder, BinaryOp, Expr, Script, Stmt};

use crate::common::{b, executor_with, registry, run_err, run_result};

fn set_result(value: Expr) -> Stmt {
    let b = b();
    b.expr_stmt(b.assign("result", value))
}

/// `func add(a, b) { return a + b }`
fn add() -> quill_ir::FuncDecl {
    let b = b();
    b.func(
        "add",
        &["a", "b"],
        vec![b.ret(Some(b.bin(b.var("a"), BinaryOp::Add, b.var("b"))))],
    )
}

/// `func fact(n) { if n <= 1 { return 1 }; return n * fact(n - 1) }`
fn fact() -> quill_ir::FuncDecl {
    let b = b();
    b.func(
        "fact",
        &["n"],
        vec![
            b.if_(
                b.bin(b.var("n"), BinaryOp::LtEq, b.int(1)),
                vec![b.ret(Some(b.int(1)))],
                None,
            ),
            b.ret(Some(b.bin(
                b.var("n"),
                BinaryOp::Mul,
                b.call("fact", vec![b.bin(b.var("n"), BinaryOp::Sub, b.int(1))]),
            ))),
        ],
    )
}

fn with_main(body: Vec<Stmt>, mut functions: Vec<quill_ir::FuncDecl>) -> Script {
    functions.insert(0, b().func("main", &[], body));
    Script::new(functions)
}

#[test]
fn call_binds_parameters() {
    let b = b();
    let script = with_main(
        vec![set_result(b.call("add", vec![b.int(2), b.int(3)]))],
        vec![add()],
    );
    assert_eq!(run_result(&script), Value::Int(5));
}

#[test]
fn arity_must_match() {
    let b = b();
    let script = with_main(vec![b.expr_stmt(b.call("add", vec![b.int(2)]))], vec![add()]);
    assert_eq!(
        run_err(&script).kind,
        EvalErrorKind::ParameterMismatch {
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn recursion() {
    let b = b();
    let script = with_main(
        vec![set_result(b.call("fact", vec![b.int(10)]))],
        vec![fact()],
    );
    assert_eq!(run_result(&script), Value::Int(3_628_800));
}

#[test]
fn functions_see_globals_not_caller_locals() {
    let b = b();
    let peek = b.func("peek", &[], vec![b.ret(Some(b.var("local")))]);
    let bump = b.func("bump", &[], vec![b.expr_stmt(b.post_inc("result"))]);

    let reads_global = with_main(
        vec![
            set_result(b.int(1)),
            b.expr_stmt(b.call("bump", vec![])),
        ],
        vec![bump],
    );
    assert_eq!(run_result(&reads_global), Value::Int(2));

    let reads_local = with_main(
        vec![
            b.expr_stmt(b.declare("local", b.int(1))),
            b.expr_stmt(b.call("peek", vec![])),
        ],
        vec![peek],
    );
    assert_eq!(
        run_err(&reads_local).kind,
        EvalErrorKind::UndefinedVariable {
            name: "local".to_string()
        }
    );
}

#[test]
fn bare_return_yields_nil() {
    let b = b();
    let script = with_main(
        vec![set_result(b.call("nothing", vec![]))],
        vec![b.func("nothing", &[], vec![b.ret(None)])],
    );
    assert_eq!(run_result(&script), Value::Nil);
}

#[test]
fn falling_off_the_end_yields_no_result() {
    let b = b();
    let script = with_main(
        vec![set_result(b.call("silent", vec![]))],
        vec![b.func("silent", &[], vec![])],
    );
    assert_eq!(
        run_err(&script).kind,
        EvalErrorKind::NoResult {
            what: "assignment".to_string()
        }
    );
}

#[test]
fn returning_a_call_without_result_fails() {
    let b = b();
    // func noop() {}; func f() { return noop() }
    let ret = b.at(6, 5).ret(Some(b.at(6, 12).call("noop", vec![])));
    let script = with_main(
        vec![set_result(b.call("f", vec![]))],
        vec![b.func("noop", &[], vec![]), b.func("f", &[], vec![ret])],
    );

    let err = run_err(&script);
    assert_eq!(
        err.kind,
        EvalErrorKind::NoResult {
            what: "return".to_string()
        }
    );
    assert_eq!(err.to_string(), "test.q:6:12: no result from return");
}

#[test]
fn call_depth_limit() {
    let b = b();
    // func down(n) { down(n + 1) }
    let down = b.func(
        "down",
        &["n"],
        vec![b.expr_stmt(b.call("down", vec![b.bin(b.var("n"), BinaryOp::Add, b.int(1))]))],
    );
    let script = with_main(vec![b.expr_stmt(b.call("down", vec![b.int(0)]))], vec![down]);

    let mut exec = Executor::builder()
        .script(&script)
        .registry(registry())
        .max_call_depth(10)
        .build()
        .unwrap();
    let err = exec.run().unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::StackOverflow { depth: 10 });
    let backtrace = err.backtrace.expect("overflow carries a backtrace");
    assert_eq!(backtrace.len(), 10);
    assert_eq!(backtrace.frames()[0].name, "down");
    assert_eq!(backtrace.frames()[9].name, "main");
    assert_eq!(exec.call_depth(), 0);
}

#[test]
fn error_inside_function_keeps_callee_position() {
    let a = AstBuilder::new("lib.q").at(12, 4);
    let b = b();
    let broken = a.func(
        "broken",
        &[],
        vec![a.expr_stmt(a.bin(a.int(1), BinaryOp::Mod, a.int(0)))],
    );
    let script = with_main(vec![b.expr_stmt(b.call("broken", vec![]))], vec![broken]);

    let err = run_err(&script);
    assert_eq!(err.to_string(), "lib.q:12:4: modulo by zero");
    let frames = err.backtrace.expect("backtrace").frames().to_vec();
    assert_eq!(frames[0].name, "broken");
    assert_eq!(
        frames[0].position.as_ref().map(ToString::to_string),
        Some("test.q:1:1".to_string())
    );
}

#[test]
fn private_functions_resolve_per_unit() {
    let a = AstBuilder::new("a.q");
    let lib = AstBuilder::new("lib.q");
    let app = Script::new(vec![
        a.func(
            "main",
            &[],
            vec![a.expr_stmt(a.assign(
                "result",
                a.binary(
                    a.call("_name", vec![]),
                    vec![(BinaryOp::Add, a.call("describe", vec![]))],
                ),
            ))],
        ),
        a.func("_name", &[], vec![a.ret(Some(a.str("app/")))]),
    ]);
    let library = Script::new(vec![
        lib.func("describe", &[], vec![lib.ret(Some(lib.call("_name", vec![])))]),
        lib.func("_name", &[], vec![lib.ret(Some(lib.str("lib")))]),
    ]);

    let mut exec = Executor::builder()
        .script(&app)
        .script(&library)
        .registry(registry())
        .global("result", Value::Nil)
        .build()
        .unwrap();
    exec.run().unwrap();
    assert_eq!(exec.get_global("result"), Some(Value::from("app/lib")));

    let err = exec.call("_name", vec![]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedFunction {
            name: "_name".to_string()
        }
    );
}

#[test]
fn duplicate_public_function_fails_build() {
    let first = Script::new(vec![AstBuilder::new("a.q").func("f", &[], vec![])]);
    let second = Script::new(vec![AstBuilder::new("b.q").at(9, 1).func("f", &[], vec![])]);

    let err = Executor::builder()
        .script(&first)
        .script(&second)
        .registry(registry())
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "b.q:9:1: public function \"f\" already defined at a.q:1:1"
    );
}

#[test]
fn missing_main() {
    let script = Script::new(vec![add()]);
    let err = executor_with(&script, registry()).run().unwrap_err();
    assert_eq!(err.to_string(), "main() function not defined");
}

#[test]
fn globals_cross_the_host_boundary() {
    let b = b();
    // func main() { counter += 5; created := 1 }
    let script = with_main(
        vec![
            b.expr_stmt(b.compound("counter", BinaryOp::Add, b.int(5))),
            b.expr_stmt(b.declare("created", b.int(1))),
        ],
        vec![],
    );

    let mut exec = executor_with(&script, registry());
    exec.set_global("counter", Value::Int(10));
    exec.run().unwrap();

    assert_eq!(exec.get_global("counter"), Some(Value::Int(15)));
    // Declarations inside main live in its root scope, not the global one
    assert_eq!(exec.get_global("created"), None);
}

#[test]
fn host_calls_script_function() {
    let script = Script::new(vec![add(), fact()]);
    let mut exec = executor_with(&script, registry());

    assert_eq!(
        exec.call("add", vec![Value::Int(2), Value::Float(0.5)]).unwrap(),
        Some(Value::Float(2.5))
    );
    assert_eq!(
        exec.call("fact", vec![Value::Int(5)]).unwrap(),
        Some(Value::Int(120))
    );
    assert_eq!(
        exec.call("add", vec![Value::Int(1)]).unwrap_err().kind,
        EvalErrorKind::ParameterMismatch {
            expected: 2,
            got: 1
        }
    );
}
