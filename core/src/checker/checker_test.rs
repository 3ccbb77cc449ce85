//! Unit tests for the eligibility checker.

use super::*;
use crate::ast::{Expr, ProgramBuilder};
use crate::types::Type;
use bumpalo::Bump;
use pretty_assertions::assert_eq;

fn call_of<'a>(expr: &'a Expr<'a>) -> &'a Call<'a> {
    expr.as_call().unwrap()
}

#[test]
fn test_accepts_constant_arithmetic() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let sum = b.declare("evalSum", &[("a", Type::INT), ("b", Type::INT)], Type::INT);
    b.define(
        sum,
        b.block(&[b.ret(sum, b.op("plus", b.var(sum, "a"), b.var(sum, "b")))]),
    );
    let call = b.call(sum, &[b.int(1), b.int(2)]);
    let program = b.build();

    let checker = Checker::new(&program, "eval");
    assert_eq!(checker.check(call_of(call)), Ok(()));
    // Checking has no side effects.
    assert!(checker.is_eligible(call_of(call)));
    assert!(checker.is_eligible(call_of(call)));
}

#[test]
fn test_accepts_recursion() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let fib = b.declare("evalFib", &[("n", Type::INT)], Type::INT);
    b.define(
        fib,
        b.block(&[
            b.if_then(b.cmp("less", b.var(fib, "n"), b.int(2)), b.ret(fib, b.int(1))),
            b.ret(
                fib,
                b.op(
                    "plus",
                    b.call(fib, &[b.op("minus", b.var(fib, "n"), b.int(1))]),
                    b.call(fib, &[b.op("minus", b.var(fib, "n"), b.int(2))]),
                ),
            ),
        ]),
    );
    let call = b.call(fib, &[b.int(5)]);
    let program = b.build();

    assert!(Checker::new(&program, "eval").is_eligible(call_of(call)));
}

#[test]
fn test_rejects_unmarked_callee() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let helper = b.declare("helper", &[("x", Type::INT)], Type::INT);
    b.define(helper, b.block(&[b.ret(helper, b.var(helper, "x"))]));
    let outer = b.declare("evalOuter", &[], Type::INT);
    b.define(outer, b.block(&[b.ret(outer, b.call(helper, &[b.int(1)]))]));
    let direct = b.call(helper, &[b.int(1)]);
    let nested = b.call(outer, &[]);
    let program = b.build();

    let checker = Checker::new(&program, "eval");
    assert_eq!(
        checker.check(call_of(direct)),
        Err(Rejection::Unsupported("helper".into()))
    );
    assert_eq!(
        checker.check(call_of(nested)),
        Err(Rejection::Unsupported("helper".into()))
    );
}

#[test]
fn test_rejects_operations_outside_the_whitelist() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let hash = b.builtin(Type::INT, "hashCode", &[], Type::INT);
    let f = b.declare("evalHash", &[("x", Type::INT)], Type::INT);
    b.define(f, b.block(&[b.ret(f, b.call_on(hash, b.var(f, "x"), &[]))]));
    let call = b.call(f, &[b.int(1)]);
    let program = b.build();

    assert_eq!(
        Checker::new(&program, "eval").check(call_of(call)),
        Err(Rejection::Unsupported("kotlin.Int.hashCode".into()))
    );
}

#[test]
fn test_accepts_string_operations() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let length = b.builtin(Type::STRING, "length", &[], Type::INT);
    let f = b.declare("evalLen", &[("a", Type::STRING)], Type::INT);
    b.define(f, b.block(&[b.ret(f, b.call_on(length, b.var(f, "a"), &[]))]));
    let call = b.call(f, &[b.string("abc")]);
    let program = b.build();

    assert!(Checker::new(&program, "eval").is_eligible(call_of(call)));
}

#[test]
fn test_rejects_non_constant_signatures() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let nullable = b.declare("evalNullable", &[("a", Type::STRING.nullable())], Type::INT);
    b.define(nullable, b.block(&[b.ret(nullable, b.int(1))]));
    let unit = b.declare("evalUnit", &[], Type::UNIT);
    b.define(unit, b.block(&[]));
    let nullable_call = b.call(nullable, &[b.string("a")]);
    let unit_call = b.call(unit, &[]);
    let program = b.build();

    let checker = Checker::new(&program, "eval");
    assert_eq!(
        checker.check(call_of(nullable_call)),
        Err(Rejection::NonConstantSignature("evalNullable".into()))
    );
    assert_eq!(
        checker.check(call_of(unit_call)),
        Err(Rejection::NonConstantSignature("evalUnit".into()))
    );
}

#[test]
fn test_rejects_marked_function_without_body() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let f = b.declare("evalExternal", &[], Type::INT);
    let call = b.call(f, &[]);
    let program = b.build();

    assert_eq!(
        Checker::new(&program, "eval").check(call_of(call)),
        Err(Rejection::MissingBody("evalExternal".into()))
    );
}

#[test]
fn test_rejects_bad_variables() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let uninit = b.declare("evalUninit", &[], Type::INT);
    b.define(
        uninit,
        b.block(&[b.decl_uninit("x", Type::INT), b.ret(uninit, b.int(1))]),
    );
    let any = b.declare("evalAny", &[], Type::INT);
    b.define(
        any,
        b.block(&[b.decl("x", Type::ANY, b.int(1)), b.ret(any, b.int(1))]),
    );
    let uninit_call = b.call(uninit, &[]);
    let any_call = b.call(any, &[]);
    let program = b.build();

    let checker = Checker::new(&program, "eval");
    assert_eq!(
        checker.check(call_of(uninit_call)),
        Err(Rejection::UninitializedVariable("x".into()))
    );
    assert_eq!(
        checker.check(call_of(any_call)),
        Err(Rejection::NonConstantVariable("x".into()))
    );
}

#[test]
fn test_rejects_arguments_reading_caller_locals() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let id = b.declare("evalId", &[("x", Type::INT)], Type::INT);
    b.define(id, b.block(&[b.ret(id, b.var(id, "x"))]));
    let main = b.declare("main", &[], Type::UNIT);
    let call = b.call(id, &[b.var(main, "y")]);
    b.define(
        main,
        b.block(&[b.decl("y", Type::INT, b.int(1)), call]),
    );
    let program = b.build();

    assert_eq!(
        Checker::new(&program, "eval").check(call_of(call)),
        Err(Rejection::ForeignVariable {
            name: "y".into(),
            owner: main
        })
    );
}

#[test]
fn test_rejects_local_function_reading_parent_locals() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let outer = b.declare("evalOuter", &[("x", Type::INT)], Type::INT);
    let inner = b.declare_local(outer, "evalInner", &[], Type::INT);
    b.define(
        inner,
        b.block(&[b.ret(inner, b.op("plus", b.var(outer, "x"), b.int(1)))]),
    );
    b.define(outer, b.block(&[b.ret(outer, b.call(inner, &[]))]));
    let call = b.call(outer, &[b.int(5)]);
    let program = b.build();

    assert_eq!(
        Checker::new(&program, "eval").check(call_of(call)),
        Err(Rejection::ForeignVariable {
            name: "x".into(),
            owner: outer
        })
    );
}

#[test]
fn test_rejects_return_from_enclosing_function() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let outer = b.declare("evalOuter", &[], Type::INT);
    let inner = b.declare_local(outer, "evalInner", &[], Type::INT);
    b.define(inner, b.block(&[b.ret(outer, b.int(1))]));
    b.define(outer, b.block(&[b.ret(outer, b.call(inner, &[]))]));
    let call = b.call(outer, &[]);
    let program = b.build();

    assert_eq!(
        Checker::new(&program, "eval").check(call_of(call)),
        Err(Rejection::ForeignReturn(outer))
    );
}

#[test]
fn test_rejects_jump_out_of_local_function() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let outer = b.declare("evalOuter", &[], Type::INT);
    let inner = b.declare_local(outer, "evalInner", &[], Type::INT);
    let lp = b.loop_id();
    b.define(inner, b.block(&[b.brk(lp), b.ret(inner, b.int(1))]));
    b.define(
        outer,
        b.block(&[
            b.while_loop(lp, b.bool(true), b.block(&[b.call(inner, &[])])),
            b.ret(outer, b.int(0)),
        ]),
    );
    let call = b.call(outer, &[]);
    let program = b.build();

    assert_eq!(
        Checker::new(&program, "eval").check(call_of(call)),
        Err(Rejection::ForeignJump(lp))
    );
}

#[test]
fn test_whitelisted_builtin_wins_over_marker() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let to_int = b.builtin(Type::INT, "toInt", &[], Type::INT);
    let f = b.declare("toAnswer", &[("x", Type::INT)], Type::INT);
    b.define(f, b.block(&[b.ret(f, b.call_on(to_int, b.var(f, "x"), &[]))]));
    let call = b.call(f, &[b.int(42)]);
    let program = b.build();

    let to_int = program.function(to_int).unwrap();
    assert_eq!(classify(to_int, "to"), Callee::Builtin);
    assert_eq!(classify(program.function(f).unwrap(), "to"), Callee::Marked);
    assert_eq!(Checker::new(&program, "to").check(call_of(call)), Ok(()));
}

#[test]
fn test_loop_jumps_must_target_an_enclosing_loop() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let f = b.declare("evalLoop", &[], Type::INT);
    let inner = b.loop_id();
    let stray = b.loop_id();
    b.define(
        f,
        b.block(&[
            b.while_loop(inner, b.bool(true), b.block(&[b.brk(inner)])),
            b.ret(f, b.int(0)),
        ]),
    );
    let g = b.declare("evalStray", &[], Type::INT);
    b.define(
        g,
        b.block(&[
            b.while_loop(inner, b.bool(true), b.block(&[b.cont(stray)])),
            b.ret(g, b.int(0)),
        ]),
    );
    let good = b.call(f, &[]);
    let bad = b.call(g, &[]);
    let program = b.build();

    let checker = Checker::new(&program, "eval");
    assert_eq!(checker.check(call_of(good)), Ok(()));
    assert_eq!(checker.check(call_of(bad)), Err(Rejection::ForeignJump(stray)));
}

#[test]
fn test_rejects_arity_mismatch() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let f = b.declare("evalOne", &[("x", Type::INT)], Type::INT);
    b.define(f, b.block(&[b.ret(f, b.var(f, "x"))]));
    let call = b.call(f, &[]);
    let program = b.build();

    assert!(matches!(
        Checker::new(&program, "eval").check(call_of(call)),
        Err(Rejection::ArityMismatch {
            expected: 1,
            found: 0,
            ..
        })
    ));
}

#[test]
fn test_marker_is_configurable() {
    let arena = Bump::new();
    let b = ProgramBuilder::new(&arena);
    let f = b.declare("constAnswer", &[], Type::INT);
    b.define(f, b.block(&[b.ret(f, b.int(42))]));
    let call = b.call(f, &[]);
    let program = b.build();

    assert!(!Checker::new(&program, "eval").is_eligible(call_of(call)));
    assert!(Checker::new(&program, "const").is_eligible(call_of(call)));
}

#[test]
fn test_visited_stack() {
    let root = Visited::root(Entry::Function(FunctionId(0)));
    let inner = root.push(Entry::Loop(LoopId(3)));

    assert!(inner.contains(Entry::Function(FunctionId(0))));
    assert!(inner.contains(Entry::Loop(LoopId(3))));
    assert!(!root.contains(Entry::Loop(LoopId(3))));
    assert_eq!(inner.current_function(), Some(FunctionId(0)));
    assert!(inner.in_loop(LoopId(3)));

    let call = inner.push(Entry::Function(FunctionId(1)));
    assert_eq!(call.current_function(), Some(FunctionId(1)));
    assert!(!call.in_loop(LoopId(3)));
}
