//! Sample compilation units.
//!
//! Each fixture builds a `main` function that prints the results of calls to
//! local marker functions, the way a front end would hand them to the folding
//! pass. They back the integration tests and the command line tool.

use crate::ast::{FunctionId, Owner, Program, ProgramBuilder};
use crate::types::Type;
use bumpalo::Bump;

pub struct Fixture {
    pub name: &'static str,
    pub description: &'static str,
    build: for<'a> fn(&ProgramBuilder<'a>),
}

impl Fixture {
    pub fn build<'a>(&self, arena: &'a Bump) -> Program<'a> {
        let b = ProgramBuilder::new(arena);
        (self.build)(&b);
        b.build()
    }
}

pub const ALL: &[Fixture] = &[
    Fixture {
        name: "const_types_operations",
        description: "arithmetic, boolean and string operations",
        build: const_types_operations,
    },
    Fixture {
        name: "loops",
        description: "while loops with compound assignment",
        build: loops,
    },
    Fixture {
        name: "loops_nested",
        description: "a nested loop whose inner counter is never reset",
        build: loops_nested,
    },
    Fixture {
        name: "recursion",
        description: "factorial and Fibonacci",
        build: recursion,
    },
    Fixture {
        name: "huge_loop",
        description: "calls that exceed the step or call depth limits",
        build: huge_loop,
    },
    Fixture {
        name: "variables",
        description: "a local shadowing a parameter",
        build: variables,
    },
    Fixture {
        name: "conditions",
        description: "if/else and when with several arms",
        build: conditions,
    },
    Fixture {
        name: "nested_fun",
        description: "marker functions calling each other and plain functions",
        build: nested_fun,
    },
];

pub fn find(name: &str) -> Option<&'static Fixture> {
    ALL.iter().find(|f| f.name == name)
}

/// `fun main()` and `println(Any?)`.
fn main_and_println(b: &ProgramBuilder<'_>) -> (FunctionId, FunctionId) {
    let main = b.declare("main", &[], Type::UNIT);
    let println = b.declare_in(
        Owner::Package("kotlin.io"),
        None,
        "println",
        &[("message", Type::NULLABLE_ANY)],
        Type::UNIT,
    );
    (main, println)
}

fn const_types_operations(b: &ProgramBuilder<'_>) {
    let (main, println) = main_and_println(b);
    let params = [("a", Type::INT), ("b", Type::INT)];
    let string_plus = b.builtin(Type::STRING, "plus", &[Type::NULLABLE_ANY], Type::STRING);
    let length = b.builtin(Type::STRING, "length", &[], Type::INT);

    let sum = b.declare_local(main, "evalSum", &params, Type::INT);
    b.define(sum, b.block(&[b.ret(sum, b.op("plus", b.var(sum, "a"), b.var(sum, "b")))]));

    let sub = b.declare_local(main, "evalSub", &params, Type::INT);
    b.define(sub, b.block(&[b.ret(sub, b.op("minus", b.var(sub, "a"), b.var(sub, "b")))]));

    let not = b.declare_local(main, "evalNot", &[("b", Type::BOOLEAN)], Type::BOOLEAN);
    b.define(not, b.block(&[b.ret(not, b.not(b.var(not, "b")))]));

    let strings = [("a", Type::STRING), ("b", Type::STRING)];
    let concat = b.declare_local(main, "evalConcat", &strings, Type::STRING);
    b.define(
        concat,
        b.block(&[b.ret(
            concat,
            b.call_on(string_plus, b.var(concat, "a"), &[b.var(concat, "b")]),
        )]),
    );

    let len = b.declare_local(main, "evalLen", &[("a", Type::STRING)], Type::INT);
    b.define(len, b.block(&[b.ret(len, b.call_on(length, b.var(len, "a"), &[]))]));

    let fizbuz = || b.call(concat, &[b.string("fiz"), b.string("buz")]);
    b.define(
        main,
        b.block(&[
            b.call(println, &[b.call(sum, &[b.int(1), b.int(2)])]),
            b.call(println, &[b.call(sub, &[b.int(1), b.int(2)])]),
            b.call(println, &[b.call(not, &[b.bool(false)])]),
            b.call(println, &[fizbuz()]),
            b.call(println, &[b.call_on(length, fizbuz(), &[])]),
            b.call(println, &[b.call(len, &[b.string("fiz")])]),
        ]),
    );
}

fn multiply(b: &ProgramBuilder<'_>, main: FunctionId) -> FunctionId {
    let f = b.declare_local(main, "evalMultiply", &[("a", Type::INT), ("b", Type::INT)], Type::INT);
    let lp = b.loop_id();
    b.define(
        f,
        b.block(&[
            b.decl("i", Type::INT, b.int(0)),
            b.decl("res", Type::INT, b.int(0)),
            b.while_loop(
                lp,
                b.cmp("less", b.var(f, "i"), b.var(f, "b")),
                b.block(&[
                    b.add_assign(f, "res", b.var(f, "a")),
                    b.add_assign(f, "i", b.int(1)),
                ]),
            ),
            b.ret(f, b.var(f, "res")),
        ]),
    );
    f
}

fn nested_loop(b: &ProgramBuilder<'_>, main: FunctionId) -> FunctionId {
    let f = b.declare_local(main, "evalNestedLoop", &[("a", Type::INT), ("b", Type::INT)], Type::INT);
    let outer = b.loop_id();
    let inner = b.loop_id();
    b.define(
        f,
        b.block(&[
            b.decl("r", Type::INT, b.int(0)),
            b.decl("i", Type::INT, b.int(0)),
            b.decl("j", Type::INT, b.int(0)),
            b.while_loop(
                outer,
                b.cmp("less", b.var(f, "i"), b.var(f, "a")),
                b.block(&[
                    b.while_loop(
                        inner,
                        b.cmp("less", b.var(f, "j"), b.var(f, "b")),
                        b.block(&[
                            b.add_assign(f, "r", b.op("plus", b.var(f, "i"), b.var(f, "j"))),
                            b.add_assign(f, "j", b.int(1)),
                        ]),
                    ),
                    b.add_assign(f, "i", b.int(1)),
                ]),
            ),
            b.ret(f, b.var(f, "r")),
        ]),
    );
    f
}

fn loops(b: &ProgramBuilder<'_>) {
    let (main, println) = main_and_println(b);
    let multiply = multiply(b, main);
    let nested = nested_loop(b, main);
    b.define(
        main,
        b.block(&[
            b.call(println, &[b.call(multiply, &[b.int(5), b.int(10)])]),
            b.call(println, &[b.call(nested, &[b.int(5), b.int(10)])]),
        ]),
    );
}

fn loops_nested(b: &ProgramBuilder<'_>) {
    let (main, println) = main_and_println(b);
    let nested = nested_loop(b, main);
    b.define(
        main,
        b.block(&[b.call(println, &[b.call(nested, &[b.int(5), b.int(10)])])]),
    );
}

fn recursion(b: &ProgramBuilder<'_>) {
    let (main, println) = main_and_println(b);
    let n = [("n", Type::INT)];

    let fac = b.declare_local(main, "evalFac", &n, Type::INT);
    b.define(
        fac,
        b.block(&[
            b.if_then(b.cmp("lessOrEqual", b.var(fac, "n"), b.int(1)), b.ret(fac, b.int(1))),
            b.ret(
                fac,
                b.op(
                    "times",
                    b.var(fac, "n"),
                    b.call(fac, &[b.op("minus", b.var(fac, "n"), b.int(1))]),
                ),
            ),
        ]),
    );

    let fib = b.declare_local(main, "evalFib", &n, Type::INT);
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

    b.define(
        main,
        b.block(&[
            b.call(println, &[b.call(fac, &[b.int(6)])]),
            b.call(println, &[b.call(fib, &[b.int(5)])]),
        ]),
    );
}

fn huge_loop(b: &ProgramBuilder<'_>) {
    let (main, println) = main_and_println(b);

    let iterate = b.declare_local(main, "evalIterate", &[("a", Type::INT)], Type::INT);
    let lp = b.loop_id();
    b.define(
        iterate,
        b.block(&[
            b.decl("i", Type::INT, b.int(0)),
            b.while_loop(
                lp,
                b.cmp("less", b.var(iterate, "i"), b.var(iterate, "a")),
                b.block(&[b.add_assign(iterate, "i", b.int(1))]),
            ),
            b.ret(iterate, b.var(iterate, "i")),
        ]),
    );

    let forever = b.declare_local(main, "evalIterateInfinitely", &[], Type::INT);
    let lp = b.loop_id();
    b.define(
        forever,
        b.block(&[
            b.while_loop(lp, b.bool(true), b.block(&[])),
            b.ret(forever, b.int(1)),
        ]),
    );

    let rec = b.declare_local(main, "evalRecInfinitely", &[("i", Type::INT)], Type::INT);
    b.define(rec, b.block(&[b.ret(rec, b.call(rec, &[b.var(rec, "i")]))]));

    b.define(
        main,
        b.block(&[
            b.call(println, &[b.call(iterate, &[b.int(1_000_100)])]),
            b.call(println, &[b.call(iterate, &[b.int(1000)])]),
            b.call(println, &[b.call(forever, &[])]),
            b.call(println, &[b.call(rec, &[b.int(1000)])]),
        ]),
    );
}

fn variables(b: &ProgramBuilder<'_>) {
    let (main, println) = main_and_println(b);

    // fun evalF(x: Int): Int { val x = x + 1; return x }
    let f = b.declare_local(main, "evalF", &[("x", Type::INT)], Type::INT);
    b.define(
        f,
        b.block(&[
            b.decl("x", Type::INT, b.op("plus", b.var(f, "x"), b.int(1))),
            b.ret(f, b.var(f, "x")),
        ]),
    );

    // fun evalSwap(a: Int, b: Int): Int {
    //     var x = a; var y = b
    //     run { val t = x; x = y; y = t }
    //     return x * 10 + y
    // }
    let swap = b.declare_local(main, "evalSwap", &[("a", Type::INT), ("b", Type::INT)], Type::INT);
    b.define(
        swap,
        b.block(&[
            b.decl("x", Type::INT, b.var(swap, "a")),
            b.decl("y", Type::INT, b.var(swap, "b")),
            b.block(&[
                b.decl("t", Type::INT, b.var(swap, "x")),
                b.assign(swap, "x", b.var(swap, "y")),
                b.assign(swap, "y", b.var(swap, "t")),
            ]),
            b.ret(
                swap,
                b.op("plus", b.op("times", b.var(swap, "x"), b.int(10)), b.var(swap, "y")),
            ),
        ]),
    );

    b.define(
        main,
        b.block(&[
            b.call(println, &[b.call(f, &[b.int(5)])]),
            b.call(println, &[b.call(swap, &[b.int(1), b.int(2)])]),
        ]),
    );
}

fn conditions(b: &ProgramBuilder<'_>) {
    let (main, println) = main_and_println(b);
    let pair = [("a", Type::INT), ("b", Type::INT)];

    let max = b.declare_local(main, "evalMax", &pair, Type::INT);
    b.define(
        max,
        b.block(&[b.if_else(
            b.cmp("greater", b.var(max, "a"), b.var(max, "b")),
            b.ret(max, b.var(max, "a")),
            b.ret(max, b.var(max, "b")),
        )]),
    );

    let sign = b.declare_local(main, "evalSign", &[("n", Type::INT)], Type::INT);
    b.define(
        sign,
        b.block(&[
            b.branch(&[
                (b.cmp("less", b.var(sign, "n"), b.int(0)), b.ret(sign, b.int(-1))),
                (b.eq(b.var(sign, "n"), b.int(0)), b.ret(sign, b.int(0))),
            ]),
            b.ret(sign, b.int(1)),
        ]),
    );

    let and = b.intrinsic("ANDAND", &[Type::BOOLEAN, Type::BOOLEAN], Type::BOOLEAN);
    let between = b.declare_local(
        main,
        "evalBetween",
        &[("n", Type::INT), ("lo", Type::INT), ("hi", Type::INT)],
        Type::BOOLEAN,
    );
    b.define(
        between,
        b.block(&[b.ret(
            between,
            b.call(
                and,
                &[
                    b.cmp("lessOrEqual", b.var(between, "lo"), b.var(between, "n")),
                    b.cmp("lessOrEqual", b.var(between, "n"), b.var(between, "hi")),
                ],
            ),
        )]),
    );

    b.define(
        main,
        b.block(&[
            b.call(println, &[b.call(max, &[b.int(3), b.int(7)])]),
            b.call(println, &[b.call(sign, &[b.int(-5)])]),
            b.call(println, &[b.call(sign, &[b.int(0)])]),
            b.call(println, &[b.call(between, &[b.int(15), b.int(0), b.int(10)])]),
        ]),
    );
}

fn nested_fun(b: &ProgramBuilder<'_>) {
    let (main, println) = main_and_println(b);
    let x = [("x", Type::INT)];

    let square = b.declare_local(main, "evalSquare", &x, Type::INT);
    b.define(square, b.block(&[b.ret(square, b.op("times", b.var(square, "x"), b.var(square, "x")))]));

    let square_plus_one = b.declare_local(main, "evalSquarePlusOne", &x, Type::INT);
    b.define(
        square_plus_one,
        b.block(&[b.ret(
            square_plus_one,
            b.op("plus", b.call(square, &[b.var(square_plus_one, "x")]), b.int(1)),
        )]),
    );

    let triple = b.declare_local(main, "triple", &x, Type::INT);
    b.define(triple, b.block(&[b.ret(triple, b.op("times", b.var(triple, "x"), b.int(3)))]));

    let uses_plain = b.declare_local(main, "evalUsesPlain", &x, Type::INT);
    b.define(
        uses_plain,
        b.block(&[b.ret(uses_plain, b.call(triple, &[b.var(uses_plain, "x")]))]),
    );

    b.define(
        main,
        b.block(&[
            b.call(println, &[b.call(square_plus_one, &[b.int(4)])]),
            b.call(println, &[b.call(uses_plain, &[b.int(3)])]),
        ]),
    );
}
