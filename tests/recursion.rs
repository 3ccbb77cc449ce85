mod cases;

use bumpalo::Bump;
use cases::*;
use evalconst::{Checker, EvalOptions, Expr, fixtures};
use pretty_assertions::assert_eq;

#[test]
fn recursion_folds() {
    let result = fold_fixture("recursion", &EvalOptions::default());
    assert_eq!(
        result.calls,
        vec![folded("evalFac(6)", int(720)), folded("evalFib(5)", int(8))]
    );
    assert_eq!(
        result.main,
        "fun main(): Unit {\n    println(720)\n    println(8)\n}"
    );
    // The recursive calls inside the bodies are visited too, but depend on
    // parameters.
    assert_eq!(result.visited, 2 + 1 + 2);
}

#[test]
fn checking_is_idempotent() {
    let arena = Bump::new();
    let program = fixtures::find("recursion").unwrap().build(&arena);
    let checker = Checker::new(&program, "eval");
    let main = program.find("main").unwrap();
    let Some(Expr::Block(statements)) = main.body else {
        panic!("main is not a block");
    };
    for statement in statements.iter() {
        let Expr::Call(println) = statement else {
            panic!("expected a println call");
        };
        let call = println.args[0].as_call().unwrap();
        assert!(checker.is_eligible(call));
        assert!(checker.is_eligible(call));
    }
}

#[test]
fn folding_a_folded_program_changes_nothing() {
    let arena = Bump::new();
    let program = fixtures::find("recursion").unwrap().build(&arena);
    let options = EvalOptions::default();
    let once = evalconst::fold(&arena, &program, &options).unwrap();
    let twice = evalconst::fold(&arena, &once.program, &options).unwrap();

    let main = program.find("main").unwrap().id;
    assert_eq!(
        twice.program.render_function(main),
        once.program.render_function(main)
    );
    assert_eq!(twice.report.in_function(main).count(), 0);
}
