mod cases;

use cases::*;
use evalconst::{EvalOptions, Literal};
use pretty_assertions::assert_eq;

#[test]
fn const_types_operations_fold() {
    let result = fold_fixture("const_types_operations", &EvalOptions::default());
    assert_eq!(
        result.calls,
        vec![
            folded("evalSum(1, 2)", int(3)),
            folded("evalSub(1, 2)", int(-1)),
            folded("evalNot(false)", Literal::Boolean(true)),
            folded("evalConcat(\"fiz\", \"buz\")", Literal::string("fizbuz")),
            folded("evalConcat(\"fiz\", \"buz\")", Literal::string("fizbuz")),
            folded("evalLen(\"fiz\")", int(3)),
        ]
    );
    assert_eq!(
        result.main,
        "fun main(): Unit {\n    println(3)\n    println(-1)\n    println(true)\n    \
         println(\"fizbuz\")\n    println(\"fizbuz\".length)\n    println(3)\n}"
    );
}

#[test]
fn other_marker_leaves_everything() {
    let options = EvalOptions::from_options([("prefix", "const")]).unwrap();
    let result = fold_fixture("const_types_operations", &options);
    assert_eq!(result.calls, vec![]);
    assert_eq!(result.visited, 0);
    assert!(result.main.contains("println(evalSum(1, 2))"));
}
