mod cases;

use cases::*;
use evalconst::{EvalOptions, Rejection, Verdict};
use pretty_assertions::assert_eq;

#[test]
fn marker_calls_fold_through_marker_callees_only() {
    let result = fold_fixture("nested_fun", &EvalOptions::default());
    assert_eq!(
        result.calls,
        vec![
            folded("evalSquarePlusOne(4)", int(17)),
            left(
                "evalUsesPlain(3)",
                Verdict::Ineligible(Rejection::Unsupported("triple".to_string()))
            ),
        ]
    );
    assert_eq!(
        result.main,
        "fun main(): Unit {\n    println(17)\n    println(evalUsesPlain(3))\n}"
    );
}
