mod cases;

use cases::*;
use evalconst::{EvalOptions, ResourceExceeded, Verdict};
use pretty_assertions::assert_eq;

#[test]
fn loops_fold() {
    let result = fold_fixture("loops", &EvalOptions::default());
    assert_eq!(
        result.calls,
        vec![
            folded("evalMultiply(5, 10)", int(50)),
            // The inner counter is never reset, so only the first outer
            // iteration runs the inner loop.
            folded("evalNestedLoop(5, 10)", int(45)),
        ]
    );
    assert_eq!(
        result.main,
        "fun main(): Unit {\n    println(50)\n    println(45)\n}"
    );
}

#[test]
fn loops_nested_fold() {
    let result = fold_fixture("loops_nested", &EvalOptions::default());
    assert_eq!(result.calls, vec![folded("evalNestedLoop(5, 10)", int(45))]);
}

#[test]
fn step_limit_counts_iterations() {
    // evalMultiply(5, 10) runs ten iterations; evalNestedLoop(5, 10) runs
    // ten inner and five outer ones.
    let options = EvalOptions::from_options([("step-limit", "10")]).unwrap();
    let result = fold_fixture("loops", &options);
    assert_eq!(
        result.calls,
        vec![
            folded("evalMultiply(5, 10)", int(50)),
            left(
                "evalNestedLoop(5, 10)",
                Verdict::ResourceExceeded(ResourceExceeded::StepLimit { limit: 10 })
            ),
        ]
    );

    let options = EvalOptions::from_options([("step-limit", "9")]).unwrap();
    let result = fold_fixture("loops_nested", &options);
    assert_eq!(
        result.main,
        "fun main(): Unit {\n    println(evalNestedLoop(5, 10))\n}"
    );
}
