mod cases;

use cases::*;
use evalconst::{EvalOptions, ResourceExceeded, Verdict};
use pretty_assertions::assert_eq;

#[test]
fn huge_loop_falls_back() {
    let result = fold_fixture("huge_loop", &EvalOptions::default());
    assert_eq!(
        result.calls,
        vec![
            left(
                "evalIterate(1000100)",
                Verdict::ResourceExceeded(ResourceExceeded::StepLimit { limit: 1_000_000 })
            ),
            folded("evalIterate(1000)", int(1000)),
            left(
                "evalIterateInfinitely()",
                Verdict::ResourceExceeded(ResourceExceeded::StepLimit { limit: 1_000_000 })
            ),
            left(
                "evalRecInfinitely(1000)",
                Verdict::ResourceExceeded(ResourceExceeded::StackLimit { limit: 1000 })
            ),
        ]
    );
    assert_eq!(
        result.main,
        "fun main(): Unit {\n    println(evalIterate(1000100))\n    println(1000)\n    \
         println(evalIterateInfinitely())\n    println(evalRecInfinitely(1000))\n}"
    );
}

#[test]
fn small_limits() {
    let options =
        EvalOptions::from_options([("step-limit", "999"), ("stack-limit", "5")]).unwrap();
    let result = fold_fixture("huge_loop", &options);
    let verdicts: Vec<_> = result.calls.into_iter().map(|(_, v)| v).collect();
    assert_eq!(
        verdicts,
        vec![
            Verdict::ResourceExceeded(ResourceExceeded::StepLimit { limit: 999 }),
            Verdict::ResourceExceeded(ResourceExceeded::StepLimit { limit: 999 }),
            Verdict::ResourceExceeded(ResourceExceeded::StepLimit { limit: 999 }),
            Verdict::ResourceExceeded(ResourceExceeded::StackLimit { limit: 5 }),
        ]
    );
}
