//! Shared helpers for the fixture tests.

#![allow(dead_code)]

use bumpalo::Bump;
use evalconst::{EvalOptions, Literal, Verdict, fixtures};

/// Outcome of folding one fixture, detached from its arena.
pub struct FoldedFixture {
    /// `main` after the pass.
    pub main: String,
    /// Calls visited in `main`, with their verdicts.
    pub calls: Vec<(String, Verdict)>,
    /// Calls visited anywhere in the program.
    pub visited: usize,
}

pub fn fold_fixture(name: &str, options: &EvalOptions) -> FoldedFixture {
    let fixture = fixtures::find(name).expect("unknown fixture");
    let arena = Bump::new();
    let program = fixture.build(&arena);
    let folded = evalconst::fold(&arena, &program, options).expect("fold failed");

    let main = folded.program.find("main").expect("no main").id;
    FoldedFixture {
        main: folded.program.render_function(main),
        calls: folded
            .report
            .in_function(main)
            .map(|r| (r.call.clone(), r.verdict.clone()))
            .collect(),
        visited: folded.report.records.len(),
    }
}

pub fn folded(call: &str, value: Literal) -> (String, Verdict) {
    (call.to_string(), Verdict::Folded(value))
}

pub fn left(call: &str, verdict: Verdict) -> (String, Verdict) {
    (call.to_string(), verdict)
}

pub fn int(value: i32) -> Literal {
    Literal::Int(value)
}
