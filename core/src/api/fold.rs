//! The folding pass: replaces eligible marker calls by their values.
//!
//! Every function body is walked bottom-up. Arguments are folded before the
//! call that uses them, so `evalA(evalB(1))` folds `evalB(1)` first and then
//! sees a constant argument. Each call to a marker function is checked, and if
//! accepted evaluated with a fresh [`Evaluator`]; the outcome is recorded in a
//! [`FoldReport`].

use crate::api::EvalOptions;
use crate::ast::{BranchArm, Call, Expr, FunctionId, Loop, Program};
use crate::checker::{Callee, Checker, Rejection, classify};
use crate::evaluator::{EvalError, Evaluator, InternalError, ResourceExceeded, RuntimeError};
use crate::stack::ensure_sufficient_stack;
use crate::values::Literal;
use alloc::string::String;
use alloc::vec::Vec;
use bumpalo::Bump;
use core::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Outcome of one marker call.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Replaced by this literal.
    Folded(Literal),
    /// Left as it is: the checker refused it.
    Ineligible(Rejection),
    /// Left as it is: evaluation ran out of steps or call depth.
    ResourceExceeded(ResourceExceeded),
    /// Left as it is: the call would throw at run time.
    RuntimeFault(RuntimeError),
}

impl Verdict {
    pub fn is_folded(&self) -> bool {
        matches!(self, Verdict::Folded(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Folded(value) => write!(f, "folded to {}", value.to_source()),
            Verdict::Ineligible(reason) => write!(f, "not eligible: {}", reason),
            Verdict::ResourceExceeded(limit) => write!(f, "left as is: {}", limit),
            Verdict::RuntimeFault(fault) => write!(f, "left as is, would throw: {}", fault),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoldRecord {
    /// Function whose body contains the call.
    pub function: FunctionId,
    /// The call as it appeared after its arguments were folded.
    pub call: String,
    pub verdict: Verdict,
}

/// Every marker call a pass visited, in visiting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoldReport {
    pub records: Vec<FoldRecord>,
}

impl FoldReport {
    pub fn folded(&self) -> impl Iterator<Item = &FoldRecord> {
        self.records.iter().filter(|r| r.verdict.is_folded())
    }

    pub fn folded_count(&self) -> usize {
        self.folded().count()
    }

    /// Records of calls made from `function`.
    pub fn in_function(&self, function: FunctionId) -> impl Iterator<Item = &FoldRecord> {
        self.records.iter().filter(move |r| r.function == function)
    }
}

/// Result of a pass: the rewritten program and what happened to each call.
#[derive(Debug, Clone)]
pub struct Folded<'a> {
    pub program: Program<'a>,
    pub report: FoldReport,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FoldError {
    #[error("internal error while evaluating `{call}` in {function}: {cause}")]
    Internal {
        function: String,
        call: String,
        cause: InternalError,
    },
}

/// Fold every eligible marker call of `program`.
///
/// New nodes are allocated in `arena`; `program` itself is left untouched.
/// Calls that are ineligible, run out of resources or would throw stay as
/// they are. An internal evaluation error aborts the pass.
pub fn fold_program<'a>(
    arena: &'a Bump,
    program: &Program<'a>,
    options: &EvalOptions,
) -> Result<Folded<'a>, FoldError> {
    let mut folder = Folder {
        arena,
        program,
        options,
        checker: Checker::new(program, &options.marker),
        caller: FunctionId(0),
        records: Vec::new(),
    };

    let mut bodies = Vec::new();
    for function in program.functions() {
        if let Some(body) = function.body {
            folder.caller = function.id;
            bodies.push((function.id, folder.rewrite(body)?));
        }
    }

    let mut folded = program.clone();
    folded.replace_bodies(bodies);
    let report = FoldReport {
        records: folder.records,
    };
    debug!(
        visited = report.records.len(),
        folded = report.folded_count(),
        "fold pass finished"
    );
    Ok(Folded {
        program: folded,
        report,
    })
}

struct Folder<'p, 'a> {
    arena: &'a Bump,
    program: &'p Program<'a>,
    options: &'p EvalOptions,
    checker: Checker<'p, 'a>,
    caller: FunctionId,
    records: Vec<FoldRecord>,
}

impl<'p, 'a> Folder<'p, 'a> {
    fn rewrite(&mut self, expr: &'a Expr<'a>) -> Result<&'a Expr<'a>, FoldError> {
        ensure_sufficient_stack(|| self.rewrite_inner(expr))
    }

    fn rewrite_inner(&mut self, expr: &'a Expr<'a>) -> Result<&'a Expr<'a>, FoldError> {
        let rewritten = match expr {
            Expr::Const(_)
            | Expr::VariableRef { .. }
            | Expr::Break { .. }
            | Expr::Continue { .. } => return Ok(expr),

            Expr::VariableDecl { name, ty, init } => Expr::VariableDecl {
                name: *name,
                ty: *ty,
                init: init.map(|init| self.rewrite(init)).transpose()?,
            },

            Expr::Assign { name, owner, value } => Expr::Assign {
                name: *name,
                owner: *owner,
                value: self.rewrite(value)?,
            },

            Expr::Call(call) => return self.call(call),

            Expr::Block(statements) => Expr::Block(self.rewrite_all(statements)?),

            Expr::Branch(arms) => {
                let mut out = bumpalo::collections::Vec::with_capacity_in(arms.len(), self.arena);
                for arm in arms.iter() {
                    out.push(BranchArm {
                        cond: self.rewrite(arm.cond)?,
                        result: self.rewrite(arm.result)?,
                    });
                }
                Expr::Branch(out.into_bump_slice())
            }

            Expr::WhileLoop(lp) => Expr::WhileLoop(self.rewrite_loop(lp)?),

            Expr::DoWhileLoop(lp) => Expr::DoWhileLoop(self.rewrite_loop(lp)?),

            Expr::Return { target, value } => Expr::Return {
                target: *target,
                value: self.rewrite(value)?,
            },
        };
        Ok(self.arena.alloc(rewritten))
    }

    fn rewrite_all(
        &mut self,
        exprs: &'a [&'a Expr<'a>],
    ) -> Result<&'a [&'a Expr<'a>], FoldError> {
        let mut out = bumpalo::collections::Vec::with_capacity_in(exprs.len(), self.arena);
        for &expr in exprs {
            out.push(self.rewrite(expr)?);
        }
        Ok(out.into_bump_slice())
    }

    fn rewrite_loop(&mut self, lp: &Loop<'a>) -> Result<Loop<'a>, FoldError> {
        Ok(Loop {
            cond: self.rewrite(lp.cond)?,
            body: lp.body.map(|body| self.rewrite(body)).transpose()?,
            ..*lp
        })
    }

    fn call(&mut self, call: &Call<'a>) -> Result<&'a Expr<'a>, FoldError> {
        let call = Call {
            callee: call.callee,
            receiver: call.receiver.map(|r| self.rewrite(r)).transpose()?,
            args: self.rewrite_all(call.args)?,
        };
        let node: &'a Expr<'a> = self.arena.alloc(Expr::Call(call));

        let is_candidate = self
            .program
            .function(call.callee)
            .is_some_and(|f| classify(f, &self.options.marker) == Callee::Marked);
        if !is_candidate {
            return Ok(node);
        }

        let verdict = match self.checker.check(&call) {
            Err(reason) => Verdict::Ineligible(reason),
            Ok(()) => {
                let mut evaluator = Evaluator::new(
                    self.program,
                    &self.options.marker,
                    self.options.evaluator_options(),
                );
                match evaluator.eval_call(&call) {
                    Ok(value) => Verdict::Folded(value),
                    Err(EvalError::ResourceExceeded(limit)) => Verdict::ResourceExceeded(limit),
                    Err(EvalError::Runtime(fault)) => Verdict::RuntimeFault(fault),
                    Err(EvalError::Internal(cause)) => {
                        return Err(FoldError::Internal {
                            function: self.program.function_name(self.caller),
                            call: self.program.render(node),
                            cause,
                        });
                    }
                }
            }
        };

        let rendered = self.program.render(node);
        match &verdict {
            Verdict::ResourceExceeded(limit) => {
                warn!(call = %rendered, %limit, "evaluation gave up")
            }
            _ => debug!(call = %rendered, %verdict, "visited call"),
        }

        let result = match &verdict {
            Verdict::Folded(value) => self.arena.alloc(Expr::Const(value.clone())),
            _ => node,
        };
        self.records.push(FoldRecord {
            function: self.caller,
            call: rendered,
            verdict,
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ProgramBuilder;
    use crate::types::Type;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_folds_marker_calls_in_place() {
        crate::test_utils::init_test_logging();
        let arena = Bump::new();
        let b = ProgramBuilder::new(&arena);
        let inc = b.declare("evalInc", &[("x", Type::INT)], Type::INT);
        b.define(inc, b.block(&[b.ret(inc, b.op("plus", b.var(inc, "x"), b.int(1)))]));
        let main = b.declare("main", &[], Type::UNIT);
        b.define(
            main,
            b.block(&[b.decl("y", Type::INT, b.call(inc, &[b.call(inc, &[b.int(1)])]))]),
        );
        let program = b.build();

        let folded = fold_program(&arena, &program, &EvalOptions::default()).unwrap();

        assert_eq!(
            folded.program.render_function(main),
            "fun main(): Unit {\n    var y: Int = 3\n}"
        );
        let calls: Vec<_> = folded.report.records.iter().map(|r| r.call.as_str()).collect();
        assert_eq!(calls, ["evalInc(1)", "evalInc(2)"]);
        assert_eq!(folded.report.folded_count(), 2);
        // The input program is untouched.
        assert_eq!(
            program.render_function(main),
            "fun main(): Unit {\n    var y: Int = evalInc(evalInc(1))\n}"
        );
    }

    #[test]
    fn test_local_function_reading_parent_local_is_left_alone() {
        let arena = Bump::new();
        let b = ProgramBuilder::new(&arena);
        let outer = b.declare("evalOuter", &[("x", Type::INT)], Type::INT);
        let inner = b.declare_local(outer, "evalInner", &[], Type::INT);
        b.define(
            inner,
            b.block(&[b.ret(inner, b.op("plus", b.var(outer, "x"), b.int(1)))]),
        );
        b.define(outer, b.block(&[b.ret(outer, b.call(inner, &[]))]));
        let main = b.declare("main", &[], Type::UNIT);
        b.define(
            main,
            b.block(&[b.decl("y", Type::INT, b.call(outer, &[b.int(5)]))]),
        );
        let program = b.build();

        let folded = fold_program(&arena, &program, &EvalOptions::default()).unwrap();

        let expected = Verdict::Ineligible(Rejection::ForeignVariable {
            name: "x".into(),
            owner: outer,
        });
        let main_records: Vec<_> = folded.report.in_function(main).collect();
        assert_eq!(main_records.len(), 1);
        assert_eq!(main_records[0].call, "evalOuter(5)");
        assert_eq!(main_records[0].verdict, expected);
        assert!(folded.report.records.iter().all(|r| r.verdict == expected));
        assert_eq!(folded.report.folded_count(), 0);
    }

    #[test]
    fn test_leaves_faulting_and_ineligible_calls() {
        let arena = Bump::new();
        let b = ProgramBuilder::new(&arena);
        let div = b.declare("evalDiv", &[("a", Type::INT), ("b", Type::INT)], Type::INT);
        b.define(div, b.block(&[b.ret(div, b.op("div", b.var(div, "a"), b.var(div, "b")))]));
        let main = b.declare("main", &[("n", Type::INT)], Type::UNIT);
        let by_zero = b.call(div, &[b.int(1), b.int(0)]);
        let by_param = b.call(div, &[b.int(1), b.var(main, "n")]);
        b.define(main, b.block(&[by_zero, by_param]));
        let program = b.build();

        let folded = fold_program(&arena, &program, &EvalOptions::default()).unwrap();

        let verdicts: Vec<_> = folded.report.in_function(main).map(|r| &r.verdict).collect();
        assert_eq!(
            verdicts,
            [
                &Verdict::RuntimeFault(RuntimeError::DivisionByZero),
                &Verdict::Ineligible(Rejection::ForeignVariable {
                    name: "n".into(),
                    owner: main,
                }),
            ]
        );
        assert_eq!(folded.report.folded_count(), 0);
    }

    #[test]
    fn test_internal_error_aborts() {
        let arena = Bump::new();
        let b = ProgramBuilder::new(&arena);
        let f = b.declare("evalNothing", &[], Type::INT);
        b.define(f, b.block(&[]));
        let main = b.declare("main", &[], Type::UNIT);
        b.define(main, b.block(&[b.call(f, &[])]));
        let program = b.build();

        let err = fold_program(&arena, &program, &EvalOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FoldError::Internal {
                function: "main".into(),
                call: "evalNothing()".into(),
                cause: InternalError::MissingReturn("evalNothing".into()),
            }
        );
    }
}
