//! Tree-walking evaluator for marker function calls.
//!
//! The evaluator executes a call the checker accepted and produces the literal
//! it would return at run time.
//!
//! ## Design Principles
//!
//! - **Never panic**: trees that break the checker's guarantees produce
//!   [`InternalError`]s, not crashes.
//! - **Bounded**: loop iterations and call depth are capped by a
//!   [`Governor`](governor::Governor); native stack use is guarded separately.
//! - **Strict**: operands are evaluated eagerly, left to right, receiver first.
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use evalconst_core::ast::ProgramBuilder;
//! use evalconst_core::evaluator::{self, EvaluatorOptions};
//! use evalconst_core::types::Type;
//! use evalconst_core::values::Literal;
//!
//! let arena = Bump::new();
//! let b = ProgramBuilder::new(&arena);
//! let sum = b.declare("evalSum", &[("a", Type::INT), ("b", Type::INT)], Type::INT);
//! b.define(sum, b.block(&[b.ret(sum, b.op("plus", b.var(sum, "a"), b.var(sum, "b")))]));
//! let call = b.call(sum, &[b.int(1), b.int(2)]);
//! let program = b.build();
//!
//! let call = call.as_call().unwrap();
//! let result = evaluator::eval_call(&program, "eval", call, EvaluatorOptions::default());
//! assert_eq!(result, Ok(Literal::Int(3)));
//! ```

mod error;
mod eval;
pub mod governor;


pub use error::{EvalError, InternalError, ResourceExceeded, RuntimeError};
pub use eval::Evaluator;

use crate::ast::{Call, Program};
use crate::values::Literal;

/// Resource limits of one top-level evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Maximum number of loop iterations.
    ///
    /// Default: 1_000_000
    pub step_limit: u64,

    /// Maximum number of nested marker function activations.
    ///
    /// Default: 1000
    pub stack_limit: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            step_limit: 1_000_000,
            stack_limit: 1000,
        }
    }
}

/// Evaluate `call` with a fresh environment and governor.
pub fn eval_call<'a>(
    program: &Program<'a>,
    marker: &str,
    call: &Call<'a>,
    options: EvaluatorOptions,
) -> Result<Literal, EvalError> {
    Evaluator::new(program, marker, options).eval_call(call)
}
