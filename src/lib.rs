//! evalconst - compile-time evaluation of marker function calls
//!
//! # Overview
//!
//! Calls to functions whose name starts with a marker (`eval` by default) are
//! replaced by the literal they return, when everything they reach is free of
//! side effects, works on primitive and string values only, and finishes
//! within the configured step and call depth limits. Anything else is left as
//! it is.
//!
//! # Quick Start
//!
//! ```
//! use bumpalo::Bump;
//! use evalconst::{EvalOptions, ProgramBuilder, Type};
//!
//! let arena = Bump::new();
//! let b = ProgramBuilder::new(&arena);
//! let square = b.declare("evalSquare", &[("x", Type::INT)], Type::INT);
//! b.define(square, b.block(&[b.ret(square, b.op("times", b.var(square, "x"), b.var(square, "x")))]));
//! let main = b.declare("main", &[], Type::INT);
//! b.define(main, b.block(&[b.ret(main, b.call(square, &[b.int(12)]))]));
//! let program = b.build();
//!
//! let folded = evalconst::fold(&arena, &program, &EvalOptions::default()).unwrap();
//! assert_eq!(folded.program.render_function(main), "fun main(): Int {\n    return 144\n}");
//! ```

pub mod error;

pub use error::Error;

// Re-export public API from evalconst_core
pub use evalconst_core::api::{
    EvalOptions, FoldRecord, FoldReport, Folded, OptionError, PREFIX_OPTION, STACK_LIMIT_OPTION,
    STEP_LIMIT_OPTION, Verdict,
};
pub use evalconst_core::ast::{self, Expr, FunctionId, Program, ProgramBuilder};
pub use evalconst_core::checker::{Checker, Rejection};
pub use evalconst_core::evaluator::{EvalError, InternalError, ResourceExceeded, RuntimeError};
pub use evalconst_core::fixtures;
pub use evalconst_core::types::{self, Type};
pub use evalconst_core::values::{self, Literal};

use bumpalo::Bump;

/// Fold every eligible marker call of `program`.
///
/// Like [`evalconst_core::api::fold_program`], with internal errors turned
/// into diagnostics that point at the offending call.
pub fn fold<'a>(
    arena: &'a Bump,
    program: &Program<'a>,
    options: &EvalOptions,
) -> Result<Folded<'a>, Error> {
    evalconst_core::api::fold_program(arena, program, options)
        .map_err(|e| Error::from_fold(program, e))
}
