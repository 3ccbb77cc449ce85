//! Host integration: pass configuration and the folding pass itself.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use evalconst_core::api::{EvalOptions, fold_program};
//! use evalconst_core::ast::ProgramBuilder;
//! use evalconst_core::types::Type;
//!
//! let arena = Bump::new();
//! let b = ProgramBuilder::new(&arena);
//! let twice = b.declare("evalTwice", &[("x", Type::INT)], Type::INT);
//! b.define(twice, b.block(&[b.ret(twice, b.op("times", b.var(twice, "x"), b.int(2)))]));
//! let main = b.declare("main", &[], Type::INT);
//! b.define(main, b.block(&[b.ret(main, b.call(twice, &[b.int(21)]))]));
//! let program = b.build();
//!
//! let folded = fold_program(&arena, &program, &EvalOptions::default()).unwrap();
//! assert_eq!(folded.program.render_function(main), "fun main(): Int {\n    return 42\n}");
//! ```

pub mod fold;
pub mod options;

pub use fold::{FoldError, FoldRecord, FoldReport, Folded, Verdict, fold_program};
pub use options::{EvalOptions, OptionError, PREFIX_OPTION, STACK_LIMIT_OPTION, STEP_LIMIT_OPTION};
