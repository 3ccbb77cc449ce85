//! The tree the engine checks and evaluates.
//!
//! Trees are produced by a compiler front end (or by [`ProgramBuilder`]) and are
//! immutable once built. Calls name their callee by [`FunctionId`]; returns and
//! loop jumps name their target by identity, not by position.

mod builder;
mod display;
mod expr;
mod function;
mod program;

pub use builder::{INTRINSICS_PACKAGE, ProgramBuilder};
pub use expr::{BranchArm, Call, Expr, Loop};
pub use function::{Function, FunctionId, LoopId, Owner, Param, RECEIVER_NAME};
pub use program::Program;
