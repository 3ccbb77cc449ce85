//! Evaluation errors.
//!
//! # Error Categories
//!
//! - **Resource exceeded**: the step or call-depth ceiling was hit. The call is
//!   left as it is; nothing is wrong with the program.
//!
//! - **Runtime faults**: the code would throw when it runs (division by zero,
//!   string index out of range). Folding it would change behaviour, so the call
//!   is left as it is too.
//!
//! - **Internal errors**: the tree broke an assumption the checker guarantees
//!   (undefined variable, unknown builtin signature, ...). These abort the pass.

use crate::ast::{FunctionId, LoopId};
use crate::builtins::BuiltinError;
use crate::scope_stack::{BindError, PopError};
use alloc::string::String;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    ResourceExceeded(#[from] ResourceExceeded),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl EvalError {
    /// Whether the pass may carry on and leave the call unevaluated.
    pub fn is_recoverable(&self) -> bool {
        match self {
            EvalError::ResourceExceeded(_) | EvalError::Runtime(_) => true,
            EvalError::Internal(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResourceExceeded {
    #[error("evaluation exceeded the step limit of {limit}")]
    StepLimit { limit: u64 },

    #[error("evaluation exceeded the call depth limit of {limit}")]
    StackLimit { limit: usize },
}

/// Operations that would throw at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: i32, length: i32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InternalError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Pop(#[from] PopError),

    #[error(transparent)]
    Builtin(BuiltinError),

    #[error("call to unknown function {0}")]
    UnknownFunction(FunctionId),

    #[error("{0} is neither a marker function nor a builtin")]
    UnsupportedCallee(String),

    #[error("function {0} has no body")]
    MissingBody(String),

    #[error("{function} expects {expected} operands, got {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("condition evaluated to {0}, expected a boolean")]
    NonBooleanCondition(String),

    #[error("variable '{0}' declared without an initializer")]
    MissingInitializer(String),

    #[error("{0} finished without returning a value")]
    MissingReturn(String),

    #[error("return to {0} escaped its activation")]
    EscapedReturn(FunctionId),

    #[error("jump to {0} escaped its loop")]
    EscapedJump(LoopId),
}

impl From<BuiltinError> for EvalError {
    fn from(e: BuiltinError) -> Self {
        match e {
            BuiltinError::Runtime(e) => EvalError::Runtime(e),
            other => EvalError::Internal(InternalError::Builtin(other)),
        }
    }
}

impl From<BindError> for EvalError {
    fn from(e: BindError) -> Self {
        EvalError::Internal(e.into())
    }
}

impl From<PopError> for EvalError {
    fn from(e: PopError) -> Self {
        EvalError::Internal(e.into())
    }
}
