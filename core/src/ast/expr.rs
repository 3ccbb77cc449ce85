//! Expression and statement nodes.

use crate::ast::{FunctionId, LoopId};
use crate::types::Type;
use crate::values::Literal;

/// A node of the tree the engine understands.
///
/// The set of variants is closed: both the eligibility checker and the
/// evaluator match on it exhaustively, so a node kind cannot be accepted by
/// one without being handled by the other.
///
/// Statements and expressions share this type. A function body is a `Block`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    /// A typed literal.
    Const(Literal),

    /// Read of a local variable or parameter owned by `owner`.
    VariableRef { name: &'a str, owner: FunctionId },

    /// Introduces a local in the innermost scope.
    VariableDecl {
        name: &'a str,
        ty: Type<'a>,
        init: Option<&'a Expr<'a>>,
    },

    /// Writes an existing local owned by `owner`.
    Assign {
        name: &'a str,
        owner: FunctionId,
        value: &'a Expr<'a>,
    },

    Call(Call<'a>),

    /// Statements in order; the value is that of the last one, or unit.
    Block(&'a [&'a Expr<'a>]),

    /// Arms are tried in order; the first true condition wins.
    Branch(&'a [BranchArm<'a>]),

    WhileLoop(Loop<'a>),

    /// Like `WhileLoop`, but the body runs once before the first check.
    DoWhileLoop(Loop<'a>),

    /// Returns from the activation of `target`.
    Return {
        target: FunctionId,
        value: &'a Expr<'a>,
    },

    Break { target: LoopId },

    Continue { target: LoopId },
}

/// Invocation of a function.
///
/// The receiver, when present, is passed as the first argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Call<'a> {
    pub callee: FunctionId,
    pub receiver: Option<&'a Expr<'a>>,
    pub args: &'a [&'a Expr<'a>],
}

impl<'a> Call<'a> {
    /// Receiver followed by the value arguments.
    pub fn operands(&self) -> impl Iterator<Item = &'a Expr<'a>> + 'a {
        let args: &'a [&'a Expr<'a>] = self.args;
        self.receiver.into_iter().chain(args.iter().copied())
    }

    pub fn operand_count(&self) -> usize {
        self.args.len() + usize::from(self.receiver.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchArm<'a> {
    pub cond: &'a Expr<'a>,
    pub result: &'a Expr<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loop<'a> {
    pub id: LoopId,
    pub label: Option<&'a str>,
    pub cond: &'a Expr<'a>,
    pub body: Option<&'a Expr<'a>>,
}

impl<'a> Expr<'a> {
    pub fn as_call(&self) -> Option<&Call<'a>> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_const(&self) -> Option<&Literal> {
        match self {
            Expr::Const(lit) => Some(lit),
            _ => None,
        }
    }
}
