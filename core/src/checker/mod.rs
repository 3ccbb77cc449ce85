//! Eligibility checking.
//!
//! Before a call to a marker function is evaluated, the checker walks
//! everything the call can reach and decides whether the evaluator supports
//! all of it. The answer is conservative: when in doubt, reject.
//!
//! The walk carries an immutable linked stack of the functions and loops it is
//! currently inside ([`Visited`]). It serves two purposes:
//!
//! - Recursion: a call to a function already on the stack is accepted without
//!   descending into its body again, so recursive code is checked once.
//! - Scoping: variable accesses and returns must target the innermost function
//!   of the walk, and loop jumps a loop inside it. The evaluator resolves names
//!   in the current activation only, so anything else (a caller's local, or an
//!   enclosing function's local read from a local function) is rejected.
//!
//! Resource use is not the checker's concern: an accepted call may still run
//! out of steps or stack in the evaluator.

#[cfg(test)]
mod checker_test;

use crate::ast::{Call, Expr, Function, FunctionId, INTRINSICS_PACKAGE, LoopId, Owner, Program};
use crate::stack::ensure_sufficient_stack;
use alloc::string::String;
use thiserror::Error;
use tracing::trace;

/// Member operations of primitive types the evaluator can dispatch.
const PRIMITIVE_OPERATIONS: &[&str] = &[
    "not",
    "unaryMinus",
    "unaryPlus",
    "inv",
    "toString",
    "toChar",
    "toByte",
    "toShort",
    "toInt",
    "toLong",
    "toFloat",
    "toDouble",
    "equals",
    "compareTo",
    "plus",
    "minus",
    "times",
    "div",
    "rem",
    "and",
    "or",
    "xor",
    "shl",
    "shr",
    "ushr",
    "less",
    "lessOrEqual",
    "greater",
    "greaterOrEqual",
];

/// Member operations of `String` the evaluator can dispatch.
const STRING_OPERATIONS: &[&str] = &["length", "plus", "get", "compareTo", "equals", "toString"];

/// Compiler intrinsics the evaluator can dispatch.
const INTRINSICS: &[&str] = &[
    "less",
    "lessOrEqual",
    "greater",
    "greaterOrEqual",
    "EQEQ",
    "ieee754equals",
    "ANDAND",
    "OROR",
];

/// How a call target is treated by the checker and the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callee {
    /// A function whose name carries the marker: its body is evaluated.
    Marked,
    /// A whitelisted primitive operation, handed to the builtin dispatcher.
    Builtin,
    /// Anything else.
    Other,
}

/// Classify `function` for the given marker.
///
/// A bodiless whitelisted operation is a builtin even when its name carries
/// the marker.
pub fn classify(function: &Function<'_>, marker: &str) -> Callee {
    if function.body.is_none() && is_whitelisted(function) {
        Callee::Builtin
    } else if function.name.starts_with(marker) {
        Callee::Marked
    } else {
        Callee::Other
    }
}

fn is_whitelisted(function: &Function<'_>) -> bool {
    match function.owner {
        Owner::Class(ty) if ty.is_string() => STRING_OPERATIONS.contains(&function.name),
        Owner::Class(ty) if ty.is_primitive() => PRIMITIVE_OPERATIONS.contains(&function.name),
        Owner::Package(package) if package == INTRINSICS_PACKAGE => {
            INTRINSICS.contains(&function.name)
        }
        Owner::Class(_) | Owner::Package(_) | Owner::Function(_) => false,
    }
}

/// Why a call was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("call to unknown function {0}")]
    UnknownFunction(FunctionId),

    #[error("{0} is neither marked nor a supported primitive operation")]
    Unsupported(String),

    #[error("{0} has no body")]
    MissingBody(String),

    #[error("{0} has a parameter, receiver or return type that is not a constant type")]
    NonConstantSignature(String),

    #[error("{function} takes {expected} operands but is called with {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("variable '{0}' has no initializer")]
    UninitializedVariable(String),

    #[error("variable '{0}' does not have a constant type")]
    NonConstantVariable(String),

    #[error("variable '{name}' belongs to {owner}, outside the evaluated code")]
    ForeignVariable { name: String, owner: FunctionId },

    #[error("return from {0}, outside the evaluated code")]
    ForeignReturn(FunctionId),

    #[error("jump to {0}, outside the evaluated code")]
    ForeignJump(LoopId),
}

/// A function or loop the walk is inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Function(FunctionId),
    Loop(LoopId),
}

/// Immutable linked stack of enclosing functions and loops.
///
/// Each level of the recursion pushes by creating a new node on its own stack
/// frame that points at its parent, so nothing needs to be popped.
#[derive(Debug, Clone, Copy)]
pub struct Visited<'v> {
    entry: Entry,
    parent: Option<&'v Visited<'v>>,
}

impl<'v> Visited<'v> {
    pub fn root(entry: Entry) -> Self {
        Self {
            entry,
            parent: None,
        }
    }

    pub fn push(&'v self, entry: Entry) -> Visited<'v> {
        Visited {
            entry,
            parent: Some(self),
        }
    }

    pub fn contains(&self, entry: Entry) -> bool {
        let mut node = Some(self);
        while let Some(visited) = node {
            if visited.entry == entry {
                return true;
            }
            node = visited.parent;
        }
        false
    }

    /// The nearest enclosing function.
    pub fn current_function(&self) -> Option<FunctionId> {
        let mut node = Some(self);
        while let Some(visited) = node {
            if let Entry::Function(id) = visited.entry {
                return Some(id);
            }
            node = visited.parent;
        }
        None
    }

    /// Whether `id` encloses this point without a function boundary between.
    pub fn in_loop(&self, id: LoopId) -> bool {
        let mut node = Some(self);
        while let Some(visited) = node {
            match visited.entry {
                Entry::Loop(lp) if lp == id => return true,
                Entry::Loop(_) => {}
                Entry::Function(_) => return false,
            }
            node = visited.parent;
        }
        false
    }
}

fn on_stack(stack: Option<&Visited<'_>>, entry: Entry) -> bool {
    stack.is_some_and(|s| s.contains(entry))
}

fn is_current(stack: Option<&Visited<'_>>, function: FunctionId) -> bool {
    stack.and_then(Visited::current_function) == Some(function)
}

/// Decides whether calls can be evaluated. Holds no mutable state, so one
/// checker serves a whole pass.
pub struct Checker<'p, 'a> {
    program: &'p Program<'a>,
    marker: &'p str,
}

impl<'p, 'a> Checker<'p, 'a> {
    pub fn new(program: &'p Program<'a>, marker: &'p str) -> Self {
        Self { program, marker }
    }

    /// Whether `call` and everything it reaches can be evaluated.
    pub fn is_eligible(&self, call: &Call<'a>) -> bool {
        self.check(call).is_ok()
    }

    /// Like [`Self::is_eligible`], with the reason for a rejection.
    ///
    /// Only calls to marker functions are candidates; a bare builtin call is
    /// rejected here even though it could be part of an eligible body.
    pub fn check(&self, call: &Call<'a>) -> Result<(), Rejection> {
        let function = self.function(call.callee)?;
        if classify(function, self.marker) != Callee::Marked {
            return Err(Rejection::Unsupported(function.fq_name()));
        }
        let result = self.check_call(call, None);
        if let Err(reason) = &result {
            trace!(callee = %function.name, %reason, "call rejected");
        }
        result
    }

    fn function(&self, id: FunctionId) -> Result<&'p Function<'a>, Rejection> {
        self.program.function(id).ok_or(Rejection::UnknownFunction(id))
    }

    fn check_call(&self, call: &Call<'a>, stack: Option<&Visited<'_>>) -> Result<(), Rejection> {
        let function = self.function(call.callee)?;

        let expected = function.operand_types().count();
        if call.operand_count() != expected {
            return Err(Rejection::ArityMismatch {
                function: function.fq_name(),
                expected,
                found: call.operand_count(),
            });
        }
        for operand in call.operands() {
            self.check_expr(operand, stack)?;
        }

        match classify(function, self.marker) {
            Callee::Builtin => Ok(()),
            Callee::Other => Err(Rejection::Unsupported(function.fq_name())),
            Callee::Marked => {
                let entry = Entry::Function(function.id);
                if on_stack(stack, entry) {
                    return Ok(());
                }
                check_signature(function)?;
                let body = function
                    .body
                    .ok_or_else(|| Rejection::MissingBody(function.fq_name()))?;
                let frame = match stack {
                    Some(parent) => parent.push(entry),
                    None => Visited::root(entry),
                };
                self.check_expr(body, Some(&frame))
            }
        }
    }

    fn check_expr(&self, expr: &Expr<'a>, stack: Option<&Visited<'_>>) -> Result<(), Rejection> {
        ensure_sufficient_stack(|| self.check_expr_inner(expr, stack))
    }

    fn check_expr_inner(
        &self,
        expr: &Expr<'a>,
        stack: Option<&Visited<'_>>,
    ) -> Result<(), Rejection> {
        match expr {
            Expr::Const(_) => Ok(()),

            Expr::VariableRef { name, owner } => {
                if is_current(stack, *owner) {
                    Ok(())
                } else {
                    Err(Rejection::ForeignVariable {
                        name: String::from(*name),
                        owner: *owner,
                    })
                }
            }

            Expr::VariableDecl { name, ty, init } => {
                let init = init.ok_or_else(|| Rejection::UninitializedVariable(String::from(*name)))?;
                if !ty.is_constant() {
                    return Err(Rejection::NonConstantVariable(String::from(*name)));
                }
                self.check_expr(init, stack)
            }

            Expr::Assign { name, owner, value } => {
                if !is_current(stack, *owner) {
                    return Err(Rejection::ForeignVariable {
                        name: String::from(*name),
                        owner: *owner,
                    });
                }
                self.check_expr(value, stack)
            }

            Expr::Call(call) => self.check_call(call, stack),

            Expr::Block(statements) => statements
                .iter()
                .try_for_each(|statement| self.check_expr(statement, stack)),

            Expr::Branch(arms) => arms.iter().try_for_each(|arm| {
                self.check_expr(arm.cond, stack)?;
                self.check_expr(arm.result, stack)
            }),

            Expr::WhileLoop(lp) | Expr::DoWhileLoop(lp) => {
                let entry = Entry::Loop(lp.id);
                let frame = match stack {
                    Some(parent) => parent.push(entry),
                    None => Visited::root(entry),
                };
                self.check_expr(lp.cond, Some(&frame))?;
                match lp.body {
                    Some(body) => self.check_expr(body, Some(&frame)),
                    None => Ok(()),
                }
            }

            Expr::Return { target, value } => {
                if !is_current(stack, *target) {
                    return Err(Rejection::ForeignReturn(*target));
                }
                self.check_expr(value, stack)
            }

            Expr::Break { target } | Expr::Continue { target } => {
                if stack.is_some_and(|s| s.in_loop(*target)) {
                    Ok(())
                } else {
                    Err(Rejection::ForeignJump(*target))
                }
            }
        }
    }
}

/// Marker functions must take and return constant types.
fn check_signature(function: &Function<'_>) -> Result<(), Rejection> {
    let constant = function.operand_types().all(|ty| ty.is_constant())
        && function.return_type.is_constant();
    if constant {
        Ok(())
    } else {
        Err(Rejection::NonConstantSignature(function.fq_name()))
    }
}
