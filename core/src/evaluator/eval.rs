//! Core evaluation logic.

use crate::ast::{Call, Expr, Function, FunctionId, INTRINSICS_PACKAGE, Loop, LoopId, Owner, Program};
use crate::builtins::{self, BuiltinError, Operand};
use crate::checker::{Callee, classify};
use crate::evaluator::governor::Governor;
use crate::evaluator::{EvalError, EvaluatorOptions, InternalError, ResourceExceeded};
use crate::scope_stack::{BindError, PopError, ScopeStack};
use crate::stack::ensure_sufficient_stack;
use crate::types::Type;
use crate::values::Literal;
use alloc::string::ToString;
use smallvec::SmallVec;
use tracing::trace;

/// Why evaluation of a node stopped early.
///
/// Control transfers travel on the error channel so `?` carries them up to the
/// node that handles them: the activation of the returning function, or the
/// loop being broken out of or continued.
#[derive(Debug)]
enum Unwind {
    Return { target: FunctionId, value: Literal },
    Break(LoopId),
    Continue(LoopId),
    Error(EvalError),
}

type Flow<T = Literal> = Result<T, Unwind>;

impl From<EvalError> for Unwind {
    fn from(e: EvalError) -> Self {
        Unwind::Error(e)
    }
}

impl From<InternalError> for Unwind {
    fn from(e: InternalError) -> Self {
        Unwind::Error(e.into())
    }
}

impl From<ResourceExceeded> for Unwind {
    fn from(e: ResourceExceeded) -> Self {
        Unwind::Error(e.into())
    }
}

impl From<BuiltinError> for Unwind {
    fn from(e: BuiltinError) -> Self {
        Unwind::Error(e.into())
    }
}

impl From<BindError> for Unwind {
    fn from(e: BindError) -> Self {
        Unwind::Error(e.into())
    }
}

impl From<PopError> for Unwind {
    fn from(e: PopError) -> Self {
        Unwind::Error(e.into())
    }
}

/// Evaluator for calls accepted by the checker.
///
/// Holds the environment and the governor of one top-level evaluation; create
/// a fresh evaluator for every call.
pub struct Evaluator<'p, 'a> {
    program: &'p Program<'a>,
    marker: &'p str,
    env: ScopeStack<'a, Literal>,
    governor: Governor,
}

impl<'p, 'a> Evaluator<'p, 'a> {
    pub fn new(program: &'p Program<'a>, marker: &'p str, options: EvaluatorOptions) -> Self {
        Self {
            program,
            marker,
            env: ScopeStack::new(),
            governor: Governor::new(options.step_limit, options.stack_limit),
        }
    }

    /// Evaluate `call` to a literal.
    pub fn eval_call(&mut self, call: &Call<'a>) -> Result<Literal, EvalError> {
        match self.call(call) {
            Ok(value) => Ok(value),
            Err(Unwind::Error(e)) => Err(e),
            Err(Unwind::Return { target, .. }) => Err(InternalError::EscapedReturn(target).into()),
            Err(Unwind::Break(id) | Unwind::Continue(id)) => {
                Err(InternalError::EscapedJump(id).into())
            }
        }
    }

    /// Loop iterations charged so far.
    pub fn steps(&self) -> u64 {
        self.governor.steps()
    }

    fn eval(&mut self, expr: &'a Expr<'a>) -> Flow {
        ensure_sufficient_stack(|| self.eval_inner(expr))
    }

    fn eval_inner(&mut self, expr: &'a Expr<'a>) -> Flow {
        match expr {
            Expr::Const(value) => Ok(value.clone()),

            Expr::VariableRef { name, .. } => match self.env.lookup(name) {
                Some(value) => Ok(value.clone()),
                None => Err(BindError::Undefined(name.to_string()).into()),
            },

            Expr::VariableDecl { name, init, .. } => {
                let init =
                    init.ok_or_else(|| InternalError::MissingInitializer(name.to_string()))?;
                let value = self.eval(init)?;
                self.env.define(*name, value.clone())?;
                Ok(value)
            }

            Expr::Assign { name, value, .. } => {
                let value = self.eval(value)?;
                self.env.assign(name, value.clone())?;
                Ok(value)
            }

            Expr::Call(call) => self.call(call),

            Expr::Block(statements) => self.scoped(|this| {
                let mut last = Literal::Unit;
                for &statement in statements.iter() {
                    last = this.eval(statement)?;
                }
                Ok(last)
            }),

            Expr::Branch(arms) => self.scoped(|this| {
                for arm in arms.iter() {
                    if this.condition(arm.cond)? {
                        return this.eval(arm.result);
                    }
                }
                Ok(Literal::Unit)
            }),

            Expr::WhileLoop(lp) => self.scoped(|this| {
                while this.condition(lp.cond)? {
                    if !this.scoped(|this| this.iterate(lp))? {
                        break;
                    }
                    this.governor.charge_step()?;
                }
                Ok(Literal::Unit)
            }),

            // The condition runs in the iteration's frame, so it sees the
            // body's declarations.
            Expr::DoWhileLoop(lp) => self.scoped(|this| {
                loop {
                    let again = this.scoped(|this| {
                        if !this.iterate(lp)? {
                            return Ok(false);
                        }
                        this.governor.charge_step()?;
                        this.condition(lp.cond)
                    })?;
                    if !again {
                        break;
                    }
                }
                Ok(Literal::Unit)
            }),

            Expr::Return { target, value } => {
                let value = self.eval(value)?;
                Err(Unwind::Return {
                    target: *target,
                    value,
                })
            }

            Expr::Break { target } => Err(Unwind::Break(*target)),

            Expr::Continue { target } => Err(Unwind::Continue(*target)),
        }
    }

    /// Run `f` in a fresh innermost frame.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Flow<T>) -> Flow<T> {
        self.env.push_frame();
        let result = f(self);
        self.env.pop_frame()?;
        result
    }

    /// Run one pass of a loop body in the current frame. `Ok(false)` means the
    /// loop was broken out of.
    fn iterate(&mut self, lp: &Loop<'a>) -> Flow<bool> {
        let Some(body) = lp.body else {
            return Ok(true);
        };
        let single = [body];
        let statements: &[&'a Expr<'a>] = match body {
            Expr::Block(statements) => *statements,
            _ => &single,
        };
        for &statement in statements {
            match self.eval(statement) {
                Ok(_) => {}
                Err(Unwind::Break(id)) if id == lp.id => return Ok(false),
                Err(Unwind::Continue(id)) if id == lp.id => return Ok(true),
                Err(other) => return Err(other),
            }
        }
        Ok(true)
    }

    fn condition(&mut self, cond: &'a Expr<'a>) -> Flow<bool> {
        let value = self.eval(cond)?;
        match value.as_bool() {
            Some(b) => Ok(b),
            None => Err(InternalError::NonBooleanCondition(value.to_source()).into()),
        }
    }

    fn call(&mut self, call: &Call<'a>) -> Flow {
        let program = self.program;
        let function = program
            .function(call.callee)
            .ok_or(InternalError::UnknownFunction(call.callee))?;

        let expected = function.operand_types().count();
        if call.operand_count() != expected {
            return Err(InternalError::ArityMismatch {
                function: function.fq_name(),
                expected,
                found: call.operand_count(),
            }
            .into());
        }

        match classify(function, self.marker) {
            Callee::Marked => self.invoke(function, call),
            Callee::Builtin => self.builtin(function, call),
            Callee::Other => Err(InternalError::UnsupportedCallee(function.fq_name()).into()),
        }
    }

    /// Call a marker function in a new activation.
    fn invoke(&mut self, function: &'p Function<'a>, call: &Call<'a>) -> Flow {
        self.governor.enter_call(self.env.depth())?;
        let body = function
            .body
            .ok_or_else(|| InternalError::MissingBody(function.fq_name()))?;

        let mut args: SmallVec<[Literal; 4]> = SmallVec::new();
        for operand in call.operands() {
            args.push(self.eval(operand)?);
        }

        trace!(function = function.name, depth = self.env.depth() + 1, "enter");
        self.env.push_activation();
        let result = self.run_body(function, args, body);
        self.env.pop_activation()?;

        match result {
            Err(Unwind::Return { target, value }) if target == function.id => Ok(value),
            Ok(_) if function.return_type != Type::UNIT => {
                Err(InternalError::MissingReturn(function.fq_name()).into())
            }
            other => other,
        }
    }

    fn run_body(
        &mut self,
        function: &Function<'a>,
        args: SmallVec<[Literal; 4]>,
        body: &'a Expr<'a>,
    ) -> Flow {
        let params: &'a [crate::ast::Param<'a>] = function.params;
        let names = function.receiver.iter().chain(params.iter()).map(|p| p.name);
        for (name, value) in names.zip(args) {
            self.env.define(name, value)?;
        }
        self.eval(body)
    }

    /// Evaluate operands in the caller's environment and dispatch.
    ///
    /// `ANDAND` and `OROR` stop after the first operand when it decides the
    /// result.
    fn builtin(&mut self, function: &Function<'a>, call: &Call<'a>) -> Flow {
        let short_circuit = match (function.owner, function.name) {
            (Owner::Package(INTRINSICS_PACKAGE), "ANDAND") => Some(false),
            (Owner::Package(INTRINSICS_PACKAGE), "OROR") => Some(true),
            _ => None,
        };

        let mut operands: SmallVec<[Operand<'a>; 3]> = SmallVec::new();
        for (ty, expr) in function.operand_types().zip(call.operands()) {
            let value = self.eval(expr)?;
            if operands.is_empty() && short_circuit.is_some() && value.as_bool() == short_circuit {
                return Ok(value);
            }
            operands.push(Operand::new(ty, value));
        }
        Ok(builtins::dispatch(function.name, &operands)?)
    }
}
