//! Arena-backed construction of programs.
//!
//! Front ends (and tests) build trees through [`ProgramBuilder`]. All nodes are
//! allocated in the caller's [`Bump`], so the resulting [`Program`] borrows from
//! it and outlives any number of checker/evaluator passes.
//!
//! Builder methods take `&self`, so constructors can be nested freely:
//!
//! ```
//! use bumpalo::Bump;
//! use evalconst_core::ast::ProgramBuilder;
//! use evalconst_core::types::Type;
//!
//! let arena = Bump::new();
//! let b = ProgramBuilder::new(&arena);
//! let sum = b.declare("evalSum", &[("a", Type::INT), ("b", Type::INT)], Type::INT);
//! b.define(sum, b.block(&[b.ret(sum, b.op("plus", b.var(sum, "a"), b.var(sum, "b")))]));
//! let program = b.build();
//! assert_eq!(program.len(), 2); // evalSum and Int.plus
//! ```

use crate::ast::{
    BranchArm, Call, Expr, Function, FunctionId, Loop, LoopId, Owner, Param, Program,
    RECEIVER_NAME,
};
use crate::types::Type;
use crate::values::Literal;
use alloc::vec::Vec;
use bumpalo::Bump;
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;

/// Package of the compiler intrinsics (`less`, `EQEQ`, `ANDAND`, ...).
pub const INTRINSICS_PACKAGE: &str = "kotlin.internal.ir";

/// Key under which builtin declarations are interned.
type BuiltinKey<'a> = (Owner<'a>, &'a str, &'a [Type<'a>]);

pub struct ProgramBuilder<'a> {
    arena: &'a Bump,
    functions: RefCell<Vec<Function<'a>>>,
    builtins: RefCell<HashMap<BuiltinKey<'a>, FunctionId>>,
    next_loop: Cell<u32>,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self {
            arena,
            functions: RefCell::new(Vec::new()),
            builtins: RefCell::new(HashMap::new()),
            next_loop: Cell::new(0),
        }
    }

    pub fn arena(&self) -> &'a Bump {
        self.arena
    }

    pub fn build(self) -> Program<'a> {
        Program::from_functions(self.functions.into_inner())
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Declare a top-level function. Its body is attached later with [`Self::define`].
    pub fn declare(&self, name: &str, params: &[(&str, Type<'a>)], ret: Type<'a>) -> FunctionId {
        self.declare_in(Owner::Package(""), None, name, params, ret)
    }

    /// Declare a function local to `parent`.
    pub fn declare_local(
        &self,
        parent: FunctionId,
        name: &str,
        params: &[(&str, Type<'a>)],
        ret: Type<'a>,
    ) -> FunctionId {
        self.declare_in(Owner::Function(parent), None, name, params, ret)
    }

    /// Declare a function with an explicit owner and optional receiver type.
    pub fn declare_in(
        &self,
        owner: Owner<'a>,
        receiver: Option<Type<'a>>,
        name: &str,
        params: &[(&str, Type<'a>)],
        ret: Type<'a>,
    ) -> FunctionId {
        let params = self
            .arena
            .alloc_slice_fill_iter(params.iter().map(|(name, ty)| Param {
                name: self.arena.alloc_str(name),
                ty: *ty,
            }));
        self.push_function(owner, receiver, name, params, ret)
    }

    /// Attach a body to a declared function.
    pub fn define(&self, id: FunctionId, body: &'a Expr<'a>) {
        if let Some(function) = self.functions.borrow_mut().get_mut(id.0 as usize) {
            function.body = Some(body);
        }
    }

    /// Member operation of a builtin type, interned by signature.
    pub fn builtin(
        &self,
        owner: Type<'a>,
        name: &str,
        params: &[Type<'a>],
        ret: Type<'a>,
    ) -> FunctionId {
        self.interned(Owner::Class(owner), Some(owner), name, params, ret)
    }

    /// Compiler intrinsic such as `less` or `EQEQ`, interned by signature.
    pub fn intrinsic(&self, name: &str, params: &[Type<'a>], ret: Type<'a>) -> FunctionId {
        self.interned(Owner::Package(INTRINSICS_PACKAGE), None, name, params, ret)
    }

    fn interned(
        &self,
        owner: Owner<'a>,
        receiver: Option<Type<'a>>,
        name: &str,
        params: &[Type<'a>],
        ret: Type<'a>,
    ) -> FunctionId {
        let name: &'a str = self.arena.alloc_str(name);
        let param_types: &'a [Type<'a>] = self.arena.alloc_slice_copy(params);
        let key = (owner, name, param_types);
        if let Some(id) = self.builtins.borrow().get(&key) {
            return *id;
        }
        let params = self
            .arena
            .alloc_slice_fill_iter(param_types.iter().enumerate().map(|(i, ty)| Param {
                name: self.arena.alloc_str(&alloc::format!("p{}", i)),
                ty: *ty,
            }));
        let id = self.push_function(owner, receiver, name, params, ret);
        self.builtins.borrow_mut().insert(key, id);
        id
    }

    fn push_function(
        &self,
        owner: Owner<'a>,
        receiver: Option<Type<'a>>,
        name: &str,
        params: &'a [Param<'a>],
        ret: Type<'a>,
    ) -> FunctionId {
        let mut functions = self.functions.borrow_mut();
        let id = FunctionId(functions.len() as u32);
        functions.push(Function {
            id,
            name: self.arena.alloc_str(name),
            owner,
            receiver: receiver.map(|ty| Param {
                name: RECEIVER_NAME,
                ty,
            }),
            params,
            return_type: ret,
            body: None,
        });
        id
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn alloc(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.arena.alloc(expr)
    }

    pub fn lit(&self, value: impl Into<Literal>) -> &'a Expr<'a> {
        self.alloc(Expr::Const(value.into()))
    }

    pub fn int(&self, value: i32) -> &'a Expr<'a> {
        self.lit(value)
    }

    pub fn bool(&self, value: bool) -> &'a Expr<'a> {
        self.lit(value)
    }

    pub fn string(&self, value: &str) -> &'a Expr<'a> {
        self.lit(value)
    }

    pub fn var(&self, owner: FunctionId, name: &str) -> &'a Expr<'a> {
        self.alloc(Expr::VariableRef {
            name: self.arena.alloc_str(name),
            owner,
        })
    }

    /// Read of the dispatch receiver of `owner`.
    pub fn this(&self, owner: FunctionId) -> &'a Expr<'a> {
        self.alloc(Expr::VariableRef {
            name: RECEIVER_NAME,
            owner,
        })
    }

    pub fn decl(&self, name: &str, ty: Type<'a>, init: &'a Expr<'a>) -> &'a Expr<'a> {
        self.alloc(Expr::VariableDecl {
            name: self.arena.alloc_str(name),
            ty,
            init: Some(init),
        })
    }

    /// Declaration without an initializer (`var x: Int`).
    pub fn decl_uninit(&self, name: &str, ty: Type<'a>) -> &'a Expr<'a> {
        self.alloc(Expr::VariableDecl {
            name: self.arena.alloc_str(name),
            ty,
            init: None,
        })
    }

    pub fn assign(&self, owner: FunctionId, name: &str, value: &'a Expr<'a>) -> &'a Expr<'a> {
        self.alloc(Expr::Assign {
            name: self.arena.alloc_str(name),
            owner,
            value,
        })
    }

    pub fn call(&self, callee: FunctionId, args: &[&'a Expr<'a>]) -> &'a Expr<'a> {
        self.alloc(Expr::Call(Call {
            callee,
            receiver: None,
            args: self.arena.alloc_slice_copy(args),
        }))
    }

    pub fn call_on(
        &self,
        callee: FunctionId,
        receiver: &'a Expr<'a>,
        args: &[&'a Expr<'a>],
    ) -> &'a Expr<'a> {
        self.alloc(Expr::Call(Call {
            callee,
            receiver: Some(receiver),
            args: self.arena.alloc_slice_copy(args),
        }))
    }

    pub fn block(&self, statements: &[&'a Expr<'a>]) -> &'a Expr<'a> {
        self.alloc(Expr::Block(self.arena.alloc_slice_copy(statements)))
    }

    pub fn branch(&self, arms: &[(&'a Expr<'a>, &'a Expr<'a>)]) -> &'a Expr<'a> {
        let arms = self
            .arena
            .alloc_slice_fill_iter(arms.iter().map(|&(cond, result)| BranchArm { cond, result }));
        self.alloc(Expr::Branch(arms))
    }

    /// `if (cond) then`, with no else arm.
    pub fn if_then(&self, cond: &'a Expr<'a>, then: &'a Expr<'a>) -> &'a Expr<'a> {
        self.branch(&[(cond, then)])
    }

    /// `if (cond) then else otherwise`: the else arm is guarded by `true`.
    pub fn if_else(
        &self,
        cond: &'a Expr<'a>,
        then: &'a Expr<'a>,
        otherwise: &'a Expr<'a>,
    ) -> &'a Expr<'a> {
        self.branch(&[(cond, then), (self.bool(true), otherwise)])
    }

    /// Allocate an identity for a loop before building its body.
    pub fn loop_id(&self) -> LoopId {
        let id = self.next_loop.get();
        self.next_loop.set(id + 1);
        LoopId(id)
    }

    pub fn while_loop(&self, id: LoopId, cond: &'a Expr<'a>, body: &'a Expr<'a>) -> &'a Expr<'a> {
        self.alloc(Expr::WhileLoop(Loop {
            id,
            label: None,
            cond,
            body: Some(body),
        }))
    }

    pub fn do_while(&self, id: LoopId, cond: &'a Expr<'a>, body: &'a Expr<'a>) -> &'a Expr<'a> {
        self.alloc(Expr::DoWhileLoop(Loop {
            id,
            label: None,
            cond,
            body: Some(body),
        }))
    }

    pub fn ret(&self, target: FunctionId, value: &'a Expr<'a>) -> &'a Expr<'a> {
        self.alloc(Expr::Return { target, value })
    }

    pub fn brk(&self, target: LoopId) -> &'a Expr<'a> {
        self.alloc(Expr::Break { target })
    }

    pub fn cont(&self, target: LoopId) -> &'a Expr<'a> {
        self.alloc(Expr::Continue { target })
    }

    // ========================================================================
    // Operator shorthands for Int code
    // ========================================================================

    /// `lhs.name(rhs)` on `Int`, returning `Int` (`plus`, `minus`, `times`, ...).
    pub fn op(&self, name: &str, lhs: &'a Expr<'a>, rhs: &'a Expr<'a>) -> &'a Expr<'a> {
        let callee = self.builtin(Type::INT, name, &[Type::INT], Type::INT);
        self.call_on(callee, lhs, &[rhs])
    }

    /// Int comparison intrinsic: `less`, `lessOrEqual`, `greater`, `greaterOrEqual`.
    pub fn cmp(&self, name: &str, lhs: &'a Expr<'a>, rhs: &'a Expr<'a>) -> &'a Expr<'a> {
        let callee = self.intrinsic(name, &[Type::INT, Type::INT], Type::BOOLEAN);
        self.call(callee, &[lhs, rhs])
    }

    /// `lhs == rhs` through the `EQEQ` intrinsic.
    pub fn eq(&self, lhs: &'a Expr<'a>, rhs: &'a Expr<'a>) -> &'a Expr<'a> {
        let callee = self.intrinsic(
            "EQEQ",
            &[Type::NULLABLE_ANY, Type::NULLABLE_ANY],
            Type::BOOLEAN,
        );
        self.call(callee, &[lhs, rhs])
    }

    pub fn not(&self, operand: &'a Expr<'a>) -> &'a Expr<'a> {
        let callee = self.builtin(Type::BOOLEAN, "not", &[], Type::BOOLEAN);
        self.call_on(callee, operand, &[])
    }

    /// `name += rhs` on an Int local, lowered to `name = name.plus(rhs)`.
    pub fn add_assign(&self, owner: FunctionId, name: &str, rhs: &'a Expr<'a>) -> &'a Expr<'a> {
        self.assign(owner, name, self.op("plus", self.var(owner, name), rhs))
    }
}
