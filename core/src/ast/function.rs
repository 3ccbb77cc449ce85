//! Function-like entities and the identities the engine tracks.

use crate::ast::Expr;
use crate::types::Type;
use alloc::string::String;
use core::fmt;

/// Index of a function in its [`Program`](crate::ast::Program).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

/// Identity of a loop node, targeted by `break` and `continue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoopId(pub u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn#{}", self.0)
    }
}

impl fmt::Display for LoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loop#{}", self.0)
    }
}

/// Where a function is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner<'a> {
    /// Top level of a package (`""` for the root package).
    Package(&'a str),
    /// Member of a type. Such functions take a dispatch receiver.
    Class(Type<'a>),
    /// Local function declared inside another function.
    Function(FunctionId),
}

/// A named, typed parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param<'a> {
    pub name: &'a str,
    pub ty: Type<'a>,
}

/// Name under which a dispatch receiver is bound inside the callee.
pub const RECEIVER_NAME: &str = "<this>";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Function<'a> {
    pub id: FunctionId,
    pub name: &'a str,
    pub owner: Owner<'a>,
    /// Dispatch receiver, bound as [`RECEIVER_NAME`] when the body runs.
    pub receiver: Option<Param<'a>>,
    pub params: &'a [Param<'a>],
    pub return_type: Type<'a>,
    /// `None` for builtins and external declarations.
    pub body: Option<&'a Expr<'a>>,
}

impl<'a> Function<'a> {
    /// Receiver type (if any) followed by parameter types.
    pub fn operand_types(&self) -> impl Iterator<Item = Type<'a>> + 'a {
        let params: &'a [Param<'a>] = self.params;
        self.receiver
            .map(|r| r.ty)
            .into_iter()
            .chain(params.iter().map(|p| p.ty))
    }

    pub fn fq_name(&self) -> String {
        match self.owner {
            Owner::Package("") | Owner::Function(_) => String::from(self.name),
            Owner::Package(package) => alloc::format!("{}.{}", package, self.name),
            Owner::Class(ty) => alloc::format!("{}.{}", ty.fq_name(), self.name),
        }
    }
}
