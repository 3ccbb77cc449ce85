//! The compilation unit handed to the engine.

use crate::ast::{Expr, Function, FunctionId};
use alloc::vec::Vec;

/// A table of functions indexed by [`FunctionId`].
///
/// Calls refer to their callee by id, which lets recursive and mutually
/// recursive functions reference each other without cycles in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Program<'a> {
    functions: Vec<Function<'a>>,
}

impl<'a> Program<'a> {
    /// Build a program from functions whose ids are their positions.
    pub(crate) fn from_functions(functions: Vec<Function<'a>>) -> Self {
        debug_assert!(
            functions
                .iter()
                .enumerate()
                .all(|(i, f)| f.id.0 as usize == i),
            "function ids must match their positions"
        );
        Self { functions }
    }

    pub fn function(&self, id: FunctionId) -> Option<&Function<'a>> {
        self.functions.get(id.0 as usize)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function<'a>> {
        self.functions.iter()
    }

    /// First function with the given simple name.
    pub fn find(&self, name: &str) -> Option<&Function<'a>> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Replace function bodies in place.
    pub(crate) fn replace_bodies(
        &mut self,
        bodies: impl IntoIterator<Item = (FunctionId, &'a Expr<'a>)>,
    ) {
        for (id, body) in bodies {
            if let Some(function) = self.functions.get_mut(id.0 as usize) {
                function.body = Some(body);
            }
        }
    }
}
