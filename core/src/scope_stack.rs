//! Variable storage for the evaluator.
//!
//! All bindings live in one flat arena. Two index stacks mark where each frame
//! and each activation starts, so pushing and popping either is O(1):
//!
//! ```text
//! bindings:    [a=1, b=2 | x=5 | i=0, j=0 | n=6 ]
//! frames:      [0,         2,    3,         5   ]
//! activations: [0,                          3   ]   (frame indices)
//! ```
//!
//! Lookups only see the current activation: a callee cannot read its caller's
//! locals. Within an activation, names are resolved innermost frame first, so an
//! inner declaration shadows an outer one until its frame is popped.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use thiserror::Error;

#[derive(Debug)]
pub struct ScopeStack<'a, T> {
    bindings: Vec<(&'a str, T)>,
    /// Index into `bindings` where each frame starts.
    frames: Vec<usize>,
    /// Index into `frames` where each activation starts.
    activations: Vec<usize>,
}

impl<'a, T> Default for ScopeStack<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> ScopeStack<'a, T> {
    /// An empty stack with no activation.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            frames: Vec::new(),
            activations: Vec::new(),
        }
    }

    /// Number of live activations.
    pub fn depth(&self) -> usize {
        self.activations.len()
    }

    /// Start a new activation with one empty frame.
    pub fn push_activation(&mut self) {
        self.activations.push(self.frames.len());
        self.push_frame();
    }

    /// Discard the current activation and every frame it opened.
    pub fn pop_activation(&mut self) -> Result<(), PopError> {
        let start = self.activations.pop().ok_or(PopError::NoActivation)?;
        let bindings_start = self
            .frames
            .get(start)
            .copied()
            .unwrap_or(self.bindings.len());
        self.frames.truncate(start);
        self.bindings.truncate(bindings_start);
        Ok(())
    }

    pub fn push_frame(&mut self) {
        self.frames.push(self.bindings.len());
    }

    /// Discard the innermost frame. The first frame of an activation can only be
    /// removed with [`Self::pop_activation`].
    pub fn pop_frame(&mut self) -> Result<(), PopError> {
        let floor = self.activations.last().copied().ok_or(PopError::NoActivation)?;
        if self.frames.len() <= floor + 1 {
            return Err(PopError::ActivationBoundary);
        }
        if let Some(start) = self.frames.pop() {
            self.bindings.truncate(start);
        }
        Ok(())
    }

    /// Introduce `name` in the innermost frame.
    pub fn define(&mut self, name: &'a str, value: T) -> Result<(), BindError> {
        let start = *self.frames.last().ok_or(BindError::NoScope)?;
        if self.bindings[start..].iter().any(|(n, _)| *n == name) {
            return Err(BindError::AlreadyDefined(name.to_string()));
        }
        self.bindings.push((name, value));
        Ok(())
    }

    /// Look up a name, searching frames of the current activation from
    /// innermost to outermost.
    pub fn lookup(&self, name: &str) -> Option<&T> {
        let start = self.activation_start()?;
        self.bindings[start..]
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    /// Overwrite the innermost visible binding of `name`.
    pub fn assign(&mut self, name: &str, value: T) -> Result<(), BindError> {
        let start = self.activation_start().ok_or(BindError::NoScope)?;
        match self.bindings[start..]
            .iter_mut()
            .rev()
            .find(|(n, _)| *n == name)
        {
            Some(slot) => {
                slot.1 = value;
                Ok(())
            }
            None => Err(BindError::Undefined(name.to_string())),
        }
    }

    /// First binding index of the current activation.
    fn activation_start(&self) -> Option<usize> {
        let frame = *self.activations.last()?;
        self.frames.get(frame).copied()
    }
}

/// Error when defining or writing a variable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("no scope to bind in")]
    NoScope,
    #[error("variable '{0}' is already defined in the current scope")]
    AlreadyDefined(String),
    #[error("variable '{0}' is not defined")]
    Undefined(String),
}

/// Error when trying to pop a frame or an activation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PopError {
    #[error("no activation to pop")]
    NoActivation,
    #[error("cannot pop the outermost frame of an activation")]
    ActivationBoundary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_define_and_lookup() {
        let mut stack = ScopeStack::new();
        stack.push_activation();
        stack.define("a", 1).unwrap();
        stack.define("b", 2).unwrap();

        assert_eq!(stack.lookup("a"), Some(&1));
        assert_eq!(stack.lookup("b"), Some(&2));
        assert_eq!(stack.lookup("c"), None);
    }

    #[test]
    fn test_shadowing_in_inner_frame() {
        let mut stack = ScopeStack::new();
        stack.push_activation();
        stack.define("x", 5).unwrap();

        stack.push_frame();
        stack.define("x", 6).unwrap();
        assert_eq!(stack.lookup("x"), Some(&6));

        stack.pop_frame().unwrap();
        assert_eq!(stack.lookup("x"), Some(&5));
    }

    #[test]
    fn test_duplicate_in_same_frame() {
        let mut stack = ScopeStack::new();
        stack.push_activation();
        stack.define("a", 1).unwrap();

        assert_eq!(
            stack.define("a", 2),
            Err(BindError::AlreadyDefined("a".to_string()))
        );
    }

    #[test]
    fn test_assign_updates_innermost_binding() {
        let mut stack = ScopeStack::new();
        stack.push_activation();
        stack.define("i", 0).unwrap();
        stack.push_frame();
        stack.assign("i", 3).unwrap();
        stack.pop_frame().unwrap();

        assert_eq!(stack.lookup("i"), Some(&3));
        assert_eq!(
            stack.assign("missing", 1),
            Err(BindError::Undefined("missing".to_string()))
        );
    }

    #[test]
    fn test_activations_are_isolated() {
        let mut stack = ScopeStack::new();
        stack.push_activation();
        stack.define("n", 6).unwrap();

        stack.push_activation();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.lookup("n"), None);
        stack.define("n", 5).unwrap();
        stack.push_frame();
        stack.define("tmp", 1).unwrap();

        // Popping the activation drops its inner frames too.
        stack.pop_activation().unwrap();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.lookup("n"), Some(&6));
        assert_eq!(stack.lookup("tmp"), None);
    }

    #[test]
    fn test_pop_errors() {
        let mut stack: ScopeStack<'_, i32> = ScopeStack::new();
        assert_eq!(stack.pop_activation(), Err(PopError::NoActivation));
        assert_eq!(stack.define("a", 1), Err(BindError::NoScope));

        stack.push_activation();
        assert_eq!(stack.pop_frame(), Err(PopError::ActivationBoundary));
        assert_eq!(stack.pop_activation(), Ok(()));
    }
}
