//! Step and call-depth ceilings.

use crate::evaluator::ResourceExceeded;

/// Enforces the resource limits of one top-level evaluation.
///
/// A step is one loop iteration. Straight-line code and recursion are not
/// charged steps; recursion is bounded by the call depth instead.
#[derive(Debug, Clone)]
pub struct Governor {
    step_limit: u64,
    stack_limit: usize,
    steps: u64,
}

impl Governor {
    pub fn new(step_limit: u64, stack_limit: usize) -> Self {
        Self {
            step_limit,
            stack_limit,
            steps: 0,
        }
    }

    /// Record a completed loop iteration.
    pub fn charge_step(&mut self) -> Result<(), ResourceExceeded> {
        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(ResourceExceeded::StepLimit {
                limit: self.step_limit,
            });
        }
        Ok(())
    }

    /// Check that a call made at `depth` live activations may proceed.
    pub fn enter_call(&self, depth: usize) -> Result<(), ResourceExceeded> {
        if depth >= self.stack_limit {
            return Err(ResourceExceeded::StackLimit {
                limit: self.stack_limit,
            });
        }
        Ok(())
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
