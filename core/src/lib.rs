//! Compile-time evaluation of marker function calls.
//!
//! A call to a function whose name starts with the marker (`eval` by default)
//! is replaced by the literal it returns, provided everything it reaches uses
//! only side-effect free constructs on primitive and string values and it
//! finishes within the configured step and call depth limits.
//!
//! The pieces, in dependency order:
//!
//! - [`ast`]: arena-allocated trees, built with [`ast::ProgramBuilder`].
//! - [`builtins`]: primitive and string operations with JVM semantics.
//! - [`scope_stack`]: variable storage across nested scopes and activations.
//! - [`checker`]: decides whether a call may be evaluated.
//! - [`evaluator`]: runs an accepted call under resource limits.
//! - [`api`]: pass configuration and the folding pass.

extern crate alloc;

pub mod api;
pub mod ast;
pub mod builtins;
pub mod checker;
pub mod evaluator;
pub mod fixtures;
pub mod scope_stack;
pub mod stack;
pub mod types;
pub mod values;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level.
    /// Call this at the start of tests where you want to see logging output.
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
