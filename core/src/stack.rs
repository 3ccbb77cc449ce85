//! Native stack growth for the recursive passes.
//!
//! The checker and evaluator recurse once per tree level and once per marker
//! call. The call-depth ceiling bounds the second, but a generous ceiling can
//! still exceed the host thread's stack, so every recursive step runs through
//! [`ensure_sufficient_stack`].

/// Grow the stack when less than this much remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
