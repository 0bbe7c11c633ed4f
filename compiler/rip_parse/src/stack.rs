//! Stack growth for deeply nested input.
//!
//! Every recursive production funnels through [`ensure_sufficient_stack`],
//! so `((((...))))` or a long `if`/`elsif` chain grows the stack instead of
//! overflowing it. On `wasm32` the closure is called directly.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const GROWTH: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<T>(f: impl FnOnce() -> T) -> T {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<T>(f: impl FnOnce() -> T) -> T {
    f()
}
