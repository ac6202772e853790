//! Stack safety for deep closure-body walks.
//!
//! Hashing and comparing closure bodies recurse once per tree level. Resolved
//! trees can be pathologically deep (long `?:` chains, generated string
//! concatenations), so every recursive step:
//!
//! 1. charges one level against a [`DepthBudget`], which turns runaway depth
//!    into a reportable [`DepthExceeded`] error, and
//! 2. runs inside [`ensure_sufficient_stack`], which grows the native stack
//!    on demand so that any depth the budget allows cannot overflow.
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: no-op passthrough; the budget is the only guard.

use std::fmt;

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// A walk went deeper than its budget allows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthExceeded {
    pub limit: usize,
}

impl fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree nesting exceeds the depth limit of {}", self.limit)
    }
}

impl std::error::Error for DepthExceeded {}

/// Recursion depth accounting for one walk.
///
/// Callers pair every successful [`enter`](Self::enter) with one
/// [`exit`](Self::exit), usually around a recursive call.
#[derive(Clone, Debug)]
pub struct DepthBudget {
    depth: usize,
    limit: usize,
}

impl DepthBudget {
    pub const fn new(limit: usize) -> Self {
        Self { depth: 0, limit }
    }

    /// Charge one level.
    #[inline]
    pub fn enter(&mut self) -> Result<(), DepthExceeded> {
        if self.depth >= self.limit {
            return Err(DepthExceeded { limit: self.limit });
        }
        self.depth += 1;
        Ok(())
    }

    /// Release one level.
    #[inline]
    pub fn exit(&mut self) {
        debug_assert!(self.depth > 0, "DepthBudget::exit without matching enter");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}
