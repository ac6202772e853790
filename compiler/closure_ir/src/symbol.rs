//! Resolved declaration identity.

use std::fmt;

/// Identity of a resolved declaration: a method, constructor, field, static
/// global, or an outer local variable that a closure captures.
///
/// Assigned by the resolver. Two references denote the same declaration if
/// and only if their `SymbolId`s are equal; there is no renaming tolerance.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        SymbolId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}
