//! Interned type identifier.
//!
//! Types are interned by the external type checker; two `TypeId`s are the
//! same type if and only if they are equal. Functional-interface target types
//! and every declared parameter, capture and local type are `TypeId`s.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Interned type identifier.
///
/// # Pre-interned Types
/// Primitive and well-known reference types occupy fixed indices below
/// [`TypeId::FIRST_COMPOUND`]. Everything else (classes, interfaces,
/// parameterized types) is allocated by the type checker from
/// `FIRST_COMPOUND` upward.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const INT: TypeId = TypeId(0);
    pub const LONG: TypeId = TypeId(1);
    pub const FLOAT: TypeId = TypeId(2);
    pub const DOUBLE: TypeId = TypeId(3);
    pub const BOOL: TypeId = TypeId(4);
    pub const CHAR: TypeId = TypeId(5);
    pub const BYTE: TypeId = TypeId(6);
    pub const SHORT: TypeId = TypeId(7);
    pub const VOID: TypeId = TypeId(8);
    pub const STRING: TypeId = TypeId(9);
    pub const OBJECT: TypeId = TypeId(10);
    /// Type of the `null` literal.
    pub const NULL: TypeId = TypeId(11);

    /// First ID for types allocated by the type checker.
    pub const FIRST_COMPOUND: u32 = 12;

    /// Create a `TypeId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        TypeId(index)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a pre-interned type.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_COMPOUND
    }
}

impl Hash for TypeId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::INT => write!(f, "TypeId::INT"),
            Self::LONG => write!(f, "TypeId::LONG"),
            Self::FLOAT => write!(f, "TypeId::FLOAT"),
            Self::DOUBLE => write!(f, "TypeId::DOUBLE"),
            Self::BOOL => write!(f, "TypeId::BOOL"),
            Self::CHAR => write!(f, "TypeId::CHAR"),
            Self::BYTE => write!(f, "TypeId::BYTE"),
            Self::SHORT => write!(f, "TypeId::SHORT"),
            Self::VOID => write!(f, "TypeId::VOID"),
            Self::STRING => write!(f, "TypeId::STRING"),
            Self::OBJECT => write!(f, "TypeId::OBJECT"),
            Self::NULL => write!(f, "TypeId::NULL"),
            _ => write!(f, "TypeId({})", self.0),
        }
    }
}

impl Default for TypeId {
    fn default() -> Self {
        Self::OBJECT
    }
}
