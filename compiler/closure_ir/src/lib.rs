//! Closure IR - resolved closure-body trees.
//!
//! This crate contains the data model consumed by closure deduplication:
//! - Names for interned identifiers, `TypeId` for interned types,
//!   `SymbolId` for resolved declarations
//! - `NodeKind`, the closed set of expression/statement shapes a closure
//!   body can contain
//! - `Slot`, the positional encoding of variable references
//! - `Lambda`, a closure with its target type, parameter/capture type lists
//!   and body
//! - `NodeArena`, the flattened arena that owns nodes and lambdas of one
//!   compilation unit
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32), Types → TypeId(u32),
//!   declarations → SymbolId(u32)
//! - **Flatten Everything**: No Box<Node>, use NodeId(u32) indices
//! - **Positions, not names**: parameters, captures and locals are referenced
//!   by their index, so two bodies that differ only in variable names are
//!   already identical at the IR level
//!
//! Nodes are immutable once pushed. The tree-building collaborator (the
//! resolver) is responsible for producing well-formed input; consumers
//! validate it while walking.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod build;
mod ids;
mod interner;
mod lambda;
mod name;
mod node;
mod operators;
mod span;
mod symbol;
mod type_id;

pub use arena::{Children, NodeArena};
pub use build::TreeBuilder;
pub use ids::{LambdaId, NodeId, NodeRange};
pub use interner::{InternError, StringInterner};
pub use lambda::{Capture, CaptureList, Lambda, TypeList};
pub use name::Name;
pub use node::{Literal, NodeKind, NodeTag, Slot, SlotKind};
pub use operators::{BinaryOp, UnaryOp};
pub use span::Span;
pub use symbol::SymbolId;
pub use type_id::TypeId;
