//! Lambda (closure) descriptors.

use smallvec::SmallVec;

use crate::{Name, NodeId, Span, SymbolId, TypeId};

/// Ordered type list (parameter types, capture types).
pub type TypeList = SmallVec<[TypeId; 4]>;

/// Ordered capture list, in first-use order.
pub type CaptureList = SmallVec<[Capture; 2]>;

/// One captured outer variable.
///
/// The body refers to it only as `Slot::Capture(index)`; `var` is kept so
/// the emitter can pass the right value at the call site, and for the
/// identity capture policy.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Capture {
    pub var: SymbolId,
    pub ty: TypeId,
}

impl Capture {
    #[inline]
    pub const fn new(var: SymbolId, ty: TypeId) -> Self {
        Self { var, ty }
    }
}

/// A closure as produced by the resolver.
///
/// `params` and `captures` are positional: `Slot::Param(i)` in the body
/// refers to `params[i]`, `Slot::Capture(i)` to `captures[i]`, and
/// `Slot::Local(i)` to the `i`-th local declared in the body
/// (`i < local_count`).
#[derive(Clone, Debug)]
pub struct Lambda {
    /// Name of the enclosing method; the generated implementation method
    /// is named after it.
    pub owner: Name,
    /// Target functional-interface type.
    pub target: TypeId,
    /// Declared parameter types.
    pub params: TypeList,
    /// Captured variables.
    pub captures: CaptureList,
    /// Number of locals declared in the body.
    pub local_count: u32,
    pub body: NodeId,
    pub span: Span,
}

impl Lambda {
    /// Create a lambda with no captures and no locals.
    pub fn new(owner: Name, target: TypeId, params: &[TypeId], body: NodeId) -> Self {
        Self {
            owner,
            target,
            params: SmallVec::from_slice(params),
            captures: SmallVec::new(),
            local_count: 0,
            body,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_captures(mut self, captures: &[Capture]) -> Self {
        self.captures = SmallVec::from_slice(captures);
        self
    }

    #[must_use]
    pub fn with_locals(mut self, local_count: u32) -> Self {
        self.local_count = local_count;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Capture types in capture-index order.
    pub fn capture_types(&self) -> impl ExactSizeIterator<Item = TypeId> + '_ {
        self.captures.iter().map(|c| c.ty)
    }
}
