//! Node arena for closure bodies.
//!
//! [`NodeArena`] uses struct-of-arrays layout (parallel `kinds`, `types`,
//! `spans` arrays indexed by [`NodeId`]) and also owns the [`Lambda`]s whose
//! bodies live in it. One arena holds one compilation unit.
//!
//! # Index Spaces
//!
//! - `kinds`/`types`/`spans`: parallel arrays indexed by [`NodeId`]
//! - `node_lists`: flat `Vec<NodeId>` indexed by [`NodeRange`]
//! - `lambdas`: indexed by [`LambdaId`]

use smallvec::SmallVec;

use crate::{Lambda, LambdaId, NodeId, NodeKind, NodeRange, Span, TypeId};

/// Children of one node, in canonical order.
pub type Children = SmallVec<[NodeId; 4]>;

/// Convert an arena length to a `u32` index.
///
/// # Panics
/// Panics if the arena outgrew the `u32` index space.
#[inline]
pub(crate) fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}

/// Convert a list length to a `u16` range length.
///
/// # Panics
/// Panics if the list is longer than `u16::MAX` entries.
#[inline]
pub(crate) fn to_u16(len: usize, what: &str) -> u16 {
    u16::try_from(len).unwrap_or_else(|_| panic!("{what} too long: {len} exceeds u16::MAX"))
}

/// Arena of closure-body nodes and the lambdas that own them.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    /// Node kinds (parallel with types and spans).
    kinds: Vec<NodeKind>,
    /// Resolved node types (parallel with kinds).
    types: Vec<TypeId>,
    /// Source spans for error reporting (parallel with kinds).
    spans: Vec<Span>,
    /// Flattened node id lists for ranges (args, stmts, capture args).
    node_lists: Vec<NodeId>,
    /// Registered lambdas, in discovery order.
    lambdas: Vec<Lambda>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, returning its ID.
    pub fn push(&mut self, kind: NodeKind, ty: TypeId) -> NodeId {
        self.push_spanned(kind, ty, Span::DUMMY)
    }

    /// Allocate a node with a source span.
    pub fn push_spanned(&mut self, kind: NodeKind, ty: TypeId, span: Span) -> NodeId {
        let id = NodeId::new(to_u32(self.kinds.len(), "nodes"));
        self.kinds.push(kind);
        self.types.push(ty);
        self.spans.push(span);
        id
    }

    /// Get the node kind.
    ///
    /// Panics if `id` is not a node of this arena; use [`try_kind`](Self::try_kind)
    /// on unvalidated input.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.kinds[id.index()]
    }

    /// Get the node kind, or `None` if `id` is out of bounds or `INVALID`.
    #[inline]
    pub fn try_kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.kinds.get(id.index())
    }

    /// Get the resolved node type.
    #[inline]
    pub fn ty(&self, id: NodeId) -> TypeId {
        self.types[id.index()]
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index()]
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Allocate a contiguous range of node IDs.
    pub fn push_list(&mut self, ids: &[NodeId]) -> NodeRange {
        if ids.is_empty() {
            return NodeRange::EMPTY;
        }
        let start = to_u32(self.node_lists.len(), "node list entries");
        self.node_lists.extend_from_slice(ids);
        NodeRange::new(start, to_u16(ids.len(), "node list"))
    }

    /// Get node IDs from a range, or `None` if the range is out of bounds.
    pub fn try_list(&self, range: NodeRange) -> Option<&[NodeId]> {
        if range.is_empty() {
            return Some(&[]);
        }
        let start = range.start as usize;
        self.node_lists.get(start..start + range.len())
    }

    /// Get node IDs from a range.
    pub fn list(&self, range: NodeRange) -> &[NodeId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.node_lists[start..start + range.len()]
    }

    /// Children of a node kind in canonical order: fixed positions first,
    /// then the variable-length list.
    ///
    /// Returns `None` if the kind's list range is out of bounds.
    pub fn try_children(&self, kind: &NodeKind) -> Option<Children> {
        let mut out = Children::new();
        match *kind {
            NodeKind::Literal(_) | NodeKind::Var(_) | NodeKind::This => {}
            NodeKind::Field { receiver, .. } => out.push(receiver),
            NodeKind::Cast { operand }
            | NodeKind::InstanceOf { operand, .. }
            | NodeKind::Unary { operand, .. } => out.push(operand),
            NodeKind::Return(child) | NodeKind::Throw(child) => out.push(child),
            NodeKind::Let { init, .. } => out.push(init),
            NodeKind::Index { receiver, index } => {
                out.push(receiver);
                out.push(index);
            }
            NodeKind::Binary { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            NodeKind::Assign { target, value, .. } => {
                out.push(target);
                out.push(value);
            }
            NodeKind::While { cond, body } => {
                out.push(cond);
                out.push(body);
            }
            NodeKind::Conditional {
                cond,
                then_branch,
                else_branch,
            }
            | NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push(cond);
                out.push(then_branch);
                out.push(else_branch);
            }
            NodeKind::Invoke { receiver, args, .. } => {
                out.push(receiver);
                out.extend_from_slice(self.try_list(args)?);
            }
            NodeKind::New { args, .. } => out.extend_from_slice(self.try_list(args)?),
            NodeKind::Closure { captures, .. } => {
                out.extend_from_slice(self.try_list(captures)?);
            }
            NodeKind::Block(stmts) => out.extend_from_slice(self.try_list(stmts)?),
        }
        Some(out)
    }

    /// Children of a node in canonical order.
    pub fn children(&self, id: NodeId) -> Children {
        self.try_children(self.kind(id))
            .unwrap_or_else(|| panic!("{id:?} has an out-of-bounds child list"))
    }

    /// Register a lambda whose body lives in this arena.
    pub fn push_lambda(&mut self, lambda: Lambda) -> LambdaId {
        let id = LambdaId::new(to_u32(self.lambdas.len(), "lambdas"));
        self.lambdas.push(lambda);
        id
    }

    #[inline]
    pub fn lambda(&self, id: LambdaId) -> &Lambda {
        &self.lambdas[id.index()]
    }

    #[inline]
    pub fn try_lambda(&self, id: LambdaId) -> Option<&Lambda> {
        self.lambdas.get(id.index())
    }

    pub fn lambda_count(&self) -> usize {
        self.lambdas.len()
    }

    /// All lambda ids, in registration order.
    pub fn lambda_ids(&self) -> impl ExactSizeIterator<Item = LambdaId> {
        (0..to_u32(self.lambdas.len(), "lambdas")).map(LambdaId::new)
    }
}
