//! Closure-body node kinds.
//!
//! [`NodeKind`] is a closed set: every kind fixes its shape. Children are
//! listed by [`NodeArena::children`](crate::NodeArena::children) in a fixed
//! order: the fixed child positions of the kind first (optional positions
//! hold [`NodeId::INVALID`] when absent), then the kind's variable-length
//! list, if it has one.
//!
//! Everything that is not a child is *payload*: literal values, slots,
//! resolved symbols, operators, and type operands. Payload is compared and
//! hashed by identity, as is the node type; children are compared and
//! hashed structurally.

use crate::{BinaryOp, LambdaId, Name, NodeId, NodeRange, SymbolId, TypeId, UnaryOp};

/// Literal value. The declared type lives on the node, not here, so `1`
/// typed `int` and `1` typed `long` share a `Literal` but not a node type.
///
/// Floating-point values are stored as bits for `Eq`/`Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Int(i64),
    Float(u64),
    Bool(bool),
    Char(char),
    Str(Name),
    Null,
}

impl Literal {
    /// Build a float literal from its value.
    #[inline]
    pub fn float(value: f64) -> Self {
        Literal::Float(value.to_bits())
    }
}

/// Resolved variable reference.
///
/// Parameters, captures and locals are positional: the resolver numbers
/// them per lambda, so renaming a parameter never changes its slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    /// Declared parameter of the enclosing lambda, by position.
    Param(u32),
    /// Captured outer variable, by position in the lambda's capture list
    /// (first-use order).
    Capture(u32),
    /// Local variable declared in the body, by declaration order.
    Local(u32),
    /// Any other resolved symbol (static field, global). Never renamed.
    Symbol(SymbolId),
}

/// Discriminant of a [`Slot`], used for hashing.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum SlotKind {
    Param = 0,
    Capture = 1,
    Local = 2,
    Symbol = 3,
}

impl Slot {
    #[inline]
    pub const fn kind(self) -> SlotKind {
        match self {
            Slot::Param(_) => SlotKind::Param,
            Slot::Capture(_) => SlotKind::Capture,
            Slot::Local(_) => SlotKind::Local,
            Slot::Symbol(_) => SlotKind::Symbol,
        }
    }
}

/// Closure-body expression and statement kinds.
///
/// Child fields are `NodeId`/`NodeRange` into the owning arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    /// Literal value; its declared type is the node type.
    Literal(Literal),
    /// Variable reference.
    Var(Slot),
    /// Reference to the enclosing instance.
    This,
    /// Member access `receiver.field`.
    Field { receiver: NodeId, field: SymbolId },
    /// Array access `receiver[index]`.
    Index { receiver: NodeId, index: NodeId },
    /// Method invocation. `receiver` is `INVALID` for unqualified calls.
    Invoke {
        receiver: NodeId,
        method: SymbolId,
        args: NodeRange,
    },
    /// Instance creation via a resolved constructor.
    New { ctor: SymbolId, args: NodeRange },
    /// Nested closure. `captures` are the argument expressions, evaluated
    /// in the enclosing body, that feed the nested lambda's capture slots.
    Closure { lambda: LambdaId, captures: NodeRange },
    /// Type cast; the target type is the node type.
    Cast { operand: NodeId },
    /// Type test.
    InstanceOf { operand: NodeId, target: TypeId },
    Unary { op: UnaryOp, operand: NodeId },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    /// Assignment; `op` is set for compound assignment (`+=`, ...).
    Assign {
        op: Option<BinaryOp>,
        target: NodeId,
        value: NodeId,
    },
    /// Ternary `cond ? then : else`.
    Conditional {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    Block(NodeRange),
    /// Local declaration of `Slot::Local(slot)`; `init` may be `INVALID`.
    Let { slot: u32, ty: TypeId, init: NodeId },
    /// Statement `if`; `else_branch` may be `INVALID`.
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    While { cond: NodeId, body: NodeId },
    /// `value` may be `INVALID` for a bare `return`.
    Return(NodeId),
    Throw(NodeId),
}

/// Payload-free discriminant of a [`NodeKind`].
///
/// The first thing compared and the first thing hashed for every node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum NodeTag {
    Literal = 0,
    Var = 1,
    This = 2,
    Field = 3,
    Index = 4,
    Invoke = 5,
    New = 6,
    Closure = 7,
    Cast = 8,
    InstanceOf = 9,
    Unary = 10,
    Binary = 11,
    Assign = 12,
    Conditional = 13,
    Block = 14,
    Let = 15,
    If = 16,
    While = 17,
    Return = 18,
    Throw = 19,
}

impl NodeKind {
    pub const fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Literal(_) => NodeTag::Literal,
            NodeKind::Var(_) => NodeTag::Var,
            NodeKind::This => NodeTag::This,
            NodeKind::Field { .. } => NodeTag::Field,
            NodeKind::Index { .. } => NodeTag::Index,
            NodeKind::Invoke { .. } => NodeTag::Invoke,
            NodeKind::New { .. } => NodeTag::New,
            NodeKind::Closure { .. } => NodeTag::Closure,
            NodeKind::Cast { .. } => NodeTag::Cast,
            NodeKind::InstanceOf { .. } => NodeTag::InstanceOf,
            NodeKind::Unary { .. } => NodeTag::Unary,
            NodeKind::Binary { .. } => NodeTag::Binary,
            NodeKind::Assign { .. } => NodeTag::Assign,
            NodeKind::Conditional { .. } => NodeTag::Conditional,
            NodeKind::Block(_) => NodeTag::Block,
            NodeKind::Let { .. } => NodeTag::Let,
            NodeKind::If { .. } => NodeTag::If,
            NodeKind::While { .. } => NodeTag::While,
            NodeKind::Return(_) => NodeTag::Return,
            NodeKind::Throw(_) => NodeTag::Throw,
        }
    }

    /// Whether the child at `position` (in `children` order) may be
    /// `NodeId::INVALID` for this kind.
    ///
    /// Every other position is required; an absent required child is
    /// malformed input.
    pub const fn child_may_be_absent(&self, position: usize) -> bool {
        matches!(
            (self, position),
            (NodeKind::Invoke { .. } | NodeKind::Let { .. } | NodeKind::Return(_), 0)
                | (NodeKind::If { .. }, 2)
        )
    }
}
