//! Deduplication errors.
//!
//! Every error is a contract violation by the tree-building collaborator or a
//! defect in this crate; none is retryable. Each names the lambda (and, where
//! there is one, the node) that triggered it.

use std::fmt;

use closure_ir::{LambdaId, NodeId, Slot};
use closure_stack::DepthExceeded;

/// Why a node failed validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MalformedReason {
    /// The node id is not an index into the arena.
    OutOfBounds,
    /// A required child position holds `NodeId::INVALID`.
    MissingChild { position: usize },
    /// The node's child list range is outside the arena's list storage.
    ListOutOfBounds,
    /// A `Let` declares a local slot beyond the lambda's local count.
    LocalOutOfRange { slot: u32 },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::OutOfBounds => write!(f, "node id out of bounds"),
            MalformedReason::MissingChild { position } => {
                write!(f, "required child {position} is absent")
            }
            MalformedReason::ListOutOfBounds => write!(f, "child list out of bounds"),
            MalformedReason::LocalOutOfRange { slot } => {
                write!(f, "declares local {slot} beyond the lambda's local count")
            }
        }
    }
}

/// Structured failure of a deduplication operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DedupError {
    #[error("lambda {lambda}: malformed node {node:?}: {reason}")]
    MalformedNode {
        lambda: LambdaId,
        node: NodeId,
        reason: MalformedReason,
    },

    #[error("lambda {lambda} is not registered in this arena")]
    UnknownLambda { lambda: LambdaId },

    #[error("lambda {lambda}: {slot:?} at node {node:?} is out of range ({declared} declared)")]
    SlotOutOfRange {
        lambda: LambdaId,
        node: NodeId,
        slot: Slot,
        declared: usize,
    },

    #[error("lambda {lambda}: {source}")]
    DepthExceeded {
        lambda: LambdaId,
        #[source]
        source: DepthExceeded,
    },

    #[error("lambda {lambda} submitted after the registry was finalized")]
    SubmitAfterFinalize { lambda: LambdaId },

    #[error("registry already finalized")]
    AlreadyFinalized,
}

impl DedupError {
    /// The lambda the error is attributed to, if any.
    pub fn lambda(&self) -> Option<LambdaId> {
        match self {
            DedupError::MalformedNode { lambda, .. }
            | DedupError::UnknownLambda { lambda }
            | DedupError::SlotOutOfRange { lambda, .. }
            | DedupError::DepthExceeded { lambda, .. }
            | DedupError::SubmitAfterFinalize { lambda } => Some(*lambda),
            DedupError::AlreadyFinalized => None,
        }
    }
}
