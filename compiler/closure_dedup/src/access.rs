//! Validated access to one lambda's body.
//!
//! The hasher and the differ never index the arena directly: every node,
//! child list and slot goes through a [`BodyAccess`], which turns malformed
//! input into a [`DedupError`] naming the lambda and node instead of a panic.

use closure_ir::{Children, Lambda, LambdaId, NodeArena, NodeId, NodeKind, Slot};

use crate::error::{DedupError, MalformedReason};

/// Read-only, validating view of a lambda and the arena its body lives in.
#[derive(Copy, Clone)]
pub(crate) struct BodyAccess<'a> {
    pub arena: &'a NodeArena,
    pub id: LambdaId,
    pub lambda: &'a Lambda,
}

impl<'a> BodyAccess<'a> {
    pub fn new(arena: &'a NodeArena, id: LambdaId) -> Result<Self, DedupError> {
        let lambda = arena
            .try_lambda(id)
            .ok_or(DedupError::UnknownLambda { lambda: id })?;
        Ok(Self { arena, id, lambda })
    }

    fn malformed(&self, node: NodeId, reason: MalformedReason) -> DedupError {
        DedupError::MalformedNode {
            lambda: self.id,
            node,
            reason,
        }
    }

    /// The kind of a present node.
    pub fn node(&self, id: NodeId) -> Result<&'a NodeKind, DedupError> {
        self.arena
            .try_kind(id)
            .ok_or_else(|| self.malformed(id, MalformedReason::OutOfBounds))
    }

    /// Children of `id` in canonical order, with every absent child checked
    /// against the kind's optional positions.
    pub fn children(&self, id: NodeId, kind: &NodeKind) -> Result<Children, DedupError> {
        let children = self
            .arena
            .try_children(kind)
            .ok_or_else(|| self.malformed(id, MalformedReason::ListOutOfBounds))?;
        for (position, child) in children.iter().enumerate() {
            if !child.is_valid() && !kind.child_may_be_absent(position) {
                return Err(self.malformed(id, MalformedReason::MissingChild { position }));
            }
        }
        Ok(children)
    }

    /// Check a slot against the lambda's declared parameter, capture and
    /// local counts.
    pub fn check_slot(&self, node: NodeId, slot: Slot) -> Result<(), DedupError> {
        let (index, declared) = match slot {
            Slot::Param(index) => (index, self.lambda.params.len()),
            Slot::Capture(index) => (index, self.lambda.captures.len()),
            Slot::Local(index) => (index, self.lambda.local_count as usize),
            Slot::Symbol(_) => return Ok(()),
        };
        if (index as usize) < declared {
            Ok(())
        } else {
            Err(DedupError::SlotOutOfRange {
                lambda: self.id,
                node,
                slot,
                declared,
            })
        }
    }

    /// Check the local slot a `Let` declares.
    pub fn check_local_decl(&self, node: NodeId, slot: u32) -> Result<(), DedupError> {
        if slot < self.lambda.local_count {
            Ok(())
        } else {
            Err(self.malformed(node, MalformedReason::LocalOutOfRange { slot }))
        }
    }

    /// Access to a nested lambda's body, attributed to that lambda.
    pub fn nested(&self, id: LambdaId) -> Result<BodyAccess<'a>, DedupError> {
        BodyAccess::new(self.arena, id)
    }
}
