//! Alpha-invariant hashing of lambda bodies.
//!
//! Produces name-free, allocation-order-free fingerprints of closure bodies.
//! Two lambdas the differ reports equivalent always hash equal, under either
//! capture policy.
//!
//! # Strategy
//!
//! Recursive depth-first traversal. For each node:
//! 1. Hash the node tag
//! 2. Hash the payload (literal value, slot kind and index, symbol,
//!    operator, type operand)
//! 3. Hash the node type
//! 4. Hash the child count, then recurse into each child in order
//!
//! `NodeId` values are never hashed: they are arena indices. An absent
//! optional child hashes as a fixed sentinel. A nested closure contributes
//! its lambda's signature and body hash, never its `LambdaId`.
//!
//! Variable references hash as `(slot kind, index)`. For captures that
//! leaves out the captured variable, which keeps the hash compatible with
//! the identity capture policy: that policy only refines equality.

use std::hash::{Hash, Hasher};
use std::mem;

use closure_ir::{LambdaId, NodeArena, NodeId, NodeKind, Slot};
use closure_stack::{ensure_sufficient_stack, DepthBudget};
use rustc_hash::FxHasher;

use crate::access::BodyAccess;
use crate::error::DedupError;

/// Hash of an absent optional child.
const ABSENT: u32 = u32::MAX;

/// Hasher over the lambdas of one arena.
///
/// Hashing also validates the body: node bounds, required children, slot
/// ranges and local declarations all surface as [`DedupError`]s.
pub struct TreeHasher<'a> {
    arena: &'a NodeArena,
    budget: DepthBudget,
}

impl<'a> TreeHasher<'a> {
    pub fn new(arena: &'a NodeArena, max_depth: usize) -> Self {
        Self {
            arena,
            budget: DepthBudget::new(max_depth),
        }
    }

    /// Full lambda fingerprint: signature, then body.
    pub fn hash_lambda(&mut self, id: LambdaId) -> Result<u64, DedupError> {
        let access = BodyAccess::new(self.arena, id)?;
        let mut state = FxHasher::default();
        hash_signature_into(&access, &mut state);
        self.hash_node(access, access.lambda.body, &mut state)?;
        Ok(state.finish())
    }

    /// Hash of the target type, parameter types and capture types.
    pub fn hash_signature(&self, id: LambdaId) -> Result<u64, DedupError> {
        let access = BodyAccess::new(self.arena, id)?;
        let mut state = FxHasher::default();
        hash_signature_into(&access, &mut state);
        Ok(state.finish())
    }

    /// Hash of the body alone.
    pub fn hash_body(&mut self, id: LambdaId) -> Result<u64, DedupError> {
        let access = BodyAccess::new(self.arena, id)?;
        let mut state = FxHasher::default();
        self.hash_node(access, access.lambda.body, &mut state)?;
        Ok(state.finish())
    }

    fn hash_node(
        &mut self,
        access: BodyAccess<'a>,
        id: NodeId,
        state: &mut FxHasher,
    ) -> Result<(), DedupError> {
        if !id.is_valid() {
            ABSENT.hash(state);
            return Ok(());
        }
        self.budget
            .enter()
            .map_err(|source| DedupError::DepthExceeded {
                lambda: access.id,
                source,
            })?;
        let result = ensure_sufficient_stack(|| self.hash_present(access, id, state));
        self.budget.exit();
        result
    }

    fn hash_present(
        &mut self,
        access: BodyAccess<'a>,
        id: NodeId,
        state: &mut FxHasher,
    ) -> Result<(), DedupError> {
        let kind = access.node(id)?;
        let children = access.children(id, kind)?;

        (kind.tag() as u8).hash(state);
        self.hash_payload(access, id, kind, state)?;
        access.arena.ty(id).raw().hash(state);

        children.len().hash(state);
        for child in children {
            self.hash_node(access, child, state)?;
        }
        Ok(())
    }

    /// Hash everything about a node that is not a child.
    fn hash_payload(
        &mut self,
        access: BodyAccess<'a>,
        id: NodeId,
        kind: &NodeKind,
        state: &mut FxHasher,
    ) -> Result<(), DedupError> {
        match *kind {
            NodeKind::Literal(value) => value.hash(state),
            NodeKind::Var(slot) => {
                access.check_slot(id, slot)?;
                (slot.kind() as u8).hash(state);
                match slot {
                    Slot::Param(index) | Slot::Capture(index) | Slot::Local(index) => {
                        index.hash(state);
                    }
                    Slot::Symbol(symbol) => symbol.raw().hash(state),
                }
            }
            NodeKind::Field { field: symbol, .. }
            | NodeKind::Invoke { method: symbol, .. }
            | NodeKind::New { ctor: symbol, .. } => symbol.raw().hash(state),
            NodeKind::Closure { lambda, .. } => {
                let nested = access.nested(lambda)?;
                hash_signature_into(&nested, state);
                self.hash_node(nested, nested.lambda.body, state)?;
            }
            NodeKind::InstanceOf { target, .. } => target.raw().hash(state),
            NodeKind::Unary { op, .. } => mem::discriminant(&op).hash(state),
            NodeKind::Binary { op, .. } => mem::discriminant(&op).hash(state),
            NodeKind::Assign { op, .. } => op.map(|op| mem::discriminant(&op)).hash(state),
            NodeKind::Let { slot, ty, .. } => {
                access.check_local_decl(id, slot)?;
                slot.hash(state);
                ty.raw().hash(state);
            }
            NodeKind::This
            | NodeKind::Index { .. }
            | NodeKind::Cast { .. }
            | NodeKind::Conditional { .. }
            | NodeKind::Block(_)
            | NodeKind::If { .. }
            | NodeKind::While { .. }
            | NodeKind::Return(_)
            | NodeKind::Throw(_) => {
                // Tag, type and children carry everything.
            }
        }
        Ok(())
    }
}

fn hash_signature_into(access: &BodyAccess<'_>, state: &mut FxHasher) {
    let lambda = access.lambda;
    lambda.target.raw().hash(state);
    lambda.params.len().hash(state);
    for param in &lambda.params {
        param.raw().hash(state);
    }
    lambda.captures.len().hash(state);
    for ty in lambda.capture_types() {
        ty.raw().hash(state);
    }
}
