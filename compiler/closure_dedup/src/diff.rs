//! Alpha-equivalence of lambda bodies.
//!
//! [`TreeDiffer`] walks two bodies in lockstep and reports the first pair of
//! nodes that differ. Bound variables compare by position through a
//! [`BindingContext`]; everything else compares structurally.
//!
//! # Rules
//!
//! Two lambdas are equivalent when:
//! 1. their signatures agree: target type, parameter types and capture
//!    types, position by position
//! 2. their bodies agree node by node: same tag, same payload, same node
//!    type, same number of children, and each child pair agrees
//!
//! A nested `Closure` node compares its lambda under a fresh context (the
//! nested lambda has its own parameters and captures) and its capture
//! arguments, which are evaluated in the enclosing body, under the current
//! one. The capture policy applies to the outermost pair only: a nested
//! lambda's captured variables are declared inside the enclosing lambdas,
//! and what flows into them is already compared through the capture
//! arguments, so nested captures always match by position.

use std::fmt;

use closure_ir::{LambdaId, NodeArena, NodeId, NodeKind, NodeTag, Slot, TypeId};
use closure_stack::{ensure_sufficient_stack, DepthBudget};

use crate::access::BodyAccess;
use crate::binding::BindingContext;
use crate::error::DedupError;
use crate::options::CapturePolicy;

/// Result of comparing two lambdas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffOutcome {
    Equivalent,
    Diverged(Divergence),
}

impl DiffOutcome {
    #[inline]
    pub fn is_equivalent(&self) -> bool {
        matches!(self, DiffOutcome::Equivalent)
    }

    pub fn divergence(&self) -> Option<&Divergence> {
        match self {
            DiffOutcome::Equivalent => None,
            DiffOutcome::Diverged(divergence) => Some(divergence),
        }
    }
}

/// First node pair at which two bodies differ.
///
/// For a signature mismatch the pair is the two bodies. When one side is an
/// absent optional child, that side is `NodeId::INVALID`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Divergence {
    pub left: NodeId,
    pub right: NodeId,
    pub reason: DivergenceReason,
}

/// Which part of the lambda signature differs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignatureMismatch {
    Target,
    ParamTypes,
    CaptureTypes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DivergenceReason {
    Signature(SignatureMismatch),
    KindMismatch { left: NodeTag, right: NodeTag },
    TypeMismatch { left: TypeId, right: TypeId },
    SlotMismatch { left: Slot, right: Slot },
    LiteralMismatch,
    SymbolMismatch,
    OperatorMismatch,
    /// `Let` nodes declare different slots or types.
    DeclarationMismatch,
    ChildCount { left: usize, right: usize },
    /// An optional child is present on one side only.
    Presence,
    /// Two nested closures whose lambdas differ.
    NestedLambda {
        left: LambdaId,
        right: LambdaId,
        inner: Box<Divergence>,
    },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} vs {:?}: ", self.left, self.right)?;
        match &self.reason {
            DivergenceReason::Signature(part) => write!(f, "signature differs ({part:?})"),
            DivergenceReason::KindMismatch { left, right } => {
                write!(f, "{left:?} vs {right:?}")
            }
            DivergenceReason::TypeMismatch { left, right } => {
                write!(f, "type {left:?} vs {right:?}")
            }
            DivergenceReason::SlotMismatch { left, right } => {
                write!(f, "{left:?} vs {right:?}")
            }
            DivergenceReason::LiteralMismatch => write!(f, "literal values differ"),
            DivergenceReason::SymbolMismatch => write!(f, "resolved symbols differ"),
            DivergenceReason::OperatorMismatch => write!(f, "operators differ"),
            DivergenceReason::DeclarationMismatch => write!(f, "local declarations differ"),
            DivergenceReason::ChildCount { left, right } => {
                write!(f, "{left} vs {right} children")
            }
            DivergenceReason::Presence => write!(f, "optional child present on one side"),
            DivergenceReason::NestedLambda { left, right, inner } => {
                write!(f, "nested lambdas {left} and {right} differ at {inner}")
            }
        }
    }
}

/// Pairwise comparison of lambdas in one arena.
pub struct TreeDiffer<'a> {
    arena: &'a NodeArena,
    policy: CapturePolicy,
    budget: DepthBudget,
}

impl<'a> TreeDiffer<'a> {
    pub fn new(arena: &'a NodeArena, policy: CapturePolicy, max_depth: usize) -> Self {
        Self {
            arena,
            policy,
            budget: DepthBudget::new(max_depth),
        }
    }

    /// Compare two lambdas, reporting the first divergence.
    pub fn diff(&mut self, left: LambdaId, right: LambdaId) -> Result<DiffOutcome, DedupError> {
        let left = BodyAccess::new(self.arena, left)?;
        let right = BodyAccess::new(self.arena, right)?;
        let outcome = match self.diff_lambdas(left, right, self.policy)? {
            None => DiffOutcome::Equivalent,
            Some(divergence) => {
                tracing::trace!(
                    left = %left.id,
                    right = %right.id,
                    %divergence,
                    "lambdas diverge"
                );
                DiffOutcome::Diverged(divergence)
            }
        };
        Ok(outcome)
    }

    /// Whether two lambdas are alpha-equivalent.
    pub fn equivalent(&mut self, left: LambdaId, right: LambdaId) -> Result<bool, DedupError> {
        self.diff(left, right).map(|outcome| outcome.is_equivalent())
    }

    fn diff_lambdas(
        &mut self,
        left: BodyAccess<'a>,
        right: BodyAccess<'a>,
        policy: CapturePolicy,
    ) -> Result<Option<Divergence>, DedupError> {
        if let Some(part) = signature_mismatch(&left, &right) {
            return Ok(Some(Divergence {
                left: left.lambda.body,
                right: right.lambda.body,
                reason: DivergenceReason::Signature(part),
            }));
        }
        let ctx = BindingContext::new(left.lambda, right.lambda, policy);
        self.diff_node(&ctx, left, right, left.lambda.body, right.lambda.body)
    }

    fn diff_node(
        &mut self,
        ctx: &BindingContext<'a>,
        la: BodyAccess<'a>,
        ra: BodyAccess<'a>,
        left: NodeId,
        right: NodeId,
    ) -> Result<Option<Divergence>, DedupError> {
        match (left.is_valid(), right.is_valid()) {
            (false, false) => return Ok(None),
            (true, true) => {}
            _ => {
                return Ok(Some(Divergence {
                    left,
                    right,
                    reason: DivergenceReason::Presence,
                }))
            }
        }
        self.budget
            .enter()
            .map_err(|source| DedupError::DepthExceeded {
                lambda: la.id,
                source,
            })?;
        let result = ensure_sufficient_stack(|| self.diff_present(ctx, la, ra, left, right));
        self.budget.exit();
        result
    }

    fn diff_present(
        &mut self,
        ctx: &BindingContext<'a>,
        la: BodyAccess<'a>,
        ra: BodyAccess<'a>,
        left: NodeId,
        right: NodeId,
    ) -> Result<Option<Divergence>, DedupError> {
        let left_kind = la.node(left)?;
        let right_kind = ra.node(right)?;
        let left_children = la.children(left, left_kind)?;
        let right_children = ra.children(right, right_kind)?;

        let diverged = |reason| -> Result<Option<Divergence>, DedupError> {
            Ok(Some(Divergence {
                left,
                right,
                reason,
            }))
        };

        if left_kind.tag() != right_kind.tag() {
            return diverged(DivergenceReason::KindMismatch {
                left: left_kind.tag(),
                right: right_kind.tag(),
            });
        }
        if let Some(reason) = self.diff_payload(ctx, la, ra, left, right, left_kind, right_kind)? {
            return diverged(reason);
        }
        let (left_ty, right_ty) = (la.arena.ty(left), ra.arena.ty(right));
        if left_ty != right_ty {
            return diverged(DivergenceReason::TypeMismatch {
                left: left_ty,
                right: right_ty,
            });
        }
        if left_children.len() != right_children.len() {
            return diverged(DivergenceReason::ChildCount {
                left: left_children.len(),
                right: right_children.len(),
            });
        }
        for (&l, &r) in left_children.iter().zip(&right_children) {
            if let Some(divergence) = self.diff_node(ctx, la, ra, l, r)? {
                return Ok(Some(divergence));
            }
        }
        Ok(None)
    }

    /// Compare everything about two same-tag nodes that is not a child.
    #[expect(
        clippy::too_many_arguments,
        reason = "both sides of the paired walk travel together"
    )]
    fn diff_payload(
        &mut self,
        ctx: &BindingContext<'a>,
        la: BodyAccess<'a>,
        ra: BodyAccess<'a>,
        left: NodeId,
        right: NodeId,
        left_kind: &NodeKind,
        right_kind: &NodeKind,
    ) -> Result<Option<DivergenceReason>, DedupError> {
        let same = |equal: bool, reason| -> Result<Option<DivergenceReason>, DedupError> {
            Ok((!equal).then_some(reason))
        };
        match (*left_kind, *right_kind) {
            (NodeKind::Literal(l), NodeKind::Literal(r)) => {
                same(l == r, DivergenceReason::LiteralMismatch)
            }
            (NodeKind::Var(l), NodeKind::Var(r)) => {
                la.check_slot(left, l)?;
                ra.check_slot(right, r)?;
                same(
                    ctx.slots_match(l, r),
                    DivergenceReason::SlotMismatch { left: l, right: r },
                )
            }
            (NodeKind::Field { field: l, .. }, NodeKind::Field { field: r, .. })
            | (NodeKind::Invoke { method: l, .. }, NodeKind::Invoke { method: r, .. })
            | (NodeKind::New { ctor: l, .. }, NodeKind::New { ctor: r, .. }) => {
                same(l == r, DivergenceReason::SymbolMismatch)
            }
            (NodeKind::Closure { lambda: l, .. }, NodeKind::Closure { lambda: r, .. }) => {
                let inner =
                    self.diff_lambdas(la.nested(l)?, ra.nested(r)?, CapturePolicy::Positional)?;
                Ok(inner.map(|inner| DivergenceReason::NestedLambda {
                    left: l,
                    right: r,
                    inner: Box::new(inner),
                }))
            }
            (NodeKind::InstanceOf { target: l, .. }, NodeKind::InstanceOf { target: r, .. }) => {
                same(
                    l == r,
                    DivergenceReason::TypeMismatch { left: l, right: r },
                )
            }
            (NodeKind::Unary { op: l, .. }, NodeKind::Unary { op: r, .. }) => {
                same(l == r, DivergenceReason::OperatorMismatch)
            }
            (NodeKind::Binary { op: l, .. }, NodeKind::Binary { op: r, .. }) => {
                same(l == r, DivergenceReason::OperatorMismatch)
            }
            (NodeKind::Assign { op: l, .. }, NodeKind::Assign { op: r, .. }) => {
                same(l == r, DivergenceReason::OperatorMismatch)
            }
            (
                NodeKind::Let {
                    slot: left_slot,
                    ty: left_ty,
                    ..
                },
                NodeKind::Let {
                    slot: right_slot,
                    ty: right_ty,
                    ..
                },
            ) => {
                la.check_local_decl(left, left_slot)?;
                ra.check_local_decl(right, right_slot)?;
                same(
                    left_slot == right_slot && left_ty == right_ty,
                    DivergenceReason::DeclarationMismatch,
                )
            }
            // Same tag, no payload.
            _ => Ok(None),
        }
    }
}

fn signature_mismatch(left: &BodyAccess<'_>, right: &BodyAccess<'_>) -> Option<SignatureMismatch> {
    let (l, r) = (left.lambda, right.lambda);
    if l.target != r.target {
        Some(SignatureMismatch::Target)
    } else if l.params != r.params {
        Some(SignatureMismatch::ParamTypes)
    } else if !l.capture_types().eq(r.capture_types()) {
        Some(SignatureMismatch::CaptureTypes)
    } else {
        None
    }
}

#[cfg(test)]
mod tests;
