//! The result of deduplicating one compilation unit.
//!
//! A [`DedupPlan`] is what the method emitter reads: one implementation
//! method per equivalence class, and for every lambda the method its
//! creation site must reference plus the values it must pass.

use std::fmt;

use closure_ir::{LambdaId, Name, StringInterner, SymbolId};
use rustc_hash::FxHashMap;

use crate::diff::DiffOutcome;

/// Index of an equivalence class, in creation order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ClassId(u32);

impl ClassId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// Synthetic implementation method of a class, `lambda$<owner>$<ordinal>`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ImplMethod {
    /// Enclosing method of the canonical lambda.
    pub owner: Name,
    /// Per-owner counter, in class creation order.
    pub ordinal: u32,
}

impl ImplMethod {
    pub fn name(&self, interner: &StringInterner) -> String {
        format!("lambda${}${}", interner.lookup(self.owner), self.ordinal)
    }
}

/// What the registry answers for a submitted lambda.
///
/// Two lambdas share an implementation exactly when their references are
/// equal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct CanonicalRef {
    pub class: ClassId,
    /// First-submitted member of the class.
    pub canonical: LambdaId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct EquivalenceClass {
    pub id: ClassId,
    pub canonical: LambdaId,
    /// Members in submission order; the first is `canonical`.
    pub members: Vec<LambdaId>,
    /// Hash shared by every member.
    pub hash: u64,
    pub method: ImplMethod,
}

/// The creation site of one lambda after deduplication.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct CallSite {
    pub lambda: LambdaId,
    pub class: ClassId,
    pub method: ImplMethod,
    /// The lambda's own captured variables, in capture-index order. A folded
    /// lambda passes these to the canonical lambda's method.
    pub captures: Vec<SymbolId>,
}

/// Debug notes, emitted when the matching dump flag is set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DedupNote {
    /// A lambda created a new implementation method.
    LambdaStat { lambda: LambdaId, method: ImplMethod },
    /// A lambda was folded into an existing implementation method.
    Deduplicated {
        lambda: LambdaId,
        canonical: LambdaId,
        method: ImplMethod,
    },
}

impl DedupNote {
    pub fn lambda(&self) -> LambdaId {
        match *self {
            DedupNote::LambdaStat { lambda, .. } | DedupNote::Deduplicated { lambda, .. } => lambda,
        }
    }

    /// Human-readable message with method names resolved.
    pub fn render(&self, interner: &StringInterner) -> String {
        match self {
            DedupNote::LambdaStat { lambda, method } => {
                format!(
                    "lambda {lambda} implemented by {}",
                    method.name(interner)
                )
            }
            DedupNote::Deduplicated {
                lambda,
                canonical,
                method,
            } => format!(
                "deduplicating lambda {lambda} into {canonical} ({})",
                method.name(interner)
            ),
        }
    }
}

/// One differ invocation, recorded when comparison tracing is on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparisonTrace {
    pub candidate: LambdaId,
    /// Canonical lambda of the class compared against.
    pub against: LambdaId,
    pub outcome: DiffOutcome,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct DedupStats {
    /// Distinct lambdas accepted.
    pub submitted: usize,
    pub classes: usize,
    /// Lambdas folded into an existing class.
    pub deduplicated: usize,
    /// Differ invocations.
    pub comparisons: usize,
    /// Differ invocations on equal hashes that found no equivalence.
    pub collisions: usize,
}

/// Frozen outcome of a registry.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct DedupPlan {
    pub(crate) classes: Vec<EquivalenceClass>,
    pub(crate) call_sites: Vec<CallSite>,
    pub(crate) assignments: FxHashMap<LambdaId, ClassId>,
    pub(crate) notes: Vec<DedupNote>,
    pub(crate) stats: DedupStats,
    #[cfg_attr(feature = "cache", serde(skip))]
    pub(crate) traces: Vec<ComparisonTrace>,
}

impl DedupPlan {
    /// The class and canonical member of a submitted lambda.
    pub fn canonical(&self, lambda: LambdaId) -> Option<CanonicalRef> {
        let class = *self.assignments.get(&lambda)?;
        let canonical = self.classes.get(class.index())?.canonical;
        Some(CanonicalRef { class, canonical })
    }

    /// Classes in creation order.
    pub fn classes(&self) -> &[EquivalenceClass] {
        &self.classes
    }

    pub fn class(&self, id: ClassId) -> Option<&EquivalenceClass> {
        self.classes.get(id.index())
    }

    /// Implementation methods to emit, one per class, in creation order.
    pub fn methods(&self) -> impl ExactSizeIterator<Item = ImplMethod> + '_ {
        self.classes.iter().map(|class| class.method)
    }

    /// Every accepted lambda's creation site, in submission order.
    pub fn call_sites(&self) -> &[CallSite] {
        &self.call_sites
    }

    /// Folded lambdas paired with the canonical lambda they reuse, in
    /// submission order.
    pub fn deduplicated(&self) -> impl Iterator<Item = (LambdaId, LambdaId)> + '_ {
        self.call_sites.iter().filter_map(|site| {
            let canonical = self.classes.get(site.class.index())?.canonical;
            (canonical != site.lambda).then_some((site.lambda, canonical))
        })
    }

    pub fn notes(&self) -> &[DedupNote] {
        &self.notes
    }

    pub fn stats(&self) -> DedupStats {
        self.stats
    }

    /// Comparison outcomes, empty unless tracing was enabled.
    pub fn traces(&self) -> &[ComparisonTrace] {
        &self.traces
    }

    /// Number of accepted lambdas.
    pub fn len(&self) -> usize {
        self.call_sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.call_sites.is_empty()
    }
}
