//! Online canonicalization of lambdas.
//!
//! The registry consumes lambdas one at a time in discovery order and
//! assigns each to an equivalence class: the first class in its hash bucket
//! whose canonical member is equivalent, or a fresh class otherwise. The
//! first lambda of a class is its canonical member, so assignments are
//! stable and deterministic for a fixed submission order.
//!
//! # Lifecycle
//!
//! ```text
//! Empty --submit--> Populating --finalize--> Finalized
//! ```
//!
//! Buckets and classes are append-only. A failed submission changes nothing.
//!
//! Only the bucket of a lambda's own hash is searched, so an equivalent
//! lambda that hashed differently would silently get a class of its own.
//! The hasher and differ are kept in agreement by
//! [`verify::check_groups`](crate::verify::check_groups), which reports such
//! pairs as `HashDisagreement`.

use closure_ir::{LambdaId, Name, NodeArena};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::diff::TreeDiffer;
use crate::error::DedupError;
use crate::hash::TreeHasher;
use crate::options::{DedupFlags, DedupOptions};
use crate::plan::{
    CallSite, CanonicalRef, ClassId, ComparisonTrace, DedupNote, DedupPlan, DedupStats,
    EquivalenceClass, ImplMethod,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegistryState {
    Empty,
    Populating,
    Finalized,
}

/// Per-unit registry over the lambdas of one arena.
pub struct Registry<'a> {
    arena: &'a NodeArena,
    options: DedupOptions,
    state: RegistryState,
    /// Hash to classes, in creation order.
    buckets: FxHashMap<u64, SmallVec<[ClassId; 1]>>,
    classes: Vec<EquivalenceClass>,
    assignments: FxHashMap<LambdaId, ClassId>,
    call_sites: Vec<CallSite>,
    /// Next implementation-method ordinal per owner.
    ordinals: FxHashMap<Name, u32>,
    notes: Vec<DedupNote>,
    stats: DedupStats,
    traces: Vec<ComparisonTrace>,
}

/// Work done while searching a bucket, applied only if submission succeeds.
#[derive(Default)]
struct Search {
    comparisons: usize,
    collisions: usize,
    traces: Vec<ComparisonTrace>,
}

impl<'a> Registry<'a> {
    pub fn new(arena: &'a NodeArena, options: DedupOptions) -> Self {
        Self {
            arena,
            options,
            state: RegistryState::Empty,
            buckets: FxHashMap::default(),
            classes: Vec::new(),
            assignments: FxHashMap::default(),
            call_sites: Vec::new(),
            ordinals: FxHashMap::default(),
            notes: Vec::new(),
            stats: DedupStats::default(),
            traces: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn options(&self) -> &DedupOptions {
        &self.options
    }

    /// Classes created so far.
    pub fn classes(&self) -> &[EquivalenceClass] {
        &self.classes
    }

    /// The recorded reference of an already-submitted lambda.
    pub fn canonical(&self, lambda: LambdaId) -> Option<CanonicalRef> {
        self.assignments
            .get(&lambda)
            .map(|&class| self.reference(class))
    }

    fn reference(&self, class: ClassId) -> CanonicalRef {
        CanonicalRef {
            class,
            canonical: self.classes[class.index()].canonical,
        }
    }

    /// Assign `lambda` to an equivalence class.
    ///
    /// Resubmitting a lambda returns its recorded reference without
    /// re-examining it.
    #[tracing::instrument(level = "debug", skip(self), fields(lambda = %lambda))]
    pub fn submit(&mut self, lambda: LambdaId) -> Result<CanonicalRef, DedupError> {
        if self.state == RegistryState::Finalized {
            return Err(DedupError::SubmitAfterFinalize { lambda });
        }
        if let Some(found) = self.canonical(lambda) {
            return Ok(found);
        }

        let mut hasher = TreeHasher::new(self.arena, self.options.max_depth);
        let hash = hasher.hash_lambda(lambda)?;

        let mut search = Search::default();
        let matched = if self.options.deduplicate {
            self.find_class(lambda, hash, &mut search)?
        } else {
            None
        };
        // Nothing below can fail.
        self.stats.comparisons += search.comparisons;
        self.stats.collisions += search.collisions;
        self.traces.append(&mut search.traces);
        self.stats.submitted += 1;
        self.state = RegistryState::Populating;

        let class = match matched {
            Some(class) => self.fold(lambda, class),
            None => self.create(lambda, hash),
        };
        self.record_call_site(lambda, class);
        Ok(self.reference(class))
    }

    /// First class in `hash`'s bucket whose canonical member is equivalent
    /// to `lambda`.
    fn find_class(
        &self,
        lambda: LambdaId,
        hash: u64,
        search: &mut Search,
    ) -> Result<Option<ClassId>, DedupError> {
        let Some(bucket) = self.buckets.get(&hash) else {
            return Ok(None);
        };
        let mut differ = TreeDiffer::new(
            self.arena,
            self.options.capture_policy,
            self.options.max_depth,
        );
        for &class in bucket {
            let canonical = self.classes[class.index()].canonical;
            let outcome = differ.diff(lambda, canonical)?;
            let equivalent = outcome.is_equivalent();
            search.comparisons += 1;
            tracing::trace!(candidate = %lambda, against = %canonical, equivalent, "compared");
            if !equivalent {
                search.collisions += 1;
            }
            if self.options.flags.contains(DedupFlags::TRACE_COMPARISONS) {
                search.traces.push(ComparisonTrace {
                    candidate: lambda,
                    against: canonical,
                    outcome,
                });
            }
            if equivalent {
                return Ok(Some(class));
            }
        }
        Ok(None)
    }

    fn fold(&mut self, lambda: LambdaId, class: ClassId) -> ClassId {
        let entry = &mut self.classes[class.index()];
        entry.members.push(lambda);
        let (canonical, method) = (entry.canonical, entry.method);
        self.assignments.insert(lambda, class);
        self.stats.deduplicated += 1;

        tracing::debug!(%lambda, %canonical, ?class, "deduplicated lambda");
        if self.options.flags.contains(DedupFlags::DUMP_DEDUPLICATION) {
            self.note(DedupNote::Deduplicated {
                lambda,
                canonical,
                method,
            });
        }
        class
    }

    fn create(&mut self, lambda: LambdaId, hash: u64) -> ClassId {
        let id = ClassId::new(to_u32(self.classes.len()));
        let owner = self.arena.lambda(lambda).owner;
        let ordinal = self.ordinals.entry(owner).or_insert(0);
        let method = ImplMethod {
            owner,
            ordinal: *ordinal,
        };
        *ordinal += 1;

        self.classes.push(EquivalenceClass {
            id,
            canonical: lambda,
            members: vec![lambda],
            hash,
            method,
        });
        self.buckets.entry(hash).or_default().push(id);
        self.assignments.insert(lambda, id);
        self.stats.classes += 1;

        tracing::debug!(%lambda, class = ?id, hash, "new equivalence class");
        if self.options.flags.contains(DedupFlags::DUMP_STATS) {
            self.note(DedupNote::LambdaStat { lambda, method });
        }
        id
    }

    fn note(&mut self, note: DedupNote) {
        tracing::info!(?note, "dedup note");
        self.notes.push(note);
    }

    fn record_call_site(&mut self, lambda: LambdaId, class: ClassId) {
        let captures = self
            .arena
            .lambda(lambda)
            .captures
            .iter()
            .map(|capture| capture.var)
            .collect();
        self.call_sites.push(CallSite {
            lambda,
            class,
            method: self.classes[class.index()].method,
            captures,
        });
    }

    /// Freeze the registry and hand out its plan.
    ///
    /// Later submissions fail with [`DedupError::SubmitAfterFinalize`].
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn finalize(&mut self) -> Result<DedupPlan, DedupError> {
        if self.state == RegistryState::Finalized {
            return Err(DedupError::AlreadyFinalized);
        }
        self.state = RegistryState::Finalized;
        tracing::debug!(
            submitted = self.stats.submitted,
            classes = self.stats.classes,
            deduplicated = self.stats.deduplicated,
            "registry finalized"
        );
        Ok(DedupPlan {
            classes: self.classes.clone(),
            call_sites: self.call_sites.clone(),
            assignments: self.assignments.clone(),
            notes: self.notes.clone(),
            stats: self.stats,
            traces: self.traces.clone(),
        })
    }
}

/// Class indices fit in `u32`; more classes than that means more lambdas
/// than `LambdaId` can name.
#[inline]
fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic!("equivalence class count {value} exceeds u32"))
}
