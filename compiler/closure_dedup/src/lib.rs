//! Closure body deduplication.
//!
//! Decides which closures of a compilation unit can share one synthetic
//! implementation method. Two closures share a method when their bodies are
//! alpha-equivalent: identical up to the names of parameters, locals and
//! captured variables, with the same target type and the same parameter and
//! capture types.
//!
//! # Architecture
//!
//! - [`TreeDiffer`]: pairwise alpha-equivalence, reporting the first
//!   divergent node pair
//! - [`TreeHasher`]: a hash compatible with the differ (equivalent bodies
//!   always hash equal)
//! - [`Registry`]: online grouping into equivalence classes, first-seen
//!   lambda canonical
//! - [`DedupPlan`]: the frozen result the method emitter reads
//! - [`verify`]: group contracts used by deduplication tests
//! - [`dedup_units`]: one registry per compilation unit, units in parallel
//!
//! The differ and the hasher are independent pure walks over a shared,
//! immutable [`NodeArena`](closure_ir::NodeArena). Neither ever panics on
//! malformed input: bad ids, missing children, out-of-range slots and
//! runaway depth all come back as a [`DedupError`].
//!
//! # Tracing
//!
//! Set `RUST_LOG=closure_dedup=debug` to see class creation and folding,
//! `trace` for every comparison. Call [`init_tracing`] once at startup.

mod access;
mod batch;
mod binding;
mod diff;
mod error;
mod hash;
mod options;
mod plan;
mod registry;
pub mod verify;

#[cfg(test)]
mod fixtures;

use std::sync::Once;

pub use batch::{dedup_unit, dedup_units, UnitInput, UnitOutcome};
pub use binding::BindingContext;
pub use diff::{DiffOutcome, Divergence, DivergenceReason, SignatureMismatch, TreeDiffer};
pub use error::{DedupError, MalformedReason};
pub use hash::TreeHasher;
pub use options::{CapturePolicy, DedupFlags, DedupOptions, OptionsError, DEFAULT_MAX_DEPTH};
pub use plan::{
    CallSite, CanonicalRef, ClassId, ComparisonTrace, DedupNote, DedupPlan, DedupStats,
    EquivalenceClass, ImplMethod,
};
pub use registry::{Registry, RegistryState};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
/// With `CLOSURE_DEDUP_TREE` set, spans render as an indented tree.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let tree = std::env::var_os("CLOSURE_DEDUP_TREE").is_some();
        let hierarchical = tree.then(|| {
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
        });
        let flat = (!tree).then(|| fmt::layer().with_target(true).with_level(true));
        // Another subscriber may already be installed by the host.
        let _ = tracing_subscriber::registry()
            .with(hierarchical)
            .with(flat)
            .with(filter)
            .try_init();
    });
}
