//! Deduplication of whole compilation units.
//!
//! Each unit gets its own registry over its own arena; units share nothing,
//! so [`dedup_units`] runs them in parallel. Within a unit, lambdas are
//! submitted in discovery order and a failing lambda does not stop the
//! rest.

use closure_ir::{LambdaId, NodeArena};
use rayon::prelude::*;

use crate::error::DedupError;
use crate::options::DedupOptions;
use crate::plan::DedupPlan;
use crate::registry::Registry;

/// One compilation unit: its arena and its lambdas in discovery order.
#[derive(Copy, Clone)]
pub struct UnitInput<'a> {
    pub arena: &'a NodeArena,
    pub lambdas: &'a [LambdaId],
}

#[derive(Debug)]
pub struct UnitOutcome {
    /// Plan over every lambda that was accepted.
    pub plan: DedupPlan,
    /// Lambdas that were rejected, in submission order.
    pub failures: Vec<DedupError>,
}

impl UnitOutcome {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Deduplicate one unit.
#[tracing::instrument(level = "debug", skip_all, fields(lambdas = lambdas.len()))]
pub fn dedup_unit(arena: &NodeArena, lambdas: &[LambdaId], options: &DedupOptions) -> UnitOutcome {
    let mut registry = Registry::new(arena, options.clone());
    let mut failures = Vec::new();
    for &lambda in lambdas {
        if let Err(err) = registry.submit(lambda) {
            tracing::warn!(%lambda, error = %err, "lambda left out of deduplication");
            failures.push(err);
        }
    }
    // A fresh registry is never finalized twice.
    let plan = registry.finalize().unwrap_or_default();
    UnitOutcome { plan, failures }
}

/// Deduplicate independent units in parallel, one outcome per unit in
/// input order.
pub fn dedup_units(units: &[UnitInput<'_>], options: &DedupOptions) -> Vec<UnitOutcome> {
    units
        .par_iter()
        .map(|unit| dedup_unit(unit.arena, unit.lambdas, options))
        .collect()
}

#[cfg(test)]
mod tests;
