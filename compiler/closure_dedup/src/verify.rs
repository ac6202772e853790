//! Group contracts for deduplication tests.
//!
//! Test sources mark lambdas that must be interchangeable (an *equal group*)
//! and lambdas that must stay apart (a *not-equal group*). This module checks
//! the differ, the hasher and a finished plan against those marks and
//! reports every violation as a value.
//!
//! - Within an equal group, every ordered pair must be equivalent and hash
//!   equal.
//! - Across groups of the same family, no pair may be equivalent or hash
//!   equal. An equal hash is not unsound, but it makes the registry compare
//!   lambdas that could have been told apart for free.
//! - A plan must fold every later member of an equal group into the
//!   group's first member, and emit exactly the methods of the lambdas it
//!   did not fold.

use std::collections::BTreeSet;

use closure_ir::{LambdaId, NodeArena};
use rustc_hash::FxHashMap;

use crate::diff::{Divergence, TreeDiffer};
use crate::error::DedupError;
use crate::hash::TreeHasher;
use crate::options::DedupOptions;
use crate::plan::{DedupPlan, ImplMethod};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupViolation {
    /// Members of an equal group that the differ tells apart.
    ExpectedEqual {
        left: LambdaId,
        right: LambdaId,
        divergence: Divergence,
    },
    /// Equivalent lambdas with different hashes. Always a defect.
    HashDisagreement { left: LambdaId, right: LambdaId },
    /// Lambdas from different groups that the differ considers equivalent.
    ExpectedDistinct { left: LambdaId, right: LambdaId },
    /// Lambdas from different groups with equal hashes.
    HashCollision { left: LambdaId, right: LambdaId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanViolation {
    /// A later member of an equal group got its own class.
    NotDeduplicated { lambda: LambdaId, expected: LambdaId },
    /// A later member of an equal group was folded into the wrong lambda.
    WrongCanonical {
        lambda: LambdaId,
        expected: LambdaId,
        actual: LambdaId,
    },
    /// The emitted methods differ from the methods of unfolded lambdas.
    MethodMismatch {
        expected: Vec<ImplMethod>,
        actual: Vec<ImplMethod>,
    },
}

/// Check the differ and the hasher against equal and not-equal groups.
pub fn check_groups(
    arena: &NodeArena,
    options: &DedupOptions,
    equal_groups: &[Vec<LambdaId>],
    not_equal_groups: &[Vec<LambdaId>],
) -> Result<Vec<GroupViolation>, DedupError> {
    let mut checker = GroupChecker {
        differ: TreeDiffer::new(arena, options.capture_policy, options.max_depth),
        hasher: TreeHasher::new(arena, options.max_depth),
        hashes: FxHashMap::default(),
        violations: Vec::new(),
    };
    for group in equal_groups {
        checker.check_equal(group)?;
    }
    checker.check_distinct(equal_groups)?;
    checker.check_distinct(not_equal_groups)?;
    Ok(checker.violations)
}

struct GroupChecker<'a> {
    differ: TreeDiffer<'a>,
    hasher: TreeHasher<'a>,
    hashes: FxHashMap<LambdaId, u64>,
    violations: Vec<GroupViolation>,
}

impl GroupChecker<'_> {
    fn hash(&mut self, lambda: LambdaId) -> Result<u64, DedupError> {
        if let Some(&hash) = self.hashes.get(&lambda) {
            return Ok(hash);
        }
        let hash = self.hasher.hash_lambda(lambda)?;
        self.hashes.insert(lambda, hash);
        Ok(hash)
    }

    fn check_equal(&mut self, group: &[LambdaId]) -> Result<(), DedupError> {
        for (i, &left) in group.iter().enumerate() {
            for (j, &right) in group.iter().enumerate() {
                if i == j {
                    continue;
                }
                match self.differ.diff(left, right)?.divergence() {
                    Some(divergence) => self.violations.push(GroupViolation::ExpectedEqual {
                        left,
                        right,
                        divergence: divergence.clone(),
                    }),
                    None => {
                        if self.hash(left)? != self.hash(right)? {
                            self.violations
                                .push(GroupViolation::HashDisagreement { left, right });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_distinct(&mut self, groups: &[Vec<LambdaId>]) -> Result<(), DedupError> {
        for (i, group) in groups.iter().enumerate() {
            for other in &groups[i + 1..] {
                for &left in group {
                    for &right in other {
                        if self.differ.equivalent(left, right)? {
                            self.violations
                                .push(GroupViolation::ExpectedDistinct { left, right });
                        }
                        if self.hash(left)? == self.hash(right)? {
                            self.violations
                                .push(GroupViolation::HashCollision { left, right });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Expected folding for a set of equal groups: every later member maps to
/// its group's first member.
pub fn expected_deduplication(equal_groups: &[Vec<LambdaId>]) -> Vec<(LambdaId, LambdaId)> {
    equal_groups
        .iter()
        .filter_map(|group| {
            let (&first, rest) = group.split_first()?;
            Some(rest.iter().map(move |&later| (later, first)))
        })
        .flatten()
        .collect()
}

/// Check a finished plan against equal groups.
pub fn check_plan(plan: &DedupPlan, equal_groups: &[Vec<LambdaId>]) -> Vec<PlanViolation> {
    let mut violations = Vec::new();
    let folded: FxHashMap<LambdaId, LambdaId> = plan.deduplicated().collect();

    for (lambda, expected) in expected_deduplication(equal_groups) {
        match folded.get(&lambda) {
            None => violations.push(PlanViolation::NotDeduplicated { lambda, expected }),
            Some(&actual) if actual != expected => violations.push(PlanViolation::WrongCanonical {
                lambda,
                expected,
                actual,
            }),
            Some(_) => {}
        }
    }

    let expected = sorted_methods(
        plan.call_sites()
            .iter()
            .filter(|site| !folded.contains_key(&site.lambda))
            .map(|site| site.method),
    );
    let actual = sorted_methods(plan.methods());
    if expected != actual {
        violations.push(PlanViolation::MethodMismatch { expected, actual });
    }
    violations
}

fn sorted_methods(methods: impl Iterator<Item = ImplMethod>) -> Vec<ImplMethod> {
    methods.collect::<BTreeSet<_>>().into_iter().collect()
}
