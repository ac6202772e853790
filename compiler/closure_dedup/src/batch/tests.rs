use closure_ir::{LambdaId, NodeArena};
use pretty_assertions::assert_eq;

use super::*;
use crate::fixtures::{add_const, capture_times_two, negation_chain, INT_SUPPLIER, M, N};

#[test]
fn failures_do_not_abort_the_unit() {
    let mut arena = NodeArena::new();
    let a = add_const(&mut arena, 1);
    let deep = negation_chain(&mut arena, 100);
    let b = add_const(&mut arena, 1);
    let missing = LambdaId::new(99);

    let options = DedupOptions::default().with_max_depth(32);
    let outcome = dedup_unit(&arena, &[a, deep, missing, b], &options);
    assert!(!outcome.is_clean());
    assert_eq!(outcome.failures.len(), 2);
    assert_eq!(outcome.failures[0].lambda(), Some(deep));
    assert_eq!(outcome.failures[1].lambda(), Some(missing));
    assert_eq!(outcome.plan.deduplicated().collect::<Vec<_>>(), [(b, a)]);
}

#[test]
fn units_are_independent() {
    let mut first = NodeArena::new();
    let first_ids = vec![add_const(&mut first, 1), add_const(&mut first, 1)];
    let mut second = NodeArena::new();
    let second_ids = vec![
        capture_times_two(&mut second, N, INT_SUPPLIER),
        add_const(&mut second, 1),
        capture_times_two(&mut second, M, INT_SUPPLIER),
    ];

    let units = [
        UnitInput {
            arena: &first,
            lambdas: &first_ids,
        },
        UnitInput {
            arena: &second,
            lambdas: &second_ids,
        },
    ];
    let outcomes = dedup_units(&units, &DedupOptions::default());
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(UnitOutcome::is_clean));
    assert_eq!(outcomes[0].plan.stats().classes, 1);
    assert_eq!(outcomes[1].plan.stats().classes, 2);
    assert_eq!(
        outcomes[1].plan.deduplicated().collect::<Vec<_>>(),
        [(second_ids[2], second_ids[0])]
    );
}

#[test]
fn parallel_matches_sequential() {
    let arenas: Vec<(NodeArena, Vec<LambdaId>)> = (0..8)
        .map(|unit| {
            let mut arena = NodeArena::new();
            let ids = (0..6)
                .map(|i| add_const(&mut arena, (unit + i) % 3))
                .collect();
            (arena, ids)
        })
        .collect();
    let units: Vec<_> = arenas
        .iter()
        .map(|(arena, ids)| UnitInput {
            arena,
            lambdas: ids,
        })
        .collect();
    let options = DedupOptions::default();
    let parallel = dedup_units(&units, &options);
    for (unit, outcome) in units.iter().zip(&parallel) {
        let sequential = dedup_unit(unit.arena, unit.lambdas, &options);
        assert_eq!(outcome.plan.classes(), sequential.plan.classes());
        assert_eq!(outcome.plan.call_sites(), sequential.plan.call_sites());
    }
}
