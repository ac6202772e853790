#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use closure_ir::{
    BinaryOp, Capture, LambdaId, Literal, Name, NodeArena, NodeId, NodeTag, Slot, TreeBuilder,
    TypeId,
};
use pretty_assertions::assert_eq;

use super::*;
use crate::fixtures::{
    add_const, capture_times_two, choose, combine_params, count_down, curried_add,
    curried_add_over, negation_chain, read_global, COUNTER, INT_OP, INT_SUPPLIER, M, N, OTHER_SUPPLIER,
};
use crate::options::DEFAULT_MAX_DEPTH;

fn differ(arena: &NodeArena) -> TreeDiffer<'_> {
    TreeDiffer::new(arena, CapturePolicy::Positional, DEFAULT_MAX_DEPTH)
}

fn diff(arena: &NodeArena, left: LambdaId, right: LambdaId) -> DiffOutcome {
    differ(arena).diff(left, right).unwrap()
}

fn reason(outcome: &DiffOutcome) -> &DivergenceReason {
    &outcome.divergence().unwrap().reason
}

#[test]
fn renamed_single_parameter() {
    let mut arena = NodeArena::new();
    let x = add_const(&mut arena, 1);
    let y = add_const(&mut arena, 1);
    assert_eq!(diff(&arena, x, y), DiffOutcome::Equivalent);
}

#[test]
fn operand_order_matters() {
    let mut arena = NodeArena::new();
    let ab = combine_params(&mut arena, BinaryOp::Add, false);
    let ba = combine_params(&mut arena, BinaryOp::Add, true);
    let outcome = diff(&arena, ab, ba);
    assert_eq!(
        reason(&outcome),
        &DivergenceReason::SlotMismatch {
            left: Slot::Param(0),
            right: Slot::Param(1),
        }
    );
}

#[test]
fn different_operators() {
    let mut arena = NodeArena::new();
    let add = combine_params(&mut arena, BinaryOp::Add, false);
    let sub = combine_params(&mut arena, BinaryOp::Sub, false);
    assert_eq!(
        reason(&diff(&arena, add, sub)),
        &DivergenceReason::OperatorMismatch
    );
}

#[test]
fn renamed_captures_are_equivalent() {
    let mut arena = NodeArena::new();
    let n = capture_times_two(&mut arena, N, INT_SUPPLIER);
    let m = capture_times_two(&mut arena, M, INT_SUPPLIER);
    assert!(differ(&arena).equivalent(n, m).unwrap());
}

#[test]
fn identity_policy_separates_renamed_captures() {
    let mut arena = NodeArena::new();
    let n = capture_times_two(&mut arena, N, INT_SUPPLIER);
    let m = capture_times_two(&mut arena, M, INT_SUPPLIER);
    let n2 = capture_times_two(&mut arena, N, INT_SUPPLIER);
    let mut strict = TreeDiffer::new(&arena, CapturePolicy::Identity, DEFAULT_MAX_DEPTH);
    assert!(!strict.equivalent(n, m).unwrap());
    assert!(strict.equivalent(n, n2).unwrap());
}

#[test]
fn different_target_types() {
    let mut arena = NodeArena::new();
    let a = capture_times_two(&mut arena, N, INT_SUPPLIER);
    let b = capture_times_two(&mut arena, M, OTHER_SUPPLIER);
    let outcome = diff(&arena, a, b);
    assert_eq!(
        outcome.divergence().unwrap(),
        &Divergence {
            left: arena.lambda(a).body,
            right: arena.lambda(b).body,
            reason: DivergenceReason::Signature(SignatureMismatch::Target),
        }
    );
}

#[test]
fn swapped_conditional_branches() {
    let mut arena = NodeArena::new();
    let ab = choose(&mut arena, false);
    let ba = choose(&mut arena, true);
    assert!(matches!(
        reason(&diff(&arena, ab, ba)),
        DivergenceReason::SlotMismatch { .. }
    ));
}

#[test]
fn parameter_types_are_compared() {
    let mut arena = NodeArena::new();
    let int_x = add_const(&mut arena, 1);
    let mut b = TreeBuilder::new(&mut arena);
    let x = b.param(0, TypeId::LONG);
    let one = b.int(1);
    let sum = b.binary(BinaryOp::Add, x, one, TypeId::INT);
    let long_x = b.lambda(Name::EMPTY, INT_OP, &[TypeId::LONG], &[], sum);
    assert_eq!(
        reason(&diff(&arena, int_x, long_x)),
        &DivergenceReason::Signature(SignatureMismatch::ParamTypes)
    );
}

#[test]
fn capture_types_are_compared() {
    let mut arena = NodeArena::new();
    let int_capture = capture_times_two(&mut arena, N, INT_SUPPLIER);
    let mut b = TreeBuilder::new(&mut arena);
    let c = b.capture(0, TypeId::INT);
    let two = b.int(2);
    let body = b.binary(BinaryOp::Mul, c, two, TypeId::INT);
    let long_capture = b.lambda(
        Name::EMPTY,
        INT_SUPPLIER,
        &[],
        &[Capture::new(N, TypeId::LONG)],
        body,
    );
    assert_eq!(
        reason(&diff(&arena, int_capture, long_capture)),
        &DivergenceReason::Signature(SignatureMismatch::CaptureTypes)
    );
}

#[test]
fn swapped_captures_of_different_types() {
    // `f(n, s)` where the lambdas captured `n: int` and `s: long` in
    // opposite first-use orders.
    let f = closure_ir::SymbolId::new(50);
    let mut arena = NodeArena::new();
    let mut lambda = |order: [(closure_ir::SymbolId, TypeId); 2]| {
        let mut b = TreeBuilder::new(&mut arena);
        let position = |var| u32::from(order[1].0 == var);
        let n = b.capture(position(N), TypeId::INT);
        let s = b.capture(position(M), TypeId::LONG);
        let call = b.invoke(NodeId::INVALID, f, &[n, s], TypeId::VOID);
        let captures = order.map(|(var, ty)| Capture::new(var, ty));
        b.lambda(Name::EMPTY, INT_SUPPLIER, &[], &captures, call)
    };
    let ns = lambda([(N, TypeId::INT), (M, TypeId::LONG)]);
    let sn = lambda([(M, TypeId::LONG), (N, TypeId::INT)]);
    assert_eq!(
        reason(&diff(&arena, ns, sn)),
        &DivergenceReason::Signature(SignatureMismatch::CaptureTypes)
    );
}

#[test]
fn literal_type_is_compared() {
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena);
    let int_one = b.int(1);
    let a = b.lambda(Name::EMPTY, INT_SUPPLIER, &[], &[], int_one);
    let long_one = b.long(1);
    let c = b.lambda(Name::EMPTY, INT_SUPPLIER, &[], &[], long_one);
    assert_eq!(
        reason(&diff(&arena, a, c)),
        &DivergenceReason::TypeMismatch {
            left: TypeId::INT,
            right: TypeId::LONG,
        }
    );
}

#[test]
fn kind_mismatch_reports_tags() {
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena);
    let lit = b.lit(Literal::Int(0), TypeId::INT);
    let a = b.lambda(Name::EMPTY, INT_SUPPLIER, &[], &[], lit);
    let global = b.global(COUNTER, TypeId::INT);
    let c = b.lambda(Name::EMPTY, INT_SUPPLIER, &[], &[], global);
    assert_eq!(
        reason(&diff(&arena, a, c)),
        &DivergenceReason::KindMismatch {
            left: NodeTag::Literal,
            right: NodeTag::Var,
        }
    );
}

#[test]
fn symbols_compare_by_identity() {
    let mut arena = NodeArena::new();
    let a = read_global(&mut arena, COUNTER);
    let b = read_global(&mut arena, COUNTER);
    let c = read_global(&mut arena, N);
    assert!(differ(&arena).equivalent(a, b).unwrap());
    assert!(matches!(
        reason(&diff(&arena, a, c)),
        DivergenceReason::SlotMismatch { .. }
    ));
}

#[test]
fn nested_lambdas_compare_structurally() {
    let mut arena = NodeArena::new();
    let (outer_a, inner_a) = curried_add(&mut arena, 1);
    let (outer_b, _) = curried_add(&mut arena, 1);
    let (outer_c, inner_c) = curried_add(&mut arena, 2);
    assert!(differ(&arena).equivalent(outer_a, outer_b).unwrap());

    let outcome = diff(&arena, outer_a, outer_c);
    match reason(&outcome) {
        DivergenceReason::NestedLambda { left, right, inner } => {
            assert_eq!((*left, *right), (inner_a, inner_c));
            assert_eq!(inner.reason, DivergenceReason::LiteralMismatch);
        }
        other => panic!("expected a nested divergence, got {other:?}"),
    }
}

#[test]
fn identity_policy_matches_nested_captures_by_position() {
    // Each outer lambda declares its own parameter, so the inner lambdas
    // capture different variables.
    let mut arena = NodeArena::new();
    let (x, _) = curried_add_over(&mut arena, 1, closure_ir::SymbolId::new(100));
    let (a, _) = curried_add_over(&mut arena, 1, closure_ir::SymbolId::new(101));
    let (k2, _) = curried_add_over(&mut arena, 2, closure_ir::SymbolId::new(102));
    let mut strict = TreeDiffer::new(&arena, CapturePolicy::Identity, DEFAULT_MAX_DEPTH);
    assert_eq!(strict.diff(x, a).unwrap(), DiffOutcome::Equivalent);
    assert!(!strict.equivalent(x, k2).unwrap());
}

#[test]
fn nested_capture_arguments_use_the_outer_context() {
    let mut arena = NodeArena::new();
    let (outer_a, inner_a) = curried_add(&mut arena, 1);
    let target = arena.lambda(outer_a).target;
    // Same inner lambda, but the capture argument is a literal instead of
    // the outer parameter.
    let mut b = TreeBuilder::new(&mut arena);
    let zero = b.int(0);
    let closure = b.closure(inner_a, &[zero]);
    let outer_b = b.lambda(
        Name::EMPTY,
        target,
        &[TypeId::INT],
        &[],
        closure,
    );
    assert!(matches!(
        reason(&diff(&arena, outer_a, outer_b)),
        DivergenceReason::KindMismatch {
            left: NodeTag::Var,
            right: NodeTag::Literal,
        }
    ));
}

#[test]
fn statements_with_locals() {
    let mut arena = NodeArena::new();
    let a = count_down(&mut arena);
    let b = count_down(&mut arena);
    assert!(differ(&arena).equivalent(a, b).unwrap());
}

#[test]
fn optional_child_presence() {
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena);
    let bare = b.ret(NodeId::INVALID);
    let a = b.lambda(Name::EMPTY, INT_SUPPLIER, &[], &[], bare);
    let zero = b.int(0);
    let valued = b.ret(zero);
    let c = b.lambda(Name::EMPTY, INT_SUPPLIER, &[], &[], valued);
    let outcome = diff(&arena, a, c);
    assert_eq!(
        outcome.divergence().unwrap(),
        &Divergence {
            left: NodeId::INVALID,
            right: zero,
            reason: DivergenceReason::Presence,
        }
    );
}

#[test]
fn differ_is_reflexive_and_symmetric() {
    let mut arena = NodeArena::new();
    let ids = [
        add_const(&mut arena, 1),
        combine_params(&mut arena, BinaryOp::Add, false),
        combine_params(&mut arena, BinaryOp::Add, true),
        choose(&mut arena, false),
        count_down(&mut arena),
        curried_add(&mut arena, 3).0,
    ];
    let mut d = differ(&arena);
    for &l in &ids {
        assert!(d.equivalent(l, l).unwrap());
        for &r in &ids {
            assert_eq!(d.equivalent(l, r).unwrap(), d.equivalent(r, l).unwrap());
        }
    }
}

#[test]
fn depth_limit_is_reported() {
    let mut arena = NodeArena::new();
    let a = negation_chain(&mut arena, 64);
    let b = negation_chain(&mut arena, 64);
    let err = TreeDiffer::new(&arena, CapturePolicy::Positional, 8)
        .diff(a, b)
        .unwrap_err();
    assert!(matches!(err, DedupError::DepthExceeded { lambda, .. } if lambda == a));
}

#[test]
fn deep_chains_compare_without_overflow() {
    let mut arena = NodeArena::new();
    let a = negation_chain(&mut arena, 50_000);
    let b = negation_chain(&mut arena, 50_000);
    assert!(differ(&arena).equivalent(a, b).unwrap());
}

#[test]
fn unknown_lambda() {
    let mut arena = NodeArena::new();
    let a = add_const(&mut arena, 1);
    let err = differ(&arena).diff(a, LambdaId::new(9)).unwrap_err();
    assert_eq!(
        err,
        DedupError::UnknownLambda {
            lambda: LambdaId::new(9)
        }
    );
}

#[test]
fn capture_slot_out_of_range() {
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena);
    let c = b.capture(1, TypeId::INT);
    let a = b.lambda(
        Name::EMPTY,
        INT_SUPPLIER,
        &[],
        &[Capture::new(N, TypeId::INT)],
        c,
    );
    let err = differ(&arena).diff(a, a).unwrap_err();
    assert_eq!(
        err,
        DedupError::SlotOutOfRange {
            lambda: a,
            node: c,
            slot: Slot::Capture(1),
            declared: 1,
        }
    );
}

#[test]
fn spans_are_ignored() {
    use closure_ir::{Lambda, NodeKind, Span};

    let mut arena = NodeArena::new();
    let mut spelled = |offset: u32| {
        let x = arena.push_spanned(
            NodeKind::Var(Slot::Param(0)),
            TypeId::INT,
            Span::new(offset, offset + 1),
        );
        let one = arena.push_spanned(
            NodeKind::Literal(Literal::Int(1)),
            TypeId::INT,
            Span::new(offset + 4, offset + 5),
        );
        let body = arena.push_spanned(
            NodeKind::Binary {
                op: BinaryOp::Add,
                left: x,
                right: one,
            },
            TypeId::INT,
            Span::new(offset, offset + 5),
        );
        arena.push_lambda(
            Lambda::new(Name::EMPTY, INT_OP, &[TypeId::INT], body)
                .with_span(Span::new(offset, offset + 10)),
        )
    };
    let a = spelled(0);
    let b = spelled(100);

    assert_eq!(diff(&arena, a, b), DiffOutcome::Equivalent);
    let mut hasher = crate::hash::TreeHasher::new(&arena, DEFAULT_MAX_DEPTH);
    assert_eq!(
        hasher.hash_lambda(a).unwrap(),
        hasher.hash_lambda(b).unwrap()
    );
    assert_ne!(arena.span(arena.lambda(a).body), arena.span(arena.lambda(b).body));
}
