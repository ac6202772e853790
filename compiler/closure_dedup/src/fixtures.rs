//! Lambda builders shared by the unit tests.

use closure_ir::{
    BinaryOp, Capture, LambdaId, Name, NodeArena, NodeId, SymbolId, TreeBuilder, TypeId, UnaryOp,
};

/// `IntUnaryOperator`-like target.
pub const INT_OP: TypeId = TypeId::new(TypeId::FIRST_COMPOUND);
/// `IntBinaryOperator`-like target.
pub const INT_BIN_OP: TypeId = TypeId::new(TypeId::FIRST_COMPOUND + 1);
/// `IntSupplier`-like target.
pub const INT_SUPPLIER: TypeId = TypeId::new(TypeId::FIRST_COMPOUND + 2);
/// A second, unrelated supplier interface.
pub const OTHER_SUPPLIER: TypeId = TypeId::new(TypeId::FIRST_COMPOUND + 3);
/// `IntFunction<IntUnaryOperator>`-like target.
pub const CURRIED: TypeId = TypeId::new(TypeId::FIRST_COMPOUND + 4);

pub const N: SymbolId = SymbolId::new(1);
pub const M: SymbolId = SymbolId::new(2);
pub const COUNTER: SymbolId = SymbolId::new(40);
pub const PRINTLN: SymbolId = SymbolId::new(41);

/// `x -> x + k`
pub fn add_const(arena: &mut NodeArena, k: i64) -> LambdaId {
    let mut b = TreeBuilder::new(arena);
    let x = b.param(0, TypeId::INT);
    let k = b.int(k);
    let sum = b.binary(BinaryOp::Add, x, k, TypeId::INT);
    b.lambda(Name::EMPTY, INT_OP, &[TypeId::INT], &[], sum)
}

/// `(a, b) -> a op b`, or `b op a` when `swapped`.
pub fn combine_params(arena: &mut NodeArena, op: BinaryOp, swapped: bool) -> LambdaId {
    let mut b = TreeBuilder::new(arena);
    let a = b.param(0, TypeId::INT);
    let c = b.param(1, TypeId::INT);
    let (left, right) = if swapped { (c, a) } else { (a, c) };
    let body = b.binary(op, left, right, TypeId::INT);
    b.lambda(Name::EMPTY, INT_BIN_OP, &[TypeId::INT, TypeId::INT], &[], body)
}

/// `() -> captured * 2`, capturing `var` at index 0.
pub fn capture_times_two(arena: &mut NodeArena, var: SymbolId, target: TypeId) -> LambdaId {
    let mut b = TreeBuilder::new(arena);
    let c = b.capture(0, TypeId::INT);
    let two = b.int(2);
    let body = b.binary(BinaryOp::Mul, c, two, TypeId::INT);
    b.lambda(
        Name::EMPTY,
        target,
        &[],
        &[Capture::new(var, TypeId::INT)],
        body,
    )
}

/// `(c, a, b) -> c ? a : b`, or `c ? b : a` when `swapped`.
pub fn choose(arena: &mut NodeArena, swapped: bool) -> LambdaId {
    let mut b = TreeBuilder::new(arena);
    let cond = b.param(0, TypeId::BOOL);
    let first = b.param(1, TypeId::INT);
    let second = b.param(2, TypeId::INT);
    let (then_branch, else_branch) = if swapped {
        (second, first)
    } else {
        (first, second)
    };
    let body = b.conditional(cond, then_branch, else_branch, TypeId::INT);
    b.lambda(
        Name::EMPTY,
        INT_BIN_OP,
        &[TypeId::BOOL, TypeId::INT, TypeId::INT],
        &[],
        body,
    )
}

/// `x -> y -> x + y + k`: the inner lambda captures the outer parameter.
///
/// Returns `(outer, inner)`.
pub fn curried_add(arena: &mut NodeArena, k: i64) -> (LambdaId, LambdaId) {
    curried_add_over(arena, k, SymbolId::new(100))
}

/// [`curried_add`] with the outer parameter declared as `outer_param`.
pub fn curried_add_over(
    arena: &mut NodeArena,
    k: i64,
    outer_param: SymbolId,
) -> (LambdaId, LambdaId) {
    let mut b = TreeBuilder::new(arena);
    let x = b.capture(0, TypeId::INT);
    let y = b.param(0, TypeId::INT);
    let xy = b.binary(BinaryOp::Add, x, y, TypeId::INT);
    let k = b.int(k);
    let body = b.binary(BinaryOp::Add, xy, k, TypeId::INT);
    let inner = b.lambda(
        Name::EMPTY,
        INT_OP,
        &[TypeId::INT],
        &[Capture::new(outer_param, TypeId::INT)],
        body,
    );
    let outer_x = b.param(0, TypeId::INT);
    let closure = b.closure(inner, &[outer_x]);
    let outer = b.lambda(Name::EMPTY, CURRIED, &[TypeId::INT], &[], closure);
    (outer, inner)
}

/// `x -> { int t = x; while (t > 0) t = t - 1; return t; }`
pub fn count_down(arena: &mut NodeArena) -> LambdaId {
    let mut b = TreeBuilder::new(arena);
    let x = b.param(0, TypeId::INT);
    let decl = b.let_local(0, TypeId::INT, x);
    let t = b.local(0, TypeId::INT);
    let zero = b.int(0);
    let cond = b.binary(BinaryOp::Gt, t, zero, TypeId::BOOL);
    let t1 = b.local(0, TypeId::INT);
    let t2 = b.local(0, TypeId::INT);
    let one = b.int(1);
    let dec = b.binary(BinaryOp::Sub, t2, one, TypeId::INT);
    let step = b.assign(t1, dec);
    let lp = b.while_loop(cond, step);
    let t3 = b.local(0, TypeId::INT);
    let ret = b.ret(t3);
    let body = b.block(&[decl, lp, ret]);
    b.arena().push_lambda(
        closure_ir::Lambda::new(Name::EMPTY, INT_OP, &[TypeId::INT], body).with_locals(1),
    )
}

/// `x -> -(-(...(x)))` with `depth` negations.
pub fn negation_chain(arena: &mut NodeArena, depth: usize) -> LambdaId {
    let mut b = TreeBuilder::new(arena);
    let mut node = b.param(0, TypeId::INT);
    for _ in 0..depth {
        node = b.unary(UnaryOp::Neg, node, TypeId::INT);
    }
    b.lambda(Name::EMPTY, INT_OP, &[TypeId::INT], &[], node)
}

/// `() -> Counter.value`, reading a static symbol.
pub fn read_global(arena: &mut NodeArena, symbol: SymbolId) -> LambdaId {
    let mut b = TreeBuilder::new(arena);
    let body = b.global(symbol, TypeId::INT);
    b.lambda(Name::EMPTY, INT_SUPPLIER, &[], &[], body)
}

/// `() -> println()` as an unqualified call with no receiver.
pub fn unqualified_call(arena: &mut NodeArena) -> LambdaId {
    let mut b = TreeBuilder::new(arena);
    let call = b.invoke(NodeId::INVALID, PRINTLN, &[], TypeId::VOID);
    b.lambda(Name::EMPTY, INT_SUPPLIER, &[], &[], call)
}
