//! Convenience constructors for resolved closure bodies.
//!
//! The resolver (and tests) build bodies bottom-up through a
//! [`TreeBuilder`], which wraps a `&mut NodeArena` and fixes the node type
//! conventions: literals carry their declared type, casts carry their target
//! type, statements are typed `VOID`.

use crate::{
    BinaryOp, Capture, Lambda, LambdaId, Literal, Name, NodeArena, NodeId, NodeKind, Slot,
    SymbolId, TypeId, UnaryOp,
};

/// Bottom-up builder over a node arena.
pub struct TreeBuilder<'a> {
    arena: &'a mut NodeArena,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(arena: &'a mut NodeArena) -> Self {
        Self { arena }
    }

    /// Access the underlying arena.
    pub fn arena(&mut self) -> &mut NodeArena {
        self.arena
    }

    pub fn lit(&mut self, value: Literal, ty: TypeId) -> NodeId {
        self.arena.push(NodeKind::Literal(value), ty)
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.lit(Literal::Int(value), TypeId::INT)
    }

    pub fn long(&mut self, value: i64) -> NodeId {
        self.lit(Literal::Int(value), TypeId::LONG)
    }

    pub fn string(&mut self, value: Name) -> NodeId {
        self.lit(Literal::Str(value), TypeId::STRING)
    }

    pub fn var(&mut self, slot: Slot, ty: TypeId) -> NodeId {
        self.arena.push(NodeKind::Var(slot), ty)
    }

    pub fn param(&mut self, index: u32, ty: TypeId) -> NodeId {
        self.var(Slot::Param(index), ty)
    }

    pub fn capture(&mut self, index: u32, ty: TypeId) -> NodeId {
        self.var(Slot::Capture(index), ty)
    }

    pub fn local(&mut self, index: u32, ty: TypeId) -> NodeId {
        self.var(Slot::Local(index), ty)
    }

    pub fn global(&mut self, symbol: SymbolId, ty: TypeId) -> NodeId {
        self.var(Slot::Symbol(symbol), ty)
    }

    pub fn this(&mut self, ty: TypeId) -> NodeId {
        self.arena.push(NodeKind::This, ty)
    }

    pub fn field(&mut self, receiver: NodeId, field: SymbolId, ty: TypeId) -> NodeId {
        self.arena.push(NodeKind::Field { receiver, field }, ty)
    }

    pub fn index(&mut self, receiver: NodeId, index: NodeId, ty: TypeId) -> NodeId {
        self.arena.push(NodeKind::Index { receiver, index }, ty)
    }

    /// Method invocation; pass `NodeId::INVALID` for an unqualified call.
    pub fn invoke(
        &mut self,
        receiver: NodeId,
        method: SymbolId,
        args: &[NodeId],
        ty: TypeId,
    ) -> NodeId {
        let args = self.arena.push_list(args);
        self.arena.push(
            NodeKind::Invoke {
                receiver,
                method,
                args,
            },
            ty,
        )
    }

    pub fn new_instance(&mut self, ctor: SymbolId, args: &[NodeId], ty: TypeId) -> NodeId {
        let args = self.arena.push_list(args);
        self.arena.push(NodeKind::New { ctor, args }, ty)
    }

    /// Nested closure creation passing `captures` to the nested lambda.
    pub fn closure(&mut self, lambda: LambdaId, captures: &[NodeId]) -> NodeId {
        let ty = self.arena.lambda(lambda).target;
        let captures = self.arena.push_list(captures);
        self.arena.push(NodeKind::Closure { lambda, captures }, ty)
    }

    pub fn cast(&mut self, target: TypeId, operand: NodeId) -> NodeId {
        self.arena.push(NodeKind::Cast { operand }, target)
    }

    pub fn instance_of(&mut self, operand: NodeId, target: TypeId) -> NodeId {
        self.arena
            .push(NodeKind::InstanceOf { operand, target }, TypeId::BOOL)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId, ty: TypeId) -> NodeId {
        self.arena.push(NodeKind::Unary { op, operand }, ty)
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId, ty: TypeId) -> NodeId {
        self.arena.push(NodeKind::Binary { op, left, right }, ty)
    }

    pub fn assign(&mut self, target: NodeId, value: NodeId) -> NodeId {
        let ty = self.arena.ty(target);
        self.arena.push(
            NodeKind::Assign {
                op: None,
                target,
                value,
            },
            ty,
        )
    }

    pub fn conditional(
        &mut self,
        cond: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
        ty: TypeId,
    ) -> NodeId {
        self.arena.push(
            NodeKind::Conditional {
                cond,
                then_branch,
                else_branch,
            },
            ty,
        )
    }

    pub fn block(&mut self, stmts: &[NodeId]) -> NodeId {
        let stmts = self.arena.push_list(stmts);
        self.arena.push(NodeKind::Block(stmts), TypeId::VOID)
    }

    /// Declare local `slot` of type `ty`; pass `NodeId::INVALID` for no
    /// initializer.
    pub fn let_local(&mut self, slot: u32, ty: TypeId, init: NodeId) -> NodeId {
        self.arena
            .push(NodeKind::Let { slot, ty, init }, TypeId::VOID)
    }

    pub fn if_stmt(&mut self, cond: NodeId, then_branch: NodeId, else_branch: NodeId) -> NodeId {
        self.arena.push(
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            },
            TypeId::VOID,
        )
    }

    pub fn while_loop(&mut self, cond: NodeId, body: NodeId) -> NodeId {
        self.arena
            .push(NodeKind::While { cond, body }, TypeId::VOID)
    }

    pub fn ret(&mut self, value: NodeId) -> NodeId {
        self.arena.push(NodeKind::Return(value), TypeId::VOID)
    }

    pub fn throw(&mut self, value: NodeId) -> NodeId {
        self.arena.push(NodeKind::Throw(value), TypeId::VOID)
    }

    /// Register a lambda over `body`.
    pub fn lambda(
        &mut self,
        owner: Name,
        target: TypeId,
        params: &[TypeId],
        captures: &[Capture],
        body: NodeId,
    ) -> LambdaId {
        self.arena
            .push_lambda(Lambda::new(owner, target, params, body).with_captures(captures))
    }
}
