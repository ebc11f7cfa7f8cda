//! `Builder` — spec §9 Design Notes: "Template-method builder helpers that
//! mutate ambient `rewriter`/`builder` state: use an explicit `Builder`
//! object passed by value-reference through lowering, with a scoped
//! insertion-point guard." Ops themselves live in a module-global
//! `OpArena`, parallel to `TypeArena`/`ClassArena` (spec §9: "arena + typed
//! indices").

use super::op::{Op, OpKind, Region, Value};
use ecmair_common::span::Span;
use ecmair_symbols::{OpId, TypeId};

pub struct OpArena {
    ops: Vec<Op>,
}

impl Default for OpArena {
    fn default() -> Self {
        Self::new()
    }
}

impl OpArena {
    pub fn new() -> Self {
        OpArena { ops: Vec::new() }
    }

    pub fn get(&self, id: OpId) -> &Op {
        &self.ops[id.index()]
    }

    pub fn type_of(&self, id: OpId) -> TypeId {
        self.ops[id.index()].ty
    }

    fn alloc(&mut self, op: Op) -> OpId {
        let id = OpId(self.ops.len() as u32);
        self.ops.push(op);
        id
    }
}

/// Where new ops land. A `Builder` always inserts at the end of
/// `current.last_mut()`'s region; entering a nested region (an `if`'s
/// then-arm, a loop body) pushes a fresh empty `Region` that the caller
/// later hands back to the op that owns it.
pub struct Builder<'a> {
    arena: &'a mut OpArena,
    /// Stack of in-progress regions; `[0]` is the function body itself.
    regions: Vec<Region>,
}

impl<'a> Builder<'a> {
    pub fn new(arena: &'a mut OpArena) -> Self {
        Builder { arena, regions: vec![Region::new()] }
    }

    /// Append an op to the current insertion point, returning its `Value`.
    pub fn emit(&mut self, span: Span, ty: TypeId, kind: OpKind) -> Value {
        let id = self.arena.alloc(Op { span, ty, kind });
        self.regions.last_mut().expect("Builder always has a region").push(id);
        id
    }

    pub fn type_of(&self, value: Value) -> TypeId {
        self.arena.type_of(value)
    }

    /// Enter a new nested region (e.g. an `if`'s then-arm) for the duration
    /// of `body`, returning the completed region's ops. This *is* the
    /// scoped insertion-point guard: on return (including an early `?`
    /// inside `body` via `InsertGuard::drop`), the previous insertion point
    /// is restored automatically.
    pub fn build_region<T>(&mut self, body: impl FnOnce(&mut Builder<'a>) -> T) -> (T, Region) {
        self.regions.push(Region::new());
        let result = body(self);
        let region = self.regions.pop().expect("matching push in build_region");
        (result, region)
    }

    pub fn current_region_len(&self) -> usize {
        self.regions.last().map(Vec::len).unwrap_or(0)
    }
}
