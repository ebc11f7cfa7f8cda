//! `TypeArena` — interns `TypeKind`s behind `TypeId`s. "Types are interned;
//! structural equality is defined per constructor" (spec §3): two
//! structurally-equal `TypeKind`s always resolve to the same `TypeId`, so
//! `TypeId` equality *is* type equality everywhere else in the workspace.

use crate::kind::{FloatWidth, IntWidth, TypeKind};
use ecmair_symbols::TypeId;
use rustc_hash::FxHashMap;

pub struct TypeArena {
    kinds: Vec<TypeKind>,
    lookup: FxHashMap<TypeKind, TypeId>,
    float_width: FloatWidth,

    pub void: TypeId,
    pub boolean: TypeId,
    pub number: TypeId,
    pub bigint: TypeId,
    pub string: TypeId,
    pub char: TypeId,
    pub symbol: TypeId,
    pub opaque: TypeId,
    pub any: TypeId,
    pub unknown: TypeId,
    pub never: TypeId,
    pub null: TypeId,
    pub undefined: TypeId,
    pub undef_placeholder: TypeId,
    pub error: TypeId,
    pub i32: TypeId,
}

impl TypeArena {
    pub fn new(float_width: FloatWidth) -> Self {
        let mut arena = TypeArena {
            kinds: Vec::new(),
            lookup: FxHashMap::default(),
            float_width,
            void: TypeId::NONE,
            boolean: TypeId::NONE,
            number: TypeId::NONE,
            bigint: TypeId::NONE,
            string: TypeId::NONE,
            char: TypeId::NONE,
            symbol: TypeId::NONE,
            opaque: TypeId::NONE,
            any: TypeId::NONE,
            unknown: TypeId::NONE,
            never: TypeId::NONE,
            null: TypeId::NONE,
            undefined: TypeId::NONE,
            undef_placeholder: TypeId::NONE,
            error: TypeId::NONE,
            i32: TypeId::NONE,
        };
        arena.void = arena.intern(TypeKind::Void);
        arena.boolean = arena.intern(TypeKind::Boolean);
        arena.number = arena.intern(TypeKind::Number);
        arena.bigint = arena.intern(TypeKind::BigInt);
        arena.string = arena.intern(TypeKind::String);
        arena.char = arena.intern(TypeKind::Char);
        arena.symbol = arena.intern(TypeKind::Symbol);
        arena.opaque = arena.intern(TypeKind::Opaque);
        arena.any = arena.intern(TypeKind::Any);
        arena.unknown = arena.intern(TypeKind::Unknown);
        arena.never = arena.intern(TypeKind::Never);
        arena.null = arena.intern(TypeKind::Null);
        arena.undefined = arena.intern(TypeKind::Undefined);
        arena.undef_placeholder = arena.intern(TypeKind::UndefPlaceholder);
        arena.error = arena.intern(TypeKind::Error);
        arena.i32 = arena.intern(TypeKind::Int(IntWidth::I32));
        arena
    }

    /// Width configured by `CompilerConfig::number_precision` (spec §6).
    pub fn number_width(&self) -> FloatWidth {
        self.float_width
    }

    pub fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.lookup.get(&kind) {
            return id;
        }
        let id = TypeId(self.kinds.len() as u32);
        self.lookup.insert(kind.clone(), id);
        self.kinds.push(kind);
        id
    }

    pub fn get(&self, id: TypeId) -> &TypeKind {
        &self.kinds[id.index()]
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
