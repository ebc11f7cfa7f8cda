//! Type system and generic instantiation engine — spec §3 (Type sum,
//! Generic info) and §4.1/§4.4 (type construction, instantiation).
//!
//! `TypeArena` interns every `TypeKind` behind a `TypeId`; everything else
//! in this crate is either a pure function over the arena (`construct`) or
//! a stateful pass that consults it (`generics::GenericEngine`).

pub mod arena;
pub mod construct;
pub mod generics;
pub mod kind;

pub use arena::TypeArena;
pub use construct::{intersection, is_subtype, optional, union, union_default, widen, UnionOptions};
pub use generics::{GenericEngine, GenericEntityKind, GenericInfo, SpecializationKey, SpecializationOutcome, TypeParameter};
pub use kind::{FloatWidth, FunctionSignature, IntWidth, LiteralValue, ParamType, TypeKind};

pub use ecmair_symbols::TypeId;

#[cfg(test)]
#[path = "../tests/union_idempotence_tests.rs"]
mod union_idempotence_tests;
