//! Generic instantiation engine — spec §4.4. Owns the `GenericInfo`
//! arena, the specialization cache, and the fixed-point reentrancy guard
//! spec §9's Design Notes ask for ("a `HashSet<SpecializationKey>` on the
//! generic engine, push/pop around each specialization; cycles return a
//! tombstone that resolves to the generic base").

pub mod engine;
pub mod info;
pub mod unify;

pub use engine::{GenericEngine, SpecializationKey, SpecializationOutcome};
pub use info::{GenericEntityKind, GenericInfo, TypeParameter};
