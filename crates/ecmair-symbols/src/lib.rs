//! Namespace tree and symbol table for the ecmair semantic-analysis core.
//!
//! This crate also owns every opaque arena index used across the
//! workspace (`TypeId`, `ClassId`, `InterfaceId`, ...). Spec §9's Design
//! Notes call for "arena + typed indices" in place of "smart-pointer-shared
//! class/interface info with back-pointers to AST and owning namespace";
//! centralizing the index types here (rather than letting each arena crate
//! mint its own) is what lets `ecmair-types`, `ecmair-sem` and
//! `ecmair-lower` reference each other's arenas without a dependency
//! cycle — they all depend on this crate, never on each other's owning
//! crate for the index alone.

pub mod ids;
pub mod namespace;
pub mod scope;
pub mod symbol;

pub use ids::{
    ClassId, EnumId, FunctionId, GenericId, GlobalId, InterfaceId, NamespaceId, OpId, SymbolId,
    TypeAliasId, TypeId,
};
pub use namespace::{Namespace, NamespaceTable};
pub use scope::ScopeStack;
pub use symbol::{SymbolEntry, SymbolKind, SymbolTable};

#[cfg(test)]
#[path = "../tests/namespace_lookup_tests.rs"]
mod namespace_lookup_tests;
