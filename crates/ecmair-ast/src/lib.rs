//! AST node definitions consumed by the ecmair semantic-analysis core.
//!
//! The front-end parser is an external collaborator (spec §1's Non-goals);
//! this crate only defines the tree shape it hands us: `Node`/`NodeArena`/
//! `NodeId` independently of the scanning/parsing logic that produces them.
//!
//! Nodes live in an arena and are referenced by `NodeId`, never by pointer
//! or `Rc` — an arena-plus-typed-index is exactly the replacement spec §9's
//! Design Notes call for in place of "smart-pointer-shared ... info with
//! back-pointers".

pub mod node;
pub mod pattern;
pub mod type_node;

pub use node::{Node, NodeArena, NodeId, NodeKind};
pub use pattern::{BindingElement, BindingPattern};
pub use type_node::TypeNode;

use ecmair_common::span::Span;

/// A function/method/constructor parameter as the parser hands it to us
/// (spec §3's Function prototype: "parameter list with (name, type,
/// optional?, variadic?, initializer?, binding-pattern?)").
#[derive(Clone, Debug)]
pub struct ParamNode {
    pub pattern: BindingPattern,
    pub type_annotation: Option<NodeId>,
    pub optional: bool,
    pub variadic: bool,
    pub initializer: Option<NodeId>,
    pub span: Span,
}

/// A whole parsed compilation unit, the top-level unit this crate's
/// consumer is handed.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub arena: NodeArena,
    pub root: NodeId,
    pub file_name: String,
}

#[cfg(test)]
#[path = "../tests/node_arena_tests.rs"]
mod node_arena_tests;
