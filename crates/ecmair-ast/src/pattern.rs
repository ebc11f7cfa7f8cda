//! Binding patterns for destructuring variable declarations and parameters
//! (spec §3's "optional array/object binding pattern").

use crate::node::NodeId;
use ecmair_common::interner::Atom;

#[derive(Clone, Debug)]
pub enum BindingPattern {
    Identifier(Atom),
    Array(Vec<BindingElement>),
    Object(Vec<BindingElement>),
}

#[derive(Clone, Debug)]
pub struct BindingElement {
    /// For object patterns, the source property key being destructured
    /// (`None` for array patterns, where position is the key).
    pub property_key: Option<Atom>,
    pub pattern: BindingPattern,
    pub default_initializer: Option<NodeId>,
    pub rest: bool,
}
