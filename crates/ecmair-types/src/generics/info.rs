//! `GenericInfo` — spec §3's "Generic info (function/class/interface/
//! type-alias)": "(name, typeParams [(name, constraint?, default?)], AST
//! node, owning namespace, optional discovered funcType)".

use ecmair_ast::NodeId;
use ecmair_common::interner::Atom;
use ecmair_symbols::{ClassId, FunctionId, InterfaceId, NamespaceId, TypeAliasId, TypeId};

#[derive(Clone, Debug)]
pub struct TypeParameter {
    pub name: Atom,
    pub constraint: Option<TypeId>,
    pub default: Option<TypeId>,
}

/// Which kind of declaration this generic info describes. A generic is
/// never emitted itself (spec §3); only a `(GenericInfo, type args)`
/// specialization produces something the IR builder can reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenericEntityKind {
    Function(FunctionId),
    Class(ClassId),
    Interface(InterfaceId),
    TypeAlias(TypeAliasId),
}

#[derive(Clone, Debug)]
pub struct GenericInfo {
    pub name: Atom,
    pub type_params: Vec<TypeParameter>,
    pub declaration: NodeId,
    pub owning_namespace: NamespaceId,
    pub kind: GenericEntityKind,
    /// Populated once the engine has inferred/checked the entity's own
    /// type once (e.g. a generic function's un-substituted signature,
    /// used as the template unification walks).
    pub discovered_type: Option<TypeId>,
}

impl GenericInfo {
    pub fn new(
        name: Atom,
        type_params: Vec<TypeParameter>,
        declaration: NodeId,
        owning_namespace: NamespaceId,
        kind: GenericEntityKind,
    ) -> Self {
        GenericInfo { name, type_params, declaration, owning_namespace, kind, discovered_type: None }
    }

    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    /// First type parameter index with no explicit argument and no
    /// default, starting from `from`. Used by the explicit-argument zip
    /// (spec §4.4 step 1) to decide whether defaults can fill the rest.
    pub fn first_param_without_default(&self, from: usize) -> Option<usize> {
        self.type_params[from..].iter().position(|p| p.default.is_none()).map(|i| i + from)
    }
}
