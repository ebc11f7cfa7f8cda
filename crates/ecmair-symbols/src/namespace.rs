//! Namespace tree — spec §3's Namespace data model and §4.2's lookup
//! algorithm.

use crate::ids::{
    ClassId, EnumId, FunctionId, GenericId, InterfaceId, NamespaceId, TypeAliasId,
};
use ecmair_common::interner::Atom;
use rustc_hash::FxHashMap;

/// One node of the namespace tree: a module, a class body, a function
/// body, or the module root. Spec §3: "(short name, fully-qualified name,
/// parent, is-function-scope, maps for: nested namespaces, function types,
/// function ops, generic functions, globals, classes, generic classes,
/// interfaces, generic interfaces, enums, type aliases, generic type
/// aliases, import-equals)".
pub struct Namespace {
    pub short_name: Atom,
    pub full_name: Atom,
    pub parent: Option<NamespaceId>,
    /// Function bodies push a function-namespace whose lookup transparently
    /// falls through to the parent chain (spec §4.2).
    pub is_function_scope: bool,

    nested: FxHashMap<Atom, NamespaceId>,
    functions: FxHashMap<Atom, FunctionId>,
    generic_functions: FxHashMap<Atom, GenericId>,
    globals: FxHashMap<Atom, crate::ids::GlobalId>,
    classes: FxHashMap<Atom, ClassId>,
    generic_classes: FxHashMap<Atom, GenericId>,
    interfaces: FxHashMap<Atom, InterfaceId>,
    generic_interfaces: FxHashMap<Atom, GenericId>,
    enums: FxHashMap<Atom, EnumId>,
    type_aliases: FxHashMap<Atom, TypeAliasId>,
    generic_type_aliases: FxHashMap<Atom, GenericId>,
    /// `import X = Y.Z` bindings: alias short name -> target full name.
    import_equals: FxHashMap<Atom, Atom>,
}

impl Namespace {
    fn new(short_name: Atom, full_name: Atom, parent: Option<NamespaceId>, is_function_scope: bool) -> Self {
        Namespace {
            short_name,
            full_name,
            parent,
            is_function_scope,
            nested: FxHashMap::default(),
            functions: FxHashMap::default(),
            generic_functions: FxHashMap::default(),
            globals: FxHashMap::default(),
            classes: FxHashMap::default(),
            generic_classes: FxHashMap::default(),
            interfaces: FxHashMap::default(),
            generic_interfaces: FxHashMap::default(),
            enums: FxHashMap::default(),
            type_aliases: FxHashMap::default(),
            generic_type_aliases: FxHashMap::default(),
            import_equals: FxHashMap::default(),
        }
    }
}

/// What `NamespaceTable::lookup` can find inside a single namespace's maps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NamespaceEntity {
    Namespace(NamespaceId),
    Function(FunctionId),
    GenericFunction(GenericId),
    Global(crate::ids::GlobalId),
    Class(ClassId),
    GenericClass(GenericId),
    Interface(InterfaceId),
    GenericInterface(GenericId),
    Enum(EnumId),
    TypeAlias(TypeAliasId),
    GenericTypeAlias(GenericId),
}

macro_rules! registrar {
    ($register_fn:ident, $lookup_fn:ident, $map:ident, $id_ty:ty, $variant:ident) => {
        pub fn $register_fn(&mut self, ns: NamespaceId, name: Atom, id: $id_ty) -> bool {
            let ns = &mut self.namespaces[ns.index()];
            if ns.$map.contains_key(&name) {
                return false;
            }
            ns.$map.insert(name, id);
            true
        }

        pub fn $lookup_fn(&self, ns: NamespaceId, name: Atom) -> Option<$id_ty> {
            self.namespaces[ns.index()].$map.get(&name).copied()
        }
    };
}

/// Owns every `Namespace` in the module, indexed by `NamespaceId`. The
/// root is created at module init (spec §3).
pub struct NamespaceTable {
    namespaces: Vec<Namespace>,
    root: NamespaceId,
}

impl NamespaceTable {
    pub fn new(module_name: Atom) -> Self {
        let root = Namespace::new(module_name, module_name, None, false);
        NamespaceTable { namespaces: vec![root], root: NamespaceId(0) }
    }

    pub fn root(&self) -> NamespaceId {
        self.root
    }

    pub fn get(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.index()]
    }

    /// Push a nested namespace (module body, class body, or a
    /// function-namespace) under `parent`, interning its full name as
    /// `parent.short` (spec §4.2's invariant: "every entity has a short
    /// name bound inside its owning namespace and a full name
    /// `parent.short`").
    pub fn push_child(
        &mut self,
        parent: NamespaceId,
        short_name: Atom,
        full_name: Atom,
        is_function_scope: bool,
    ) -> NamespaceId {
        let id = NamespaceId(self.namespaces.len() as u32);
        self.namespaces.push(Namespace::new(short_name, full_name, Some(parent), is_function_scope));
        self.namespaces[parent.index()].nested.insert(short_name, id);
        id
    }

    /// spec §4.2: "`lookup(name)` walks the current scope chain; if the
    /// current namespace is a function-namespace and the name is not
    /// present, it ascends to the parent namespace and repeats until a
    /// non-function-namespace is reached or the name is found."
    pub fn lookup(&self, start: NamespaceId, name: Atom, max_iterations: usize) -> Option<(NamespaceId, NamespaceEntity)> {
        let mut current = start;
        for _ in 0..max_iterations {
            let ns = &self.namespaces[current.index()];
            if let Some(found) = self.lookup_local(current, name) {
                return Some((current, found));
            }
            if ns.is_function_scope {
                match ns.parent {
                    Some(parent) => current = parent,
                    None => return None,
                }
            } else {
                return None;
            }
        }
        None
    }

    /// Look inside exactly one namespace's maps, without ascending.
    pub fn lookup_local(&self, ns: NamespaceId, name: Atom) -> Option<NamespaceEntity> {
        let n = &self.namespaces[ns.index()];
        if let Some(&id) = n.nested.get(&name) {
            return Some(NamespaceEntity::Namespace(id));
        }
        if let Some(&id) = n.functions.get(&name) {
            return Some(NamespaceEntity::Function(id));
        }
        if let Some(&id) = n.generic_functions.get(&name) {
            return Some(NamespaceEntity::GenericFunction(id));
        }
        if let Some(&id) = n.globals.get(&name) {
            return Some(NamespaceEntity::Global(id));
        }
        if let Some(&id) = n.classes.get(&name) {
            return Some(NamespaceEntity::Class(id));
        }
        if let Some(&id) = n.generic_classes.get(&name) {
            return Some(NamespaceEntity::GenericClass(id));
        }
        if let Some(&id) = n.interfaces.get(&name) {
            return Some(NamespaceEntity::Interface(id));
        }
        if let Some(&id) = n.generic_interfaces.get(&name) {
            return Some(NamespaceEntity::GenericInterface(id));
        }
        if let Some(&id) = n.enums.get(&name) {
            return Some(NamespaceEntity::Enum(id));
        }
        if let Some(&id) = n.type_aliases.get(&name) {
            return Some(NamespaceEntity::TypeAlias(id));
        }
        if let Some(&id) = n.generic_type_aliases.get(&name) {
            return Some(NamespaceEntity::GenericTypeAlias(id));
        }
        None
    }

    pub fn register_import_equals(&mut self, ns: NamespaceId, alias: Atom, target_full_name: Atom) -> bool {
        let n = &mut self.namespaces[ns.index()];
        if n.import_equals.contains_key(&alias) {
            return false;
        }
        n.import_equals.insert(alias, target_full_name);
        true
    }

    pub fn resolve_import_equals(&self, ns: NamespaceId, alias: Atom) -> Option<Atom> {
        self.namespaces[ns.index()].import_equals.get(&alias).copied()
    }

    registrar!(register_function, lookup_function, functions, FunctionId, Function);
    registrar!(register_generic_function, lookup_generic_function, generic_functions, GenericId, GenericFunction);
    registrar!(register_global, lookup_global, globals, crate::ids::GlobalId, Global);
    registrar!(register_class, lookup_class, classes, ClassId, Class);
    registrar!(register_generic_class, lookup_generic_class, generic_classes, GenericId, GenericClass);
    registrar!(register_interface, lookup_interface, interfaces, InterfaceId, Interface);
    registrar!(register_generic_interface, lookup_generic_interface, generic_interfaces, GenericId, GenericInterface);
    registrar!(register_enum, lookup_enum, enums, EnumId, Enum);
    registrar!(register_type_alias, lookup_type_alias, type_aliases, TypeAliasId, TypeAlias);
    registrar!(register_generic_type_alias, lookup_generic_type_alias, generic_type_aliases, GenericId, GenericTypeAlias);
}
