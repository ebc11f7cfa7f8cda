//! `ClassInfo` — spec §3: "(name, full name, classType, storage type, base
//! classes (ordered), implemented interfaces (each with assigned virtual
//! index), fields (static vs instance), methods (...), accessors, flags:
//! ..., type-params-with-args, fully-processed/at-evaluation, extraMembers)".

use bitflags::bitflags;
use ecmair_ast::NodeId;
use ecmair_common::interner::Atom;
use ecmair_symbols::{ClassId, FunctionId, InterfaceId, TypeId};
use smallvec::SmallVec;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ClassFlags: u16 {
        const HAS_CONSTRUCTOR        = 1 << 0;
        const HAS_STATIC_CONSTRUCTOR = 1 << 1;
        const HAS_INITIALIZERS       = 1 << 2;
        const HAS_STATIC_INITIALIZERS = 1 << 3;
        const HAS_NEW                = 1 << 4;
        const IS_ABSTRACT            = 1 << 5;
        const IS_DECLARATION         = 1 << 6;
        const HAS_VIRTUAL_TABLE      = 1 << 7;
        const HAS_RTTI               = 1 << 8;
    }
}

#[derive(Clone, Debug)]
pub struct FieldInfo {
    pub name: Atom,
    pub ty: TypeId,
    pub is_static: bool,
    /// A field promoted from a constructor parameter property (e.g.
    /// `constructor(public x: number)`), ordered after own declared fields
    /// per spec §4.5.
    pub is_ctor_promoted: bool,
    /// Only meaningful when `is_static`: the field lives in the class's
    /// vtable rather than as a plain module global (spec §4.5's vtable
    /// order: "for each static field that lives in the vtable").
    pub is_vtable_resident: bool,
}

#[derive(Clone, Debug)]
pub struct MethodInfo {
    pub name: Atom,
    pub func_type: TypeId,
    pub func_op: Option<FunctionId>,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
    /// Assigned once the class's vtable is built (spec §4.5).
    pub virtual_index: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct AccessorInfo {
    pub name: Atom,
    pub getter: Option<FunctionId>,
    pub setter: Option<FunctionId>,
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct ImplementedInterface {
    pub interface: InterfaceId,
    pub vtable_index: usize,
}

#[derive(Clone, Debug)]
pub struct ClassInfo {
    pub name: Atom,
    pub full_name: Atom,
    pub class_type: TypeId,
    pub storage_type: Option<TypeId>,
    /// Ordered; the source language has single inheritance so this holds at
    /// most one entry in practice, but spec §3 describes it as a list and
    /// layout (§4.5) iterates it positionally, so it stays list-shaped.
    /// `SmallVec` avoids a heap allocation for the common single-base (or
    /// no-base) case.
    pub bases: SmallVec<[ClassId; 1]>,
    pub implemented_interfaces: Vec<ImplementedInterface>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub accessors: Vec<AccessorInfo>,
    pub flags: ClassFlags,
    pub type_params_with_args: Vec<TypeId>,
    pub fully_processed: bool,
    /// Auto-generated AST fragments to inject (e.g. a synthesized
    /// `.instanceOf`/`..new` declaration) before re-processing.
    pub extra_members: Vec<NodeId>,
}

impl ClassInfo {
    pub fn new(name: Atom, full_name: Atom, class_type: TypeId) -> Self {
        ClassInfo {
            name,
            full_name,
            class_type,
            storage_type: None,
            bases: SmallVec::new(),
            implemented_interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            accessors: Vec::new(),
            flags: ClassFlags::empty(),
            type_params_with_args: Vec::new(),
            fully_processed: false,
            extra_members: Vec::new(),
        }
    }

    pub fn instance_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|f| !f.is_static)
    }

    pub fn static_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|f| f.is_static)
    }

    pub fn virtual_methods(&self) -> impl Iterator<Item = &MethodInfo> {
        self.methods.iter().filter(|m| m.is_virtual)
    }

    /// Module-global name for a static field (spec §4.5: "Static fields
    /// become module globals named `Class.field`").
    pub fn static_field_global_name(full_name: &str, field_name: &str) -> String {
        format!("{full_name}.{field_name}")
    }

    pub fn rtti_global_name(full_name: &str) -> String {
        format!("{full_name}..rtti")
    }

    pub fn typedescr_global_name(full_name: &str) -> String {
        format!("{full_name}..typedescr")
    }

    /// Module-global name for a class's own flat vtable (spec §4.5's
    /// vtable-order clause), stored the same `..`-prefixed way as `..rtti`
    /// and `..typedescr`.
    pub fn vtable_global_name(full_name: &str) -> String {
        format!("{full_name}..vtable")
    }

    pub fn new_static_method_name() -> &'static str {
        "..new"
    }

    pub fn instance_of_method_name() -> &'static str {
        "instanceOf"
    }
}

pub struct ClassArena {
    classes: Vec<ClassInfo>,
}

impl Default for ClassArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassArena {
    pub fn new() -> Self {
        ClassArena { classes: Vec::new() }
    }

    pub fn register(&mut self, info: ClassInfo) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(info);
        id
    }

    pub fn get(&self, id: ClassId) -> &ClassInfo {
        &self.classes[id.index()]
    }

    pub fn get_mut(&mut self, id: ClassId) -> &mut ClassInfo {
        &mut self.classes[id.index()]
    }
}
