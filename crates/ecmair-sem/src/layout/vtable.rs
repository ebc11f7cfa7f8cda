//! Virtual table construction — spec §4.5:
//!
//! "Virtual table order: (for each implemented interface, a pointer to that
//! interface's vtable specialised for this class) → (for each static field
//! that lives in the vtable) → (for each virtual method in declaration
//! order; abstract methods occupy a slot but have no symbol). Every
//! subclass keeps the parent's vtable prefix intact and appends its own
//! entries, enabling base-compatible pointer dispatch."
//!
//! "Interface vtable for a class: an ordered tuple where each entry is
//! either a typed field reference (`&(null)->field`, so interface field
//! access lowers to `load(base + offset)`) or a function symbol. A
//! conditional interface member that the class does not supply is encoded
//! as the literal integer `-1` bit-casted to a field pointer; loads through
//! such a slot are guarded by a null test."

use super::storage::{flatten_fields, FieldLayout};
use crate::class::{ClassArena, FieldInfo, MethodInfo};
use crate::interface::InterfaceArena;
use ecmair_common::interner::Atom;
use ecmair_symbols::{ClassId, FunctionId, InterfaceId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VtableEntry {
    /// A pointer to `interface`'s vtable specialized for this class.
    InterfaceVtablePointer(InterfaceId),
    /// A static field that, per spec, "lives in the vtable".
    StaticFieldSlot { name: Atom },
    /// A virtual method slot. `None` for an abstract method: "abstract
    /// methods occupy a slot but have no symbol".
    Method { name: Atom, func: Option<FunctionId> },
}

/// Build the full vtable for `class`, prefixed by the parent's vtable so a
/// base-typed pointer's vtable-relative offsets stay valid on a derived
/// instance (spec §8: "any load through a `B*` ... is valid through a
/// `C*`").
pub fn build_vtable(classes: &ClassArena, class: ClassId) -> Vec<VtableEntry> {
    let info = classes.get(class);
    let mut entries = Vec::new();

    if let Some(&base) = info.bases.first() {
        entries.extend(build_vtable(classes, base));
    }

    for iface in &info.implemented_interfaces {
        entries.push(VtableEntry::InterfaceVtablePointer(iface.interface));
    }

    for field in vtable_resident_static_fields(info) {
        entries.push(VtableEntry::StaticFieldSlot { name: field.name });
    }

    for method in info.virtual_methods() {
        entries.push(VtableEntry::Method { name: method.name, func: method.func_op });
    }

    tracing::debug!(class = class.index(), entry_count = entries.len(), "build_vtable: built");
    entries
}

/// Static fields explicitly marked to live in the vtable (a rare pattern —
/// most static fields are plain module globals per spec §4.5's first
/// paragraph).
fn vtable_resident_static_fields(info: &crate::class::ClassInfo) -> impl Iterator<Item = &FieldInfo> {
    info.static_fields().filter(|f| f.is_vtable_resident)
}

/// Project `interface`'s members onto `class`'s concrete layout: each field
/// becomes a typed address (`&(null)->field`) inside `class`'s storage, and
/// each method becomes the class's own override (or `None`, encoded by the
/// caller as the `-1` sentinel, when the member is conditional and
/// unsupplied).
pub fn build_interface_vtable_for_class(
    classes: &ClassArena,
    interfaces: &InterfaceArena,
    class: ClassId,
    interface: InterfaceId,
) -> Vec<InterfaceVtableSlot> {
    let iface = interfaces.get(interface);
    let class_fields = flatten_fields(classes, class);
    let class_info = classes.get(class);

    let mut slots = vec![InterfaceVtableSlot::Unsupplied; iface.vtable_len()];

    for field in &iface.fields {
        if let Some(layout) = find_field(&class_fields, field.name) {
            slots[field.vtable_index] = InterfaceVtableSlot::Field(layout.clone());
        }
    }
    for method in &iface.methods {
        if let Some(m) = class_info.methods.iter().find(|m| m.name == method.name) {
            slots[method.vtable_index] = InterfaceVtableSlot::Method(m.clone());
        }
    }

    slots
}

#[derive(Clone, Debug)]
pub enum InterfaceVtableSlot {
    Field(FieldLayout),
    Method(MethodInfo),
    /// The `-1`-bitcast sentinel for a conditional member the class does
    /// not supply.
    Unsupplied,
}

fn find_field(fields: &[FieldLayout], name: Atom) -> Option<&FieldLayout> {
    fields.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassFlags, ClassInfo, ImplementedInterface};
    use crate::interface::{InterfaceField, InterfaceInfo};
    use ecmair_common::interner::Interner;
    use ecmair_symbols::TypeId;

    #[test]
    fn subclass_vtable_keeps_base_prefix_intact() {
        let mut interner = Interner::new();
        let mut classes = ClassArena::new();

        let a_name = interner.intern("A");
        let mut a = ClassInfo::new(a_name, a_name, TypeId(0));
        a.flags |= ClassFlags::HAS_VIRTUAL_TABLE;
        let m_name = interner.intern("m");
        a.methods.push(MethodInfo { name: m_name, func_type: TypeId(1), func_op: Some(FunctionId(0)), is_static: false, is_virtual: true, is_abstract: false, virtual_index: None });
        let a_id = classes.register(a);

        let b_name = interner.intern("B");
        let mut b = ClassInfo::new(b_name, b_name, TypeId(2));
        b.flags |= ClassFlags::HAS_VIRTUAL_TABLE;
        b.bases.push(a_id);
        let n_name = interner.intern("n");
        b.methods.push(MethodInfo { name: n_name, func_type: TypeId(3), func_op: Some(FunctionId(1)), is_static: false, is_virtual: true, is_abstract: false, virtual_index: None });
        let b_id = classes.register(b);

        let vt = build_vtable(&classes, b_id);
        assert_eq!(vt.len(), 2);
        assert_eq!(vt[0], VtableEntry::Method { name: m_name, func: Some(FunctionId(0)) });
        assert_eq!(vt[1], VtableEntry::Method { name: n_name, func: Some(FunctionId(1)) });
    }

    #[test]
    fn vtable_resident_static_field_gets_a_slot_between_interfaces_and_methods() {
        let mut interner = Interner::new();
        let mut classes = ClassArena::new();
        let mut interfaces = InterfaceArena::new();

        let i_name = interner.intern("I");
        let iface = InterfaceInfo::new(i_name, i_name, TypeId(0));
        let iface_id = interfaces.register(iface);

        let c_name = interner.intern("C");
        let mut c = ClassInfo::new(c_name, c_name, TypeId(1));
        c.flags |= ClassFlags::HAS_VIRTUAL_TABLE;
        c.implemented_interfaces.push(ImplementedInterface { interface: iface_id, vtable_index: 0 });
        let slot_name = interner.intern("INSTANCE");
        c.fields.push(FieldInfo { name: slot_name, ty: TypeId(2), is_static: true, is_ctor_promoted: false, is_vtable_resident: true });
        let ordinary_static = interner.intern("COUNT");
        c.fields.push(FieldInfo { name: ordinary_static, ty: TypeId(2), is_static: true, is_ctor_promoted: false, is_vtable_resident: false });
        let m_name = interner.intern("m");
        c.methods.push(MethodInfo { name: m_name, func_type: TypeId(3), func_op: Some(FunctionId(0)), is_static: false, is_virtual: true, is_abstract: false, virtual_index: None });
        let c_id = classes.register(c);

        let vt = build_vtable(&classes, c_id);
        assert_eq!(
            vt,
            vec![
                VtableEntry::InterfaceVtablePointer(iface_id),
                VtableEntry::StaticFieldSlot { name: slot_name },
                VtableEntry::Method { name: m_name, func: Some(FunctionId(0)) },
            ]
        );
    }

    #[test]
    fn interface_vtable_projects_class_field_address() {
        let mut interner = Interner::new();
        let mut classes = ClassArena::new();
        let mut interfaces = InterfaceArena::new();

        let x_name = interner.intern("x");
        let i_name = interner.intern("I");
        let mut iface = InterfaceInfo::new(i_name, i_name, TypeId(0));
        iface.fields.push(InterfaceField { name: x_name, ty: TypeId(1), conditional: false, vtable_index: 0 });
        let iface_id = interfaces.register(iface);

        let c_name = interner.intern("C");
        let mut c = ClassInfo::new(c_name, c_name, TypeId(2));
        c.implemented_interfaces.push(ImplementedInterface { interface: iface_id, vtable_index: 0 });
        c.fields.push(FieldInfo { name: x_name, ty: TypeId(1), is_static: false, is_ctor_promoted: false, is_vtable_resident: false });
        let c_id = classes.register(c);

        let slots = build_interface_vtable_for_class(&classes, &interfaces, c_id, iface_id);
        match &slots[0] {
            InterfaceVtableSlot::Field(layout) => assert_eq!(layout.name, x_name),
            other => panic!("expected a field slot, got {other:?}"),
        }
    }

    #[test]
    fn conditional_member_not_supplied_is_unsupplied_slot() {
        let mut interner = Interner::new();
        let mut classes = ClassArena::new();
        let mut interfaces = InterfaceArena::new();

        let y_name = interner.intern("y");
        let i_name = interner.intern("I");
        let mut iface = InterfaceInfo::new(i_name, i_name, TypeId(0));
        iface.fields.push(InterfaceField { name: y_name, ty: TypeId(1), conditional: true, vtable_index: 0 });
        let iface_id = interfaces.register(iface);

        let c_name = interner.intern("C");
        let c = ClassInfo::new(c_name, c_name, TypeId(2));
        let c_id = classes.register(c);

        let slots = build_interface_vtable_for_class(&classes, &interfaces, c_id, iface_id);
        assert!(matches!(slots[0], InterfaceVtableSlot::Unsupplied));
    }
}
