//! Class storage-tuple construction — spec §4.5:
//!
//! "Field order in a class's storage tuple is: (optional leading opaque
//! `vtable` slot when the class has a virtual table) → base-class storage
//! tuples (one per direct base, by name) → own fields in declaration order
//! → constructor-parameter-promoted fields in parameter order."

use crate::class::{ClassArena, ClassFlags};
use ecmair_common::interner::Atom;
use ecmair_symbols::{ClassId, TypeId};
use ecmair_types::{TypeArena, TypeKind};

/// One instance field's absolute address, expressed as a chain of tuple
/// indices from the class's own storage-tuple root. Used both to build the
/// interface-for-class vtable's field pointers (spec §4.5: "a typed field
/// reference `&(null)->field`") and to test spec §8's "load through a `B*`
/// of a B-field is valid through a `C*`" invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: Atom,
    pub ty: TypeId,
    pub path: Vec<usize>,
}

/// Build (and cache on `ClassInfo::storage_type`) the tuple type for a
/// class's instance storage, recursing into bases first.
pub fn build_storage_tuple(classes: &mut ClassArena, types: &mut TypeArena, class: ClassId) -> TypeId {
    if let Some(cached) = classes.get(class).storage_type {
        tracing::trace!(class = class.index(), "build_storage_tuple: cache hit");
        return cached;
    }

    let info = classes.get(class).clone();
    let mut elems = Vec::new();

    if info.flags.contains(ClassFlags::HAS_VIRTUAL_TABLE) {
        elems.push(types.opaque);
    }
    for &base in &info.bases {
        elems.push(build_storage_tuple(classes, types, base));
    }
    for field in info.fields.iter().filter(|f| !f.is_static && !f.is_ctor_promoted) {
        elems.push(field.ty);
    }
    for field in info.fields.iter().filter(|f| !f.is_static && f.is_ctor_promoted) {
        elems.push(field.ty);
    }

    let tuple = types.intern(TypeKind::Tuple(elems));
    classes.get_mut(class).storage_type = Some(tuple);
    tracing::debug!(class = class.index(), elem_count = elems_len(tuple, types), "build_storage_tuple: built");
    tuple
}

fn elems_len(tuple: TypeId, types: &TypeArena) -> usize {
    match types.get(tuple) {
        TypeKind::Tuple(elems) => elems.len(),
        _ => 0,
    }
}

/// Flatten a class's storage into absolute field addresses, recursing
/// through base-class sub-tuples. The vtable slot (if present) is not a
/// named field and is skipped.
pub fn flatten_fields(classes: &ClassArena, class: ClassId) -> Vec<FieldLayout> {
    flatten_fields_from(classes, class, Vec::new())
}

fn flatten_fields_from(classes: &ClassArena, class: ClassId, prefix: Vec<usize>) -> Vec<FieldLayout> {
    let info = classes.get(class);
    let mut out = Vec::new();
    let mut index = if info.flags.contains(ClassFlags::HAS_VIRTUAL_TABLE) { 1 } else { 0 };

    for &base in &info.bases {
        let mut base_prefix = prefix.clone();
        base_prefix.push(index);
        out.extend(flatten_fields_from(classes, base, base_prefix));
        index += 1;
    }

    for field in info.fields.iter().filter(|f| !f.is_static && !f.is_ctor_promoted) {
        let mut path = prefix.clone();
        path.push(index);
        out.push(FieldLayout { name: field.name, ty: field.ty, path });
        index += 1;
    }
    for field in info.fields.iter().filter(|f| !f.is_static && f.is_ctor_promoted) {
        let mut path = prefix.clone();
        path.push(index);
        out.push(FieldLayout { name: field.name, ty: field.ty, path });
        index += 1;
    }

    out
}
