//! `InterfaceInfo` — spec §3: "(name, full name, interfaceType, fields
//! [(id, type, conditional?, vtable-index)], methods [(name, funcType,
//! conditional?, vtable-index)], extends list, type-params-with-args).
//! Layout offset recomputed on extension."

use ecmair_common::interner::Atom;
use ecmair_symbols::{InterfaceId, TypeId};

#[derive(Clone, Debug)]
pub struct InterfaceField {
    pub name: Atom,
    pub ty: TypeId,
    /// A member declared on an interface this one extends but not
    /// guaranteed to be supplied by every implementer (spec §4.5's
    /// "conditional interface member").
    pub conditional: bool,
    pub vtable_index: usize,
}

#[derive(Clone, Debug)]
pub struct InterfaceMethod {
    pub name: Atom,
    pub func_type: TypeId,
    pub conditional: bool,
    pub vtable_index: usize,
}

#[derive(Clone, Debug)]
pub struct InterfaceInfo {
    pub name: Atom,
    pub full_name: Atom,
    pub interface_type: TypeId,
    pub fields: Vec<InterfaceField>,
    pub methods: Vec<InterfaceMethod>,
    pub extends: Vec<InterfaceId>,
    pub type_params_with_args: Vec<TypeId>,
}

impl InterfaceInfo {
    pub fn new(name: Atom, full_name: Atom, interface_type: TypeId) -> Self {
        InterfaceInfo {
            name,
            full_name,
            interface_type,
            fields: Vec::new(),
            methods: Vec::new(),
            extends: Vec::new(),
            type_params_with_args: Vec::new(),
        }
    }

    /// Total vtable slot count: own fields + own methods + whatever extended
    /// interfaces contribute ahead of them. Called after `recompute_layout`.
    pub fn vtable_len(&self) -> usize {
        self.fields.len() + self.methods.len()
    }
}

pub struct InterfaceArena {
    interfaces: Vec<InterfaceInfo>,
}

impl Default for InterfaceArena {
    fn default() -> Self {
        Self::new()
    }
}

impl InterfaceArena {
    pub fn new() -> Self {
        InterfaceArena { interfaces: Vec::new() }
    }

    pub fn register(&mut self, info: InterfaceInfo) -> InterfaceId {
        let id = InterfaceId(self.interfaces.len() as u32);
        self.interfaces.push(info);
        id
    }

    pub fn get(&self, id: InterfaceId) -> &InterfaceInfo {
        &self.interfaces[id.index()]
    }

    pub fn get_mut(&mut self, id: InterfaceId) -> &mut InterfaceInfo {
        &mut self.interfaces[id.index()]
    }

    /// Recompute `vtable_index` for every field/method of `id`, prefixed by
    /// every interface it (transitively) extends, in declaration order.
    /// Spec §4.5: "Layout offset recomputed on extension."
    pub fn recompute_layout(&mut self, id: InterfaceId) {
        let mut prefix_len = 0usize;
        let extends = self.interfaces[id.index()].extends.clone();
        for ext in extends {
            self.recompute_layout(ext);
            prefix_len += self.interfaces[ext.index()].vtable_len();
        }

        let info = &mut self.interfaces[id.index()];
        let mut next = prefix_len;
        for field in &mut info.fields {
            field.vtable_index = next;
            next += 1;
        }
        for method in &mut info.methods {
            method.vtable_index = next;
            next += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecmair_common::interner::Interner;
    use ecmair_symbols::TypeId;

    #[test]
    fn extended_interface_fields_come_before_own_fields() {
        let mut interner = Interner::new();
        let mut arena = InterfaceArena::new();

        let base_name = interner.intern("Base");
        let base_full = interner.intern("mod.Base");
        let mut base = InterfaceInfo::new(base_name, base_full, TypeId(0));
        base.fields.push(InterfaceField { name: interner.intern("x"), ty: TypeId(1), conditional: false, vtable_index: 0 });
        let base_id = arena.register(base);

        let derived_name = interner.intern("Derived");
        let derived_full = interner.intern("mod.Derived");
        let mut derived = InterfaceInfo::new(derived_name, derived_full, TypeId(2));
        derived.extends.push(base_id);
        derived.fields.push(InterfaceField { name: interner.intern("y"), ty: TypeId(1), conditional: false, vtable_index: 0 });
        let derived_id = arena.register(derived);

        arena.recompute_layout(derived_id);
        assert_eq!(arena.get(derived_id).fields[0].vtable_index, 1);
        assert_eq!(arena.get(base_id).fields[0].vtable_index, 0);
    }
}
