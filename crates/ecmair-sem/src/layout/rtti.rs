//! RTTI plan — spec §4.5:
//!
//! "Each class with `HAS_RTTI` gets a `Class..rtti` static string global
//! holding the class's full name, a synthesized virtual
//! `.instanceOf(rtti: string): bool` method (`this..rtti === rtti ||
//! super.instanceOf(rtti)`, or just the identity comparison for a class with
//! no base), and a synthesized static `Class..new` method that allocates the
//! instance, initializes its vtable pointer(s), and returns it."

use crate::class::{ClassArena, ClassFlags};
use ecmair_common::interner::Interner;
use ecmair_symbols::ClassId;

/// What `..rtti`, `.instanceOf` and `..new` resolve to for a class, handed
/// to the lowering pass to synthesize the corresponding IR bodies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RttiPlan {
    pub rtti_global_name: String,
    pub rtti_string_value: String,
    pub instance_of_method_name: &'static str,
    /// `None` for a root class: its `.instanceOf` body is just the identity
    /// comparison against `this..rtti`. `Some(base)` means the synthesized
    /// body falls through to `super.instanceOf(rtti)` on mismatch.
    pub super_instance_of: Option<ClassId>,
    pub new_static_method_name: &'static str,
}

pub fn build_rtti_plan(classes: &ClassArena, interner: &Interner, class: ClassId) -> Option<RttiPlan> {
    let info = classes.get(class);
    if !info.flags.contains(ClassFlags::HAS_RTTI) {
        tracing::trace!(class = class.index(), "build_rtti_plan: no HAS_RTTI flag, skipping");
        return None;
    }

    let full_name = interner.resolve(info.full_name).to_string();
    tracing::debug!(class = class.index(), %full_name, has_super = info.bases.first().is_some(), "build_rtti_plan: built");
    Some(RttiPlan {
        rtti_global_name: crate::class::ClassInfo::rtti_global_name(&full_name),
        rtti_string_value: full_name,
        instance_of_method_name: crate::class::ClassInfo::instance_of_method_name(),
        super_instance_of: info.bases.first().copied(),
        new_static_method_name: crate::class::ClassInfo::new_static_method_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassInfo;
    use ecmair_common::interner::Interner;
    use ecmair_symbols::TypeId;

    #[test]
    fn root_class_rtti_plan_has_no_super_instance_of() {
        let mut interner = Interner::new();
        let mut classes = ClassArena::new();
        let name = interner.intern("A");
        let mut info = ClassInfo::new(name, name, TypeId(0));
        info.flags |= ClassFlags::HAS_RTTI;
        let id = classes.register(info);

        let plan = build_rtti_plan(&classes, &interner, id).expect("rtti plan expected");
        assert!(plan.super_instance_of.is_none());
        assert_eq!(plan.rtti_global_name, "A..rtti");
    }

    #[test]
    fn class_without_rtti_flag_has_no_plan() {
        let mut interner = Interner::new();
        let mut classes = ClassArena::new();
        let name = interner.intern("A");
        let info = ClassInfo::new(name, name, TypeId(0));
        let id = classes.register(info);
        assert!(build_rtti_plan(&classes, &interner, id).is_none());
    }

    #[test]
    fn derived_class_rtti_plan_chains_to_base() {
        let mut interner = Interner::new();
        let mut classes = ClassArena::new();
        let a_name = interner.intern("A");
        let mut a = ClassInfo::new(a_name, a_name, TypeId(0));
        a.flags |= ClassFlags::HAS_RTTI;
        let a_id = classes.register(a);

        let b_name = interner.intern("B");
        let mut b = ClassInfo::new(b_name, b_name, TypeId(1));
        b.flags |= ClassFlags::HAS_RTTI;
        b.bases.push(a_id);
        let b_id = classes.register(b);

        let plan = build_rtti_plan(&classes, &interner, b_id).unwrap();
        assert_eq!(plan.super_instance_of, Some(a_id));
    }
}
