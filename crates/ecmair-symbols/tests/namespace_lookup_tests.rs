//! Spec §4.2's lookup algorithm, exercised past what `namespace.rs`'s own
//! inline tests cover: the iteration budget that guards against a
//! malformed/cyclic function-scope chain, `import X = Y.Z` round-tripping,
//! and several entity kinds coexisting in one namespace's maps.

use ecmair_common::interner::Interner;
use ecmair_symbols::ids::{ClassId, InterfaceId};
use ecmair_symbols::namespace::NamespaceEntity;
use ecmair_symbols::NamespaceTable;

#[test]
fn lookup_respects_the_configured_iteration_budget() {
    let mut interner = Interner::new();
    let module = interner.intern("mod");
    let mut table = NamespaceTable::new(module);

    // Three nested function-namespaces; the name is only registered in root.
    let a = table.push_child(table.root(), interner.intern("a"), interner.intern_qualified("mod", "a"), true);
    let b = table.push_child(a, interner.intern("b"), interner.intern_qualified("mod.a", "b"), true);
    let c = table.push_child(b, interner.intern("c"), interner.intern_qualified("mod.a.b", "c"), true);

    let name = interner.intern("target");
    table.register_class(table.root(), name, ClassId(0));

    assert!(table.lookup(c, name, 100).is_some(), "budget large enough to reach root");
    assert!(table.lookup(c, name, 2).is_none(), "budget too small to ascend three levels");
}

#[test]
fn import_equals_binding_round_trips() {
    let mut interner = Interner::new();
    let module = interner.intern("mod");
    let mut table = NamespaceTable::new(module);

    let alias = interner.intern("Short");
    let target = interner.intern_qualified("mod.Deep", "Name");

    assert!(table.register_import_equals(table.root(), alias, target));
    assert_eq!(table.resolve_import_equals(table.root(), alias), Some(target));
    assert!(!table.register_import_equals(table.root(), alias, target), "duplicate alias rejected");
}

#[test]
fn distinct_entity_kinds_coexist_in_one_namespace() {
    let mut interner = Interner::new();
    let module = interner.intern("mod");
    let mut table = NamespaceTable::new(module);

    let class_name = interner.intern("Widget");
    let interface_name = interner.intern("Drawable");
    table.register_class(table.root(), class_name, ClassId(0));
    table.register_interface(table.root(), interface_name, InterfaceId(0));

    assert_eq!(table.lookup_local(table.root(), class_name), Some(NamespaceEntity::Class(ClassId(0))));
    assert_eq!(table.lookup_local(table.root(), interface_name), Some(NamespaceEntity::Interface(InterfaceId(0))));
}
