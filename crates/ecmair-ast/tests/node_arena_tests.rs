//! Spec §6: "Each node carries source range (pos, end)." Exercises the
//! arena's alloc/get roundtrip and binding-pattern construction, the two
//! pieces a binder built on this crate leans on most.

use ecmair_ast::pattern::{BindingElement, BindingPattern};
use ecmair_ast::{NodeArena, NodeId, NodeKind};
use ecmair_common::interner::{Atom, Interner};
use ecmair_common::span::Span;

#[test]
fn allocated_nodes_keep_their_span_and_kind() {
    let mut arena = NodeArena::new();
    let id = arena.alloc(Span::new(10, 20), NodeKind::NumberLiteral(1.0));

    assert_eq!(arena.span(id), Span::new(10, 20));
    assert!(matches!(arena.kind(id), NodeKind::NumberLiteral(v) if *v == 1.0));
}

#[test]
fn node_ids_are_assigned_in_allocation_order() {
    let mut arena = NodeArena::new();
    let first = arena.alloc(Span::at(0), NodeKind::BooleanLiteral(true));
    let second = arena.alloc(Span::at(1), NodeKind::BooleanLiteral(false));

    assert_eq!(first, NodeId(0));
    assert_eq!(second, NodeId(1));
    assert_eq!(arena.len(), 2);
}

#[test]
fn object_destructuring_pattern_carries_one_element_per_property() {
    let mut interner = Interner::new();
    let x: Atom = interner.intern("x");
    let y: Atom = interner.intern("y");

    let pattern = BindingPattern::Object(vec![
        BindingElement { property_key: Some(x), pattern: BindingPattern::Identifier(x), default_initializer: None, rest: false },
        BindingElement { property_key: Some(y), pattern: BindingPattern::Identifier(y), default_initializer: None, rest: true },
    ]);

    match pattern {
        BindingPattern::Object(elements) => {
            assert_eq!(elements.len(), 2);
            assert!(elements[1].rest);
        }
        _ => panic!("expected an object pattern"),
    }
}
