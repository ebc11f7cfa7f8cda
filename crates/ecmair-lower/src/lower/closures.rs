//! Bridges `ecmair_sem::capture`'s dummy-run discovery pass into the real
//! lowering builder — spec §4.6: "the prototype is rewritten to prepend
//! one parameter holding a pointer to a capture tuple"; at every site that
//! referenced a captured variable by its original symbol, the reference is
//! replaced with a lookup through `this..captured`; an outer reference to
//! the closure itself becomes `create-bound-function(capture, funcSymbol)`.

use crate::ir::{Builder, OpKind, Value};
use ecmair_common::span::Span;
use ecmair_sem::{CapturedVariable, FunctionPrototype, PassResult};
use ecmair_symbols::{FunctionId, TypeId};

/// Apply a finished capture-discovery pass's result to a function's
/// prototype, per spec §4.6. Returns the capture-tuple parameter's `TypeId`
/// so the caller can build the tuple type (a `Tuple` of each captured
/// variable's type, `Ref` for by-reference captures) before calling this.
pub fn rewrite_prototype_for_captures(
    proto: &mut FunctionPrototype,
    capture_param_type: TypeId,
    captured_param_name: ecmair_common::interner::Atom,
    pass: &PassResult,
) {
    if pass.captured.is_empty() {
        return;
    }
    proto.prepend_capture_param(capture_param_type, captured_param_name);
}

/// Build the capture-tuple's element types in discovery order: a captured
/// variable taken by reference contributes `ref(T)`, one taken by value
/// contributes `T` directly (spec §4.6's by-reference/by-value split,
/// driven by whether the variable is ever reassigned after being captured).
pub fn capture_tuple_element_types(
    types: &mut ecmair_types::TypeArena,
    captured: &[CapturedVariable],
) -> Vec<TypeId> {
    captured
        .iter()
        .map(|c| if c.by_reference { types.intern(ecmair_types::TypeKind::Ref(c.ty)) } else { c.ty })
        .collect()
}

/// Emit the real pass's prologue: unpack each captured variable out of the
/// prepended `.captured` parameter, in the same order the tuple was built,
/// so later body ops can reference these unpacked values instead of the
/// (no-longer-valid, now-cross-function) original `symbol-ref`.
pub fn emit_capture_unpacking(
    builder: &mut Builder,
    span: Span,
    captured_param: Value,
    captured: &[CapturedVariable],
) -> Vec<Value> {
    captured
        .iter()
        .enumerate()
        .map(|(index, c)| {
            let field_ref = builder.emit(span, c.ty, OpKind::PointerOffsetRef { base: captured_param, offset_path: vec![index] });
            builder.emit(span, c.ty, OpKind::Load(field_ref))
        })
        .collect()
}

/// At the definition site of a closure that has captures, replace the
/// plain `symbol-ref(func)` that would otherwise be emitted with
/// `create-bound-function(capture, func)` — spec §4.6: "an outer reference
/// to the closure itself becomes `create-bound-function(capture,
/// funcSymbol)`."
pub fn lower_closure_reference(
    builder: &mut Builder,
    span: Span,
    closure_ty: TypeId,
    func: FunctionId,
    capture_values: &[Value],
) -> Value {
    let func_ref = builder.emit(span, closure_ty, OpKind::SymbolRef(func));
    let capture = builder.emit(span, closure_ty, OpKind::Capture(capture_values.to_vec()));
    builder.emit(span, closure_ty, OpKind::CreateBoundFunction { this: capture, func: func_ref })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::OpArena;
    use ecmair_common::interner::Interner;
    use ecmair_sem::{CaptureDiscovery, RegionTree};
    use ecmair_types::{FloatWidth, TypeArena, TypeKind};

    #[test]
    fn capture_tuple_mixes_value_and_reference_elements() {
        let mut types = TypeArena::new(FloatWidth::F64);
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let y = interner.intern("y");
        let captured = vec![
            CapturedVariable { symbol: ecmair_symbols::SymbolId(0), name: x, ty: types.number, by_reference: false },
            CapturedVariable { symbol: ecmair_symbols::SymbolId(1), name: y, ty: types.string, by_reference: true },
        ];

        let element_types = capture_tuple_element_types(&mut types, &captured);
        assert_eq!(element_types[0], types.number);
        assert_eq!(element_types[1], types.intern(TypeKind::Ref(types.string)));
    }

    #[test]
    fn unpacking_emits_one_field_ref_and_load_per_captured_variable() {
        let mut arena = OpArena::new();
        let mut builder = Builder::new(&mut arena);
        let types = TypeArena::new(FloatWidth::F64);
        let mut interner = Interner::new();
        let x = interner.intern("x");

        let captured_param = builder.emit(Span::at(0), types.number, OpKind::Param { index: 0, captured: false });
        let captured = vec![CapturedVariable { symbol: ecmair_symbols::SymbolId(0), name: x, ty: types.number, by_reference: false }];

        let before = builder.current_region_len();
        let unpacked = emit_capture_unpacking(&mut builder, Span::at(1), captured_param, &captured);
        let after = builder.current_region_len();

        assert_eq!(unpacked.len(), 1);
        assert_eq!(after - before, 2);
    }

    #[test]
    fn prototype_rewrite_is_a_no_op_without_captures() {
        let mut interner = Interner::new();
        let name = interner.intern("f");
        let captured_name = interner.intern("captured");
        let mut proto = FunctionPrototype::new(name, Vec::new(), TypeId(0));
        let mut regions = RegionTree::new();
        let root = regions.new_region(None);
        let discovery = CaptureDiscovery::new(root);
        let pass = PassResult::from_discovery(discovery, false);

        rewrite_prototype_for_captures(&mut proto, TypeId(1), captured_name, &pass);
        assert!(!proto.has_captures);
        assert!(proto.params.is_empty());
    }
}
