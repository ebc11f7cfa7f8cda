//! Class layout emission — spec §4.5: turning the layout passes' plan data
//! (`RttiPlan`, `GcDescriptor`, the flat `VtableEntry` list) into the ops
//! that actually back `Class..rtti`, `.instanceOf`, `Class..new` and
//! `Class..typedescr`, instead of leaving that data unconsumed.
//!
//! `GlobalId`s for the three synthesized globals are minted by the caller
//! (the orchestrator walking classes in dependency order, same as
//! `exceptions.rs`'s per-ABI runtime symbols) and handed in; this module
//! only decides what ops each one's initializer and the two synthesized
//! method bodies contain.

use crate::ir::{ArithOp, Builder, CompareOp, LogicalOp, OpKind, Region};
use ecmair_common::span::Span;
use ecmair_sem::layout::{GcDescriptor, RttiPlan};
use ecmair_symbols::{ClassId, FunctionId, GlobalId, TypeId};
use ecmair_types::LiteralValue;

/// `GlobalId`s for a class's three synthesized globals, minted once per
/// class by the caller before calling into this module.
#[derive(Copy, Clone, Debug)]
pub struct ClassGlobals {
    pub rtti: GlobalId,
    pub vtable: GlobalId,
    pub typedescr: GlobalId,
}

/// The IR this pass produces for one class. Any of the three optional
/// regions is `None` when the class's layout doesn't call for it (no RTTI
/// plan, or a typed-GC descriptor not needed because the class has no
/// pointer-like fields).
pub struct ClassEmission {
    pub rtti_init: Option<Region>,
    pub instance_of_body: Option<Region>,
    pub new_body: Region,
    pub typedescr_init: Option<Region>,
}

/// `Class..rtti`'s initializer: store the class's full name string through
/// its global slot.
fn emit_rtti_init(builder: &mut Builder, span: Span, string_ty: TypeId, global: GlobalId, plan: &RttiPlan) -> Region {
    let (_, region) = builder.build_region(|b| {
        let value = b.emit(span, string_ty, OpKind::Constant(LiteralValue::String(plan.rtti_string_value.clone())));
        let target = b.emit(span, string_ty, OpKind::AddressOf(global));
        b.emit(span, string_ty, OpKind::Store { value, target });
    });
    region
}

/// `.instanceOf(rtti: string): bool` — spec: `this..rtti === rtti ||
/// super.instanceOf(rtti)`, or just the identity comparison for a root
/// class. `super_instance_of_func` is the base class's own synthesized
/// `.instanceOf` `FunctionId`; it's `None` exactly when `plan.super_instance_of`
/// is `None`, since bases are emitted before their subclasses (the same
/// dependency order `declare_and_layout_class`'s own doc comment relies
/// on).
fn emit_instance_of_body(
    builder: &mut Builder,
    span: Span,
    boolean_ty: TypeId,
    string_ty: TypeId,
    rtti_global: GlobalId,
    plan: &RttiPlan,
    super_instance_of_func: Option<FunctionId>,
) -> Region {
    let (_, region) = builder.build_region(|b| {
        let this_rtti_addr = b.emit(span, string_ty, OpKind::AddressOf(rtti_global));
        let this_rtti = b.emit(span, string_ty, OpKind::Load(this_rtti_addr));
        let param = b.emit(span, string_ty, OpKind::Param { index: 0, captured: false });
        let identity = b.emit(span, boolean_ty, OpKind::Compare { op: CompareOp::StrictEq, lhs: this_rtti, rhs: param });

        let result = match super_instance_of_func {
            Some(base_func) => {
                let base_method = b.emit(span, boolean_ty, OpKind::ThisSymbolRef(base_func));
                let super_call = b.emit(span, boolean_ty, OpKind::Call { callee: base_method, args: vec![param] });
                b.emit(span, boolean_ty, OpKind::LogicalBinary { op: LogicalOp::Or, lhs: identity, rhs: super_call })
            }
            None => identity,
        };

        b.emit(span, boolean_ty, OpKind::ReturnVal(result));
        b.emit(span, boolean_ty, OpKind::Exit(Some(result)));
    });
    region
}

/// `Class..new(): Class` — spec: allocates the instance (through the
/// typed-GC fast path when the descriptor packs into an `i64`, otherwise
/// the constructor-fallback `New`), stores the class's own flat vtable
/// pointer into the storage tuple's leading slot when the class has one,
/// and returns the instance.
fn emit_new_body(
    builder: &mut Builder,
    span: Span,
    class_ty: TypeId,
    opaque_ty: TypeId,
    class: ClassId,
    has_vtable: bool,
    descriptor: &GcDescriptor,
    globals: &ClassGlobals,
) -> Region {
    let (_, region) = builder.build_region(|b| {
        let this = match descriptor.as_packed_i64() {
            Some(_) => b.emit(span, class_ty, OpKind::GcNewTyped { class, descriptor: globals.typedescr }),
            None => b.emit(span, class_ty, OpKind::New { class, on_stack: false }),
        };

        if has_vtable {
            let vtable_addr = b.emit(span, opaque_ty, OpKind::AddressOf(globals.vtable));
            let slot = b.emit(span, opaque_ty, OpKind::PointerOffsetRef { base: this, offset_path: vec![0] });
            b.emit(span, opaque_ty, OpKind::Store { value: vtable_addr, target: slot });
        }

        b.emit(span, class_ty, OpKind::ReturnVal(this));
        b.emit(span, class_ty, OpKind::Exit(Some(this)));
    });
    region
}

/// `Class..typedescr`'s initializer, or (when the bitmap doesn't fit in a
/// constant-folded `i64`) the `Class..typebitmap()` constructor body that
/// builds it at class-init time — spec's GC-descriptor fallback clause.
fn emit_typedescr_init(builder: &mut Builder, span: Span, int_ty: TypeId, global: GlobalId, descriptor: &GcDescriptor) -> Region {
    let (_, region) = builder.build_region(|b| {
        let packed = match descriptor.as_packed_i64() {
            Some(word) => b.emit(span, int_ty, OpKind::Constant(LiteralValue::Number(word as f64))),
            None => {
                let mut acc = b.emit(span, int_ty, OpKind::Constant(LiteralValue::Number(0.0)));
                for (index, &is_pointer) in descriptor.bitmap.iter().enumerate() {
                    if !is_pointer {
                        continue;
                    }
                    let bit = b.emit(span, int_ty, OpKind::Constant(LiteralValue::Number((1u64 << index) as f64)));
                    acc = b.emit(span, int_ty, OpKind::ArithBinary { op: ArithOp::BitOr, lhs: acc, rhs: bit });
                }
                acc
            }
        };
        let target = b.emit(span, int_ty, OpKind::AddressOf(global));
        b.emit(span, int_ty, OpKind::Store { value: packed, target });
    });
    region
}

/// Emit every op this class's layout calls for. `super_instance_of_func`
/// is ignored when `rtti_plan` is `None` or has no base.
#[allow(clippy::too_many_arguments)]
pub fn emit_class_members(
    builder: &mut Builder,
    span: Span,
    class: ClassId,
    class_ty: TypeId,
    boolean_ty: TypeId,
    string_ty: TypeId,
    int_ty: TypeId,
    opaque_ty: TypeId,
    has_vtable: bool,
    rtti_plan: Option<&RttiPlan>,
    gc_descriptor: &GcDescriptor,
    globals: &ClassGlobals,
    super_instance_of_func: Option<FunctionId>,
) -> ClassEmission {
    let rtti_init = rtti_plan.map(|plan| emit_rtti_init(builder, span, string_ty, globals.rtti, plan));
    let instance_of_body = rtti_plan.map(|plan| {
        emit_instance_of_body(builder, span, boolean_ty, string_ty, globals.rtti, plan, super_instance_of_func)
    });
    let new_body = emit_new_body(builder, span, class_ty, opaque_ty, class, has_vtable, gc_descriptor, globals);
    let needs_typedescr = gc_descriptor.bitmap.iter().any(|&b| b);
    let typedescr_init = needs_typedescr.then(|| emit_typedescr_init(builder, span, int_ty, globals.typedescr, gc_descriptor));

    ClassEmission { rtti_init, instance_of_body, new_body, typedescr_init }
}
