//! Expression lowering policies — spec §4.3's "Representative policies".
//!
//! Each AST node kind dispatches to a handler returning a
//! [`LowerResult`]: "either a typed IR value, success-without-value, or
//! failure" (spec §4.3), modeled per spec §9 Design Notes as
//! `Result<Option<Value>, ()>` with diagnostics threaded through a
//! separate sink rather than returned inline.

use crate::ir::{Builder, CompareOp, LogicalOp, OpKind, Value};
use ecmair_common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use ecmair_common::interner::Atom;
use ecmair_common::span::Span;
use ecmair_sem::{ClassArena, ClassId};
use ecmair_symbols::TypeId;
use ecmair_types::{TypeArena, TypeKind};

/// "Either a typed IR value, success-without-value, or failure" (spec
/// §4.3). `Ok(None)` is the success-without-value case (e.g. a bare
/// `ExpressionStatement` whose inner expression is itself a statement-only
/// form).
pub type LowerResult = Result<Option<Value>, ()>;

/// Result of resolving a member access chain (spec §4.3's property-access
/// paragraph): either a concrete field/method/accessor found at some
/// `path` from the receiver, or an extension-function binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberResolution {
    Field { ty: TypeId, path: Vec<usize> },
    Method { ty: TypeId, func: ecmair_symbols::FunctionId },
    /// spec §4.3: "on failure falls back to extension-function resolution
    /// (a free function whose first parameter type equals the receiver is
    /// bound as a method)".
    Extension { func: ecmair_symbols::FunctionId },
    NotFound,
}

/// Resolve `receiver_ty.name`, unwrapping union/optional/literal-of layers
/// per spec §4.3:
///
/// "Property access on a value of union type casts to the first non-null
/// member then recurses; on optional(T) it unwraps; on literal-of(v,T) it
/// casts to T; on class it consults fields/methods/accessors (including
/// inherited chains) and on failure falls back to extension-function
/// resolution."
pub fn resolve_property_access(
    types: &TypeArena,
    classes: &ClassArena,
    extensions: &[(TypeId, Atom, ecmair_symbols::FunctionId)],
    receiver_ty: TypeId,
    name: Atom,
) -> MemberResolution {
    match types.get(receiver_ty) {
        TypeKind::Union(members) => {
            let first_non_null = members
                .iter()
                .copied()
                .find(|&m| m != types.null && m != types.undefined && m != types.undef_placeholder);
            match first_non_null {
                Some(m) => resolve_property_access(types, classes, extensions, m, name),
                None => MemberResolution::NotFound,
            }
        }
        TypeKind::Optional(inner) => resolve_property_access(types, classes, extensions, *inner, name),
        TypeKind::LiteralOf(_, base) => resolve_property_access(types, classes, extensions, *base, name),
        TypeKind::Class(class_id) => {
            resolve_class_member(types, classes, extensions, receiver_ty, *class_id, name)
        }
        _ => resolve_extension(extensions, receiver_ty, name),
    }
}

fn resolve_class_member(
    types: &TypeArena,
    classes: &ClassArena,
    extensions: &[(TypeId, Atom, ecmair_symbols::FunctionId)],
    receiver_ty: TypeId,
    class_id: ClassId,
    name: Atom,
) -> MemberResolution {
    use ecmair_sem::flatten_fields;

    let info = classes.get(class_id);
    if let Some(method) = info.methods.iter().find(|m| m.name == name) {
        return MemberResolution::Method { ty: method.func_type, func: method.func_op.unwrap_or(ecmair_symbols::FunctionId::NONE) };
    }
    if let Some(field) = flatten_fields(classes, class_id).into_iter().find(|f| f.name == name) {
        return MemberResolution::Field { ty: field.ty, path: field.path };
    }
    // Inherited chain: bases are already folded into `flatten_fields`/the
    // methods loop walks only `info.methods` (no base methods) above, so
    // walk bases explicitly for inherited methods.
    for &base in &info.bases {
        let via_base = resolve_class_member(types, classes, extensions, receiver_ty, base, name);
        if via_base != MemberResolution::NotFound {
            return via_base;
        }
    }
    resolve_extension(extensions, receiver_ty, name)
}

fn resolve_extension(
    extensions: &[(TypeId, Atom, ecmair_symbols::FunctionId)],
    receiver_ty: TypeId,
    name: Atom,
) -> MemberResolution {
    extensions
        .iter()
        .find(|(ty, n, _)| *ty == receiver_ty && *n == name)
        .map(|&(_, _, func)| MemberResolution::Extension { func })
        .unwrap_or(MemberResolution::NotFound)
}

/// `instanceof` resolution — spec §4.3:
///
/// "`instanceof` against a class with RTTI dispatches to a virtual
/// `.instanceOf(string)` method; against `any` it emits a `typeof ==
/// "class"` guard followed by a vtable-indirect call; otherwise it is
/// resolved statically to a boolean constant."
pub enum InstanceOfPlan {
    /// Call `value..instanceOf(rtti_string_of(target))`.
    DispatchRtti { target: ClassId },
    /// Runtime `typeof value == "class"` guard, then vtable-indirect call.
    DynamicGuard { target: ClassId },
    /// No runtime check needed; statically known answer.
    StaticAnswer(bool),
}

pub fn resolve_instanceof(types: &TypeArena, classes: &ClassArena, value_ty: TypeId, target: ClassId) -> InstanceOfPlan {
    if value_ty == types.any {
        return InstanceOfPlan::DynamicGuard { target };
    }
    if let TypeKind::Class(value_class) = types.get(value_ty) {
        if *value_class == target {
            return InstanceOfPlan::StaticAnswer(true);
        }
        if classes.get(*value_class).flags.contains(ecmair_sem::ClassFlags::HAS_RTTI) {
            return InstanceOfPlan::DispatchRtti { target };
        }
        // No RTTI: decide statically from the (acyclic) base chain.
        return InstanceOfPlan::StaticAnswer(is_base_of(classes, target, *value_class));
    }
    InstanceOfPlan::StaticAnswer(false)
}

fn is_base_of(classes: &ClassArena, candidate_base: ClassId, class: ClassId) -> bool {
    if candidate_base == class {
        return true;
    }
    classes.get(class).bases.iter().any(|&b| is_base_of(classes, candidate_base, b))
}

/// `&&`/`||` lower to an `if` op whose merged result type is
/// `union(lhs, rhs)` (spec §4.3). `rhs` is only lowered inside the
/// relevant branch, preserving short-circuit evaluation order.
pub fn lower_logical(
    builder: &mut Builder,
    types: &mut TypeArena,
    span: Span,
    op: LogicalOp,
    lhs: Value,
    lhs_ty: TypeId,
    rhs: impl FnOnce(&mut Builder) -> LowerResult,
) -> LowerResult {
    let (rhs_value, rhs_region) = builder.build_region(|b| rhs(b));
    let rhs_value = rhs_value?;
    let rhs_ty = rhs_value.map(|v| builder.type_of(v)).unwrap_or(types.undefined);
    let merged = ecmair_types::union_default(types, &[lhs_ty, rhs_ty]);

    let region = match op {
        LogicalOp::And => (Some(rhs_region), None),
        LogicalOp::Or => (None, Some(rhs_region)),
    };
    let value = builder.emit(
        span,
        merged,
        OpKind::If { cond: lhs, then_region: region.0.unwrap_or_default(), else_region: region.1 },
    );
    Ok(Some(value))
}

/// `??` gates on a null check of the coerced-to-opaque left (spec §4.3).
pub fn lower_nullish_coalesce(
    builder: &mut Builder,
    types: &mut TypeArena,
    span: Span,
    lhs: Value,
    lhs_ty: TypeId,
    rhs: impl FnOnce(&mut Builder) -> LowerResult,
) -> LowerResult {
    let coerced = builder.emit(span, types.opaque, OpKind::Cast { value: lhs, target: types.opaque });
    let null_value = builder.emit(span, types.opaque, OpKind::Null);
    let is_null = builder.emit(span, types.boolean, OpKind::Compare { op: CompareOp::StrictEq, lhs: coerced, rhs: null_value });
    let (rhs_value, else_region) = builder.build_region(|b| rhs(b));
    let rhs_value = rhs_value?;
    let rhs_ty = rhs_value.map(|v| builder.type_of(v)).unwrap_or(types.undefined);
    let merged = ecmair_types::union_default(types, &[lhs_ty, rhs_ty]);
    let value = builder.emit(span, merged, OpKind::If { cond: is_null, then_region: Vec::new(), else_region: Some(else_region) });
    Ok(Some(value))
}

/// Conditional-expression result type — spec §4.3: "records its result
/// type as the base of the two arms, or a union when no base exists; both
/// arms cast to that type." "Base" here means one arm is a subtype of the
/// other; `then` is preferred when both qualify (matching spec's widening
/// convention of keeping the wider/declared side).
pub fn conditional_result_type(types: &mut TypeArena, then_ty: TypeId, else_ty: TypeId) -> TypeId {
    if ecmair_types::is_subtype(types, else_ty, then_ty) {
        then_ty
    } else if ecmair_types::is_subtype(types, then_ty, else_ty) {
        else_ty
    } else {
        ecmair_types::union_default(types, &[then_ty, else_ty])
    }
}

/// Scope-local type refinement stack — spec §4.3's safe-cast: "inside the
/// then-branch of `typeof x === "string"`, `x === <literal>`, or
/// `x instanceof C`, a fresh variable with the refined type shadows `x` in
/// that branch's scope." Refinements are block-scoped: pushing a frame
/// before lowering a branch and popping it after restores the prior type,
/// satisfying spec §8's "after the `if`, `x`'s type is its original union
/// type."
#[derive(Default)]
pub struct RefinementStack {
    frames: Vec<Vec<(Atom, TypeId)>>,
}

impl RefinementStack {
    pub fn new() -> Self {
        RefinementStack { frames: vec![Vec::new()] }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    pub fn pop_frame(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop the root refinement frame");
        self.frames.pop();
    }

    pub fn refine(&mut self, name: Atom, refined_ty: TypeId) {
        self.frames.last_mut().expect("RefinementStack always has a frame").push((name, refined_ty));
    }

    /// The narrowest currently-visible refinement for `name`, or `None` if
    /// it carries its original declared type.
    pub fn lookup(&self, name: Atom) -> Option<TypeId> {
        self.frames.iter().rev().find_map(|frame| frame.iter().rev().find(|(n, _)| *n == name).map(|(_, t)| *t))
    }
}

/// An assignment target for the `=` save-logic (spec §4.3: "Binary `=`
/// dispatches to a save-logic that supports array-destructuring and
/// object-destructuring targets as well as load/accessor/this-accessor
/// targets").
pub enum AssignTarget {
    Variable(Value),
    Property { object: Value, path: Vec<usize> },
    Element { object: Value, index: Value },
    ArrayDestructure(Vec<AssignTarget>),
    ObjectDestructure(Vec<(Atom, AssignTarget)>),
}

/// Perform the save-logic for one assignment, recursing into destructuring
/// targets. `element_of` extracts the i-th tuple/array element of `value`
/// as a fresh IR value (a `load(element-ref(value, i))` in the real
/// builder; here it is handed in so array- and object-destructuring can
/// share the same recursive shape).
pub fn lower_assign(
    builder: &mut Builder,
    span: Span,
    target: &AssignTarget,
    value: Value,
    element_of: &mut dyn FnMut(&mut Builder, Value, usize) -> Value,
    field_of: &mut dyn FnMut(&mut Builder, Value, Atom) -> Value,
) -> LowerResult {
    match target {
        AssignTarget::Variable(target_ref) => {
            let ty = builder.type_of(value);
            builder.emit(span, ty, OpKind::Store { value, target: *target_ref });
            Ok(Some(value))
        }
        AssignTarget::Property { object, path } => {
            let ty = builder.type_of(value);
            let field_ref = builder.emit(span, ty, OpKind::PointerOffsetRef { base: *object, offset_path: path.clone() });
            builder.emit(span, ty, OpKind::Store { value, target: field_ref });
            Ok(Some(value))
        }
        AssignTarget::Element { object, index } => {
            let ty = builder.type_of(value);
            let elem_ref = builder.emit(span, ty, OpKind::ElementRef { array: *object, index: *index });
            builder.emit(span, ty, OpKind::Store { value, target: elem_ref });
            Ok(Some(value))
        }
        AssignTarget::ArrayDestructure(targets) => {
            for (i, t) in targets.iter().enumerate() {
                let elem = element_of(builder, value, i);
                lower_assign(builder, span, t, elem, element_of, field_of)?;
            }
            Ok(Some(value))
        }
        AssignTarget::ObjectDestructure(fields) => {
            for (name, t) in fields {
                let elem = field_of(builder, value, *name);
                lower_assign(builder, span, t, elem, element_of, field_of)?;
            }
            Ok(Some(value))
        }
    }
}

pub fn report_unresolved_symbol(sink: &mut DiagnosticSink, span: Span, name: &str) {
    sink.report(Diagnostic::error(DiagnosticKind::UnresolvedSymbol, span, format!("cannot find name `{name}`")));
}

pub fn report_for_of_iterator_kind(has_length: bool, has_next: bool) -> IterKind {
    // spec §8: "`for..of` over a value exposing both `length` and `next`
    // uses the iterator protocol (preference rule: `next` wins)."
    if has_next {
        IterKind::IteratorProtocol
    } else if has_length {
        IterKind::IndexBased
    } else {
        IterKind::IteratorProtocol
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IterKind {
    IndexBased,
    IteratorProtocol,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::OpArena;
    use ecmair_common::interner::Interner;
    use ecmair_sem::{ClassFlags, ClassInfo, FieldInfo, MethodInfo};
    use ecmair_types::FloatWidth;

    #[test]
    fn next_wins_over_length_for_for_of() {
        assert_eq!(report_for_of_iterator_kind(true, true), IterKind::IteratorProtocol);
        assert_eq!(report_for_of_iterator_kind(true, false), IterKind::IndexBased);
        assert_eq!(report_for_of_iterator_kind(false, true), IterKind::IteratorProtocol);
    }

    #[test]
    fn property_access_unwraps_optional_then_finds_class_field() {
        let mut interner = Interner::new();
        let mut types = TypeArena::new(FloatWidth::F64);
        let mut classes = ClassArena::new();
        let name = interner.intern("C");
        let f = interner.intern("f");
        let mut info = ClassInfo::new(name, name, TypeId(0));
        info.fields.push(FieldInfo { name: f, ty: types.i32, is_static: false, is_ctor_promoted: false, is_vtable_resident: false });
        let class_id = classes.register(info);
        let class_ty = types.intern(TypeKind::Class(class_id));
        let opt = ecmair_types::optional(&mut types, class_ty);

        let resolved = resolve_property_access(&types, &classes, &[], opt, f);
        assert!(matches!(resolved, MemberResolution::Field { path, .. } if path == vec![0]));
    }

    #[test]
    fn property_access_falls_back_to_extension_function() {
        let mut interner = Interner::new();
        let types = TypeArena::new(FloatWidth::F64);
        let classes = ClassArena::new();
        let name = interner.intern("len");
        let extensions = vec![(types.string, name, ecmair_symbols::FunctionId(7))];

        let resolved = resolve_property_access(&types, &classes, &extensions, types.string, name);
        assert_eq!(resolved, MemberResolution::Extension { func: ecmair_symbols::FunctionId(7) });
    }

    #[test]
    fn instanceof_any_receiver_uses_dynamic_guard() {
        let types = TypeArena::new(FloatWidth::F64);
        let mut interner = Interner::new();
        let name = interner.intern("C");
        let mut classes = ClassArena::new();
        let info = ClassInfo::new(name, name, TypeId(0));
        let class_id = classes.register(info);

        let plan = resolve_instanceof(&types, &classes, types.any, class_id);
        assert!(matches!(plan, InstanceOfPlan::DynamicGuard { .. }));
    }

    #[test]
    fn instanceof_rtti_class_dispatches_to_instance_of_method() {
        let mut interner = Interner::new();
        let mut types = TypeArena::new(FloatWidth::F64);
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
        let b_ty = types.intern(TypeKind::Class(b_id));

        let plan = resolve_instanceof(&types, &classes, b_ty, a_id);
        assert!(matches!(plan, InstanceOfPlan::DispatchRtti { target } if target == a_id));
    }

    #[test]
    fn instanceof_without_rtti_resolves_statically() {
        let mut interner = Interner::new();
        let mut types = TypeArena::new(FloatWidth::F64);
        let mut classes = ClassArena::new();
        let a_name = interner.intern("A");
        let a = ClassInfo::new(a_name, a_name, TypeId(0));
        let a_id = classes.register(a);
        let b_name = interner.intern("B");
        let mut b = ClassInfo::new(b_name, b_name, TypeId(1));
        b.bases.push(a_id);
        let b_id = classes.register(b);
        let b_ty = types.intern(TypeKind::Class(b_id));

        assert!(matches!(resolve_instanceof(&types, &classes, b_ty, a_id), InstanceOfPlan::StaticAnswer(true)));

        let c_name = interner.intern("C");
        let c = ClassInfo::new(c_name, c_name, TypeId(2));
        let c_id = classes.register(c);
        assert!(matches!(resolve_instanceof(&types, &classes, b_ty, c_id), InstanceOfPlan::StaticAnswer(false)));
    }

    #[test]
    fn conditional_result_picks_the_base_when_one_side_is_a_subtype() {
        let mut types = TypeArena::new(FloatWidth::F64);
        let lit = types.intern(TypeKind::LiteralOf(ecmair_types::LiteralValue::Number(1.0), types.number));
        assert_eq!(conditional_result_type(&mut types, types.number, lit), types.number);
    }

    #[test]
    fn conditional_result_unions_unrelated_arms() {
        let mut types = TypeArena::new(FloatWidth::F64);
        let result = conditional_result_type(&mut types, types.number, types.string);
        assert_eq!(result, ecmair_types::union_default(&mut types, &[types.number, types.string]));
    }

    #[test]
    fn refinement_scope_reverts_after_pop() {
        let mut interner = Interner::new();
        let types = TypeArena::new(FloatWidth::F64);
        let x = interner.intern("x");
        let mut refinements = RefinementStack::new();
        assert_eq!(refinements.lookup(x), None);

        refinements.push_frame();
        refinements.refine(x, types.string);
        assert_eq!(refinements.lookup(x), Some(types.string));
        refinements.pop_frame();

        assert_eq!(refinements.lookup(x), None, "safe-cast refinement must not leak past the branch");
    }

    #[test]
    fn logical_and_merges_result_type_as_union() {
        let mut arena = OpArena::new();
        let mut builder = Builder::new(&mut arena);
        let mut types = TypeArena::new(FloatWidth::F64);

        let boolean_ty = types.boolean;
        let string_ty = types.string;
        let lhs = builder.emit(Span::at(0), boolean_ty, OpKind::Constant(ecmair_types::LiteralValue::Boolean(true)));
        let result = lower_logical(&mut builder, &mut types, Span::at(1), LogicalOp::And, lhs, boolean_ty, |b| {
            let v = b.emit(Span::at(2), string_ty, OpKind::Constant(ecmair_types::LiteralValue::String("x".into())));
            Ok(Some(v))
        });
        let value = result.unwrap().unwrap();
        assert_eq!(builder.type_of(value), ecmair_types::union_default(&mut types, &[boolean_ty, string_ty]));
    }

    #[test]
    fn array_destructure_assigns_each_element() {
        let mut arena = OpArena::new();
        let mut builder = Builder::new(&mut arena);
        let types = TypeArena::new(FloatWidth::F64);

        let rhs = builder.emit(Span::at(0), types.number, OpKind::Constant(ecmair_types::LiteralValue::Number(1.0)));
        let t0 = builder.emit(Span::at(1), types.number, OpKind::Variable { initial: None, captured: false });
        let t1 = builder.emit(Span::at(1), types.number, OpKind::Variable { initial: None, captured: false });
        let target = AssignTarget::ArrayDestructure(vec![AssignTarget::Variable(t0), AssignTarget::Variable(t1)]);

        let mut element_of = |b: &mut Builder, v: Value, index: usize| {
            let ref_ = b.emit(Span::at(2), types.number, OpKind::ElementRef { array: v, index: v });
            let _ = index;
            b.emit(Span::at(2), types.number, OpKind::Load(ref_))
        };
        let mut field_of = |_: &mut Builder, v: Value, _: Atom| v;

        let before = builder.current_region_len();
        lower_assign(&mut builder, Span::at(3), &target, rhs, &mut element_of, &mut field_of).unwrap();
        let after = builder.current_region_len();

        // one ElementRef + one Load + one Store per destructured element
        assert_eq!(after - before, 2 * 3);
    }
}
