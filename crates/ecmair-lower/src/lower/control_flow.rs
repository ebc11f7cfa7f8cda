//! Control-flow lowering — spec §4.3/§8: if/while/do-while/for/for-in/
//! for-of/switch/labeled break-continue, plus `for await...of`'s
//! async-group desugaring.

use crate::ir::{Builder, OpKind, Region, Value};
use crate::lower::expr::{report_for_of_iterator_kind, IterKind, LowerResult};
use ecmair_common::interner::Atom;
use ecmair_common::span::Span;
use ecmair_symbols::TypeId;

/// `if (cond) then else?` — a direct `If` op; `then`/`else` are each
/// lowered inside their own `build_region` so ops created while lowering
/// one arm never leak into the other or the parent (spec §9's scoped
/// insertion-point guard).
pub fn lower_if(
    builder: &mut Builder,
    span: Span,
    void_ty: TypeId,
    cond: Value,
    then: impl FnOnce(&mut Builder) -> LowerResult,
    els: Option<impl FnOnce(&mut Builder) -> LowerResult>,
) -> LowerResult {
    let (then_result, then_region) = builder.build_region(then);
    then_result?;
    let else_region = match els {
        Some(f) => {
            let (result, region) = builder.build_region(f);
            result?;
            Some(region)
        }
        None => None,
    };
    let value = builder.emit(span, void_ty, OpKind::If { cond, then_region, else_region });
    Ok(Some(value))
}

/// `while (cond) body` — spec §4.1's `while(cond-region, body-region)`:
/// the condition is itself a region (re-evaluated each iteration), not a
/// single value computed once.
pub fn lower_while(
    builder: &mut Builder,
    span: Span,
    void_ty: TypeId,
    cond: impl FnOnce(&mut Builder) -> LowerResult,
    body: impl FnOnce(&mut Builder) -> LowerResult,
) -> LowerResult {
    let (cond_result, cond_region) = builder.build_region(cond);
    cond_result?;
    let (body_result, body_region) = builder.build_region(body);
    body_result?;
    let value = builder.emit(span, void_ty, OpKind::While { cond_region, body_region });
    Ok(Some(value))
}

pub fn lower_do_while(
    builder: &mut Builder,
    span: Span,
    void_ty: TypeId,
    body: impl FnOnce(&mut Builder) -> LowerResult,
    cond: impl FnOnce(&mut Builder) -> LowerResult,
) -> LowerResult {
    let (body_result, body_region) = builder.build_region(body);
    body_result?;
    let (cond_result, cond_region) = builder.build_region(cond);
    cond_result?;
    let value = builder.emit(span, void_ty, OpKind::DoWhile { body_region, cond_region });
    Ok(Some(value))
}

pub fn lower_for(
    builder: &mut Builder,
    span: Span,
    void_ty: TypeId,
    cond: impl FnOnce(&mut Builder) -> LowerResult,
    body: impl FnOnce(&mut Builder) -> LowerResult,
    incr: impl FnOnce(&mut Builder) -> LowerResult,
) -> LowerResult {
    let (cond_result, cond_region) = builder.build_region(cond);
    cond_result?;
    let (body_result, body_region) = builder.build_region(body);
    body_result?;
    let (incr_result, incr_region) = builder.build_region(incr);
    incr_result?;
    let value = builder.emit(span, void_ty, OpKind::For { cond_region, body_region, incr_region });
    Ok(Some(value))
}

/// `for..of` / `for..in` iteration strategy. Spec §8: "a value exposing
/// both `length` and `next` uses the iterator protocol (preference rule:
/// `next` wins)." `for..in` is always index/key-based over own-enumerable
/// keys and never consults this preference rule.
pub fn for_of_strategy(has_length: bool, has_next: bool) -> IterKind {
    report_for_of_iterator_kind(has_length, has_next)
}

/// `for await...of` desugars to: for each element, start an
/// `async.execute` of the loop body, add it to a group, then after the
/// loop body's enclosing region completes, await the whole group (spec
/// §4.3/§9: "leave the actual async runtime out of scope" — the op shapes
/// are emitted, their runtime semantics are a downstream collaborator's
/// concern).
pub struct AsyncGroupPlan {
    pub group: Value,
    pub per_element_ops: Region,
    pub await_all: Value,
}

pub fn lower_for_await_of(
    builder: &mut Builder,
    span: Span,
    void_ty: TypeId,
    group_symbol: ecmair_symbols::FunctionId,
    body: impl FnOnce(&mut Builder) -> LowerResult,
) -> Result<AsyncGroupPlan, ()> {
    let group = builder.emit(span, void_ty, OpKind::New { class: ecmair_symbols::ClassId::NONE, on_stack: false });
    let (body_result, per_element_ops): (LowerResult, Region) = builder.build_region(|b| {
        let group_ref = b.emit(span, void_ty, OpKind::SymbolRef(group_symbol));
        b.emit(span, void_ty, OpKind::Call { callee: group_ref, args: vec![group] });
        body(b)
    });
    body_result?;
    let await_all = builder.emit(span, void_ty, OpKind::Call { callee: group, args: Vec::new() });
    Ok(AsyncGroupPlan { group, per_element_ops, await_all })
}

/// `switch (discriminant) { cases }` — spec's `SwitchCase { test, body }`
/// shape with `test: None` marking `default:`.
pub fn lower_switch(
    builder: &mut Builder,
    span: Span,
    void_ty: TypeId,
    discriminant: Value,
    cases: Vec<(Option<Value>, Box<dyn FnOnce(&mut Builder) -> LowerResult + '_>)>,
) -> LowerResult {
    let mut built_cases = Vec::with_capacity(cases.len());
    for (test, body) in cases {
        let (result, region) = builder.build_region(body);
        result?;
        built_cases.push(crate::ir::SwitchCase { test, body: region });
    }
    let value = builder.emit(span, void_ty, OpKind::Switch { discriminant, cases: built_cases });
    Ok(Some(value))
}

/// A labeled loop/block's `break`/`continue` target, per spec's `Label`/
/// `Break(Option<label>)`/`Continue(Option<label>)` triple.
#[derive(Default)]
pub struct LabelStack {
    active: Vec<Atom>,
}

impl LabelStack {
    pub fn new() -> Self {
        LabelStack::default()
    }

    pub fn push(&mut self, label: Atom) {
        self.active.push(label);
    }

    pub fn pop(&mut self) {
        self.active.pop();
    }

    /// An unlabeled `break`/`continue` always targets the innermost loop,
    /// so it never consults this stack; a labeled one must name an
    /// enclosing label or it is an `UnknownLabel` diagnostic.
    pub fn is_in_scope(&self, label: Atom) -> bool {
        self.active.contains(&label)
    }
}

pub fn lower_break(builder: &mut Builder, span: Span, void_ty: TypeId, label: Option<Atom>) -> Value {
    builder.emit(span, void_ty, OpKind::Break(label))
}

pub fn lower_continue(builder: &mut Builder, span: Span, void_ty: TypeId, label: Option<Atom>) -> Value {
    builder.emit(span, void_ty, OpKind::Continue(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::OpArena;
    use ecmair_common::interner::Interner;
    use ecmair_types::{FloatWidth, TypeArena};

    #[test]
    fn for_of_prefers_iterator_protocol_when_both_present() {
        assert_eq!(for_of_strategy(true, true), IterKind::IteratorProtocol);
        assert_eq!(for_of_strategy(true, false), IterKind::IndexBased);
    }

    #[test]
    fn if_arms_do_not_leak_ops_into_each_other() {
        let mut arena = OpArena::new();
        let mut builder = Builder::new(&mut arena);
        let types = TypeArena::new(FloatWidth::F64);
        let cond = builder.emit(Span::at(0), types.boolean, OpKind::Constant(ecmair_types::LiteralValue::Boolean(true)));

        lower_if(
            &mut builder,
            Span::at(1),
            types.void,
            cond,
            |b| {
                b.emit(Span::at(2), types.void, OpKind::Unreachable);
                Ok(None)
            },
            Some(|b: &mut Builder| {
                b.emit(Span::at(3), types.void, OpKind::Unreachable);
                b.emit(Span::at(3), types.void, OpKind::Unreachable);
                Ok(None)
            }),
        )
        .unwrap();

        assert_eq!(builder.current_region_len(), 2, "cond literal + the If op itself");
    }

    #[test]
    fn labels_track_enclosing_scope() {
        let mut interner = Interner::new();
        let outer = interner.intern("outer");
        let inner = interner.intern("inner");
        let mut labels = LabelStack::new();

        labels.push(outer);
        assert!(labels.is_in_scope(outer));
        assert!(!labels.is_in_scope(inner));
        labels.push(inner);
        assert!(labels.is_in_scope(inner));
        labels.pop();
        assert!(!labels.is_in_scope(inner));
        assert!(labels.is_in_scope(outer));
    }

    #[test]
    fn switch_builds_one_region_per_case_including_default() {
        let mut arena = OpArena::new();
        let mut builder = Builder::new(&mut arena);
        let types = TypeArena::new(FloatWidth::F64);
        let discriminant = builder.emit(Span::at(0), types.number, OpKind::Constant(ecmair_types::LiteralValue::Number(1.0)));
        let case_one = builder.emit(Span::at(1), types.number, OpKind::Constant(ecmair_types::LiteralValue::Number(1.0)));

        let cases: Vec<(Option<Value>, Box<dyn FnOnce(&mut Builder) -> LowerResult>)> = vec![
            (Some(case_one), Box::new(|b: &mut Builder| { b.emit(Span::at(2), types.void, OpKind::Unreachable); Ok(None) })),
            (None, Box::new(|b: &mut Builder| { b.emit(Span::at(3), types.void, OpKind::Unreachable); Ok(None) })),
        ];

        let value = lower_switch(&mut builder, Span::at(4), types.void, discriminant, cases).unwrap().unwrap();
        assert_eq!(builder.type_of(value), types.void);
    }
}
