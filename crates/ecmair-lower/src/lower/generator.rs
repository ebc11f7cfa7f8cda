//! Generator desugaring — spec §4.3/§8 scenario 6: a generator function's
//! body is rewritten into a state machine dispatched by
//! `switchstate(this.step)`, with each `yield` becoming a numbered resume
//! label the dispatcher can jump back into.

use crate::ir::{Builder, OpKind, Region, SwitchCase, Value};
use ecmair_common::span::Span;
use ecmair_symbols::TypeId;

/// One resumable segment of a desugared generator body: the ops between
/// the previous `yield` (or the function entry) and this one.
pub struct GeneratorState {
    pub index: u32,
    pub body: Region,
}

/// Accumulates generator states while lowering a generator body linearly.
/// Each `yield` call ends the current state and starts a new one; the
/// driver (statement lowering) calls `end_state_at_yield` every time it
/// lowers a `Yield` node.
pub struct GeneratorLowering {
    states: Vec<GeneratorState>,
    next_index: u32,
}

impl GeneratorLowering {
    pub fn new() -> Self {
        GeneratorLowering { states: Vec::new(), next_index: 0 }
    }

    /// Close out the state ending at this `yield`, recording `region` as
    /// its body and returning the state index the `yield` op itself
    /// should carry (so the runtime's `this.step = N` matches the switch
    /// case that resumes execution right after it).
    pub fn end_state_at_yield(&mut self, region: Region) -> u32 {
        let index = self.next_index;
        self.states.push(GeneratorState { index, body: region });
        self.next_index += 1;
        index
    }

    pub fn finish(self, tail: Region) -> Vec<GeneratorState> {
        let mut states = self.states;
        states.push(GeneratorState { index: self.next_index, body: tail });
        states
    }
}

impl Default for GeneratorLowering {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the dispatcher: `switchstate(this.step)` with one case per
/// resumable state, falling through in index order (spec: "numbered
/// resume labels"). Modeled here as a `Switch` op over `this..step` whose
/// cases are keyed by a numeric-literal test equal to the state index.
pub fn build_dispatcher(
    builder: &mut Builder,
    span: Span,
    void_ty: TypeId,
    step_field_ty: TypeId,
    this_step: Value,
    states: Vec<GeneratorState>,
) -> Value {
    let cases = states
        .into_iter()
        .map(|state| {
            let test = builder.emit(
                span,
                step_field_ty,
                OpKind::Constant(ecmair_types::LiteralValue::Number(state.index as f64)),
            );
            SwitchCase { test: Some(test), body: state.body }
        })
        .collect();
    builder.emit(span, void_ty, OpKind::Switch { discriminant: this_step, cases })
}

/// `yield expr` lowers to `YieldReturnVal(expr)` — spec §4.1's yield-return
/// op — followed (at the *next* resume point) by advancing `this.step`.
/// The step advance itself is emitted by the caller once it knows the next
/// state's index, since `GeneratorLowering::end_state_at_yield` only
/// becomes available after the yield op itself is emitted.
pub fn lower_yield(builder: &mut Builder, span: Span, value_ty: TypeId, value: Value) -> Value {
    builder.emit(span, value_ty, OpKind::YieldReturnVal(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::OpArena;
    use ecmair_types::{FloatWidth, TypeArena};

    #[test]
    fn each_yield_closes_a_state_and_advances_the_index() {
        let mut arena = OpArena::new();
        let mut builder = Builder::new(&mut arena);
        let types = TypeArena::new(FloatWidth::F64);
        let mut gen = GeneratorLowering::new();

        let (_, first_region) = builder.build_region(|b| {
            b.emit(Span::at(0), types.void, OpKind::Unreachable);
        });
        let first_index = gen.end_state_at_yield(first_region);
        assert_eq!(first_index, 0);

        let (_, second_region) = builder.build_region(|b| {
            b.emit(Span::at(1), types.void, OpKind::Unreachable);
        });
        let second_index = gen.end_state_at_yield(second_region);
        assert_eq!(second_index, 1);

        let (_, tail_region) = builder.build_region(|b| {
            b.emit(Span::at(2), types.void, OpKind::Return);
        });
        let states = gen.finish(tail_region);
        assert_eq!(states.len(), 3);
        assert_eq!(states[2].index, 2);
    }

    #[test]
    fn dispatcher_emits_one_switch_case_per_state() {
        let mut arena = OpArena::new();
        let mut builder = Builder::new(&mut arena);
        let types = TypeArena::new(FloatWidth::F64);

        let this_step = builder.emit(Span::at(0), types.i32, OpKind::GetThis);
        let states = vec![
            GeneratorState { index: 0, body: vec![] },
            GeneratorState { index: 1, body: vec![] },
        ];

        let value = build_dispatcher(&mut builder, Span::at(1), types.void, types.i32, this_step, states);
        assert_eq!(builder.type_of(value), types.void);
    }
}
