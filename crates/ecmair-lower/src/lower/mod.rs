//! AST-to-IR lowering — spec §4.3 (expressions), §5/§8 (statement driver),
//! §4.3/§8 (control flow), §4.6 (closures), §4.7 (exceptions), §4.3/§8
//! scenario 6 (generators).

pub mod class_emit;
pub mod closures;
pub mod control_flow;
pub mod exceptions;
pub mod expr;
pub mod generator;
pub mod stmt;

pub use class_emit::{emit_class_members, ClassEmission, ClassGlobals};
pub use closures::{
    capture_tuple_element_types, emit_capture_unpacking, lower_closure_reference, rewrite_prototype_for_captures,
};
pub use control_flow::{
    for_of_strategy, lower_break, lower_continue, lower_do_while, lower_for, lower_for_await_of, lower_if,
    lower_switch, lower_while, AsyncGroupPlan, LabelStack,
};
pub use exceptions::{
    build_exception_type_descriptor, emit_allocate_and_throw, lower_throw, lower_try, personality_function_name,
    ExceptionAbi, ExceptionTypeDescriptor, UnwindTarget,
};
pub use expr::{
    conditional_result_type, lower_assign, lower_logical, lower_nullish_coalesce, resolve_instanceof,
    resolve_property_access, AssignTarget, InstanceOfPlan, IterKind, LowerResult, MemberResolution, RefinementStack,
};
pub use generator::{build_dispatcher, lower_yield, GeneratorLowering, GeneratorState};
pub use stmt::{lower_return, resolve_fixed_point, StmtAttempt};
