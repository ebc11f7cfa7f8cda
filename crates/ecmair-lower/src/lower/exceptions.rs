//! Exception ABI emission — spec §4.7. Two target ABIs, selected by
//! `CompilerConfig::exception_abi` (spec §6):
//!
//! - Itanium C++ ABI: `__cxa_allocate_exception` + `__cxa_throw` +
//!   `__gxx_personality_v0`, typeinfo globals named `_ZTIP<len><name>`.
//! - MSVC ABI: a `CatchableType`/`CatchableTypeArray`/`ThrowInfo` chain of
//!   linkonce-ODR globals addressed relative to `__ImageBase`, thrown via
//!   `_CxxThrowException` and unwound through `__CxxFrameHandler3`.
//!
//! Grounded in `tsz`'s (and the original TypeScript-native compiler's)
//! `ThrowLogic.h`: both ABIs allocate/construct the exception payload, then
//! hand it to a single ABI-specific throw entry point; the personality
//! routine and its typeinfo plumbing are emitted once per thrown type, not
//! once per throw site.

use crate::ir::{Builder, CatchClause, OpKind, Region, Value};
use ecmair_common::span::Span;
use ecmair_symbols::{ClassId, GlobalId, TypeId};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExceptionAbi {
    Itanium,
    Msvc,
}

/// Per-thrown-class globals an ABI needs emitted once, memoized by the
/// caller (keyed on `ClassId`) so a type thrown from many sites shares one
/// descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExceptionTypeDescriptor {
    pub abi: ExceptionAbi,
    /// Itanium: `_ZTIP<len><name>` typeinfo symbol.
    /// MSVC: the innermost `CatchableType` symbol name.
    pub typeinfo_global_name: String,
    /// MSVC only: the `ThrowInfo` struct's symbol name; unused under
    /// Itanium (the typeinfo pointer alone suffices there).
    pub throw_info_global_name: Option<String>,
}

pub fn build_exception_type_descriptor(abi: ExceptionAbi, class_full_name: &str) -> ExceptionTypeDescriptor {
    match abi {
        ExceptionAbi::Itanium => ExceptionTypeDescriptor {
            abi,
            typeinfo_global_name: format!("_ZTIP{}{}", class_full_name.len(), class_full_name),
            throw_info_global_name: None,
        },
        ExceptionAbi::Msvc => ExceptionTypeDescriptor {
            abi,
            typeinfo_global_name: format!("??_R0?AV{class_full_name}@@@8"),
            throw_info_global_name: Some(format!("_TI1?AV{class_full_name}@@")),
        },
    }
}

/// The enclosing `try`'s landing pad, handed down into its body so a
/// nested `throw` knows where control unwinds to. Built once per `try`
/// from its catch clauses (spec §4.7), reused by every throw site inside
/// that body rather than rebuilt per site.
#[derive(Clone, Debug)]
pub struct UnwindTarget {
    /// One `Catch(exception_ref)` marker per clause this `try` declares,
    /// in source order; the runtime dispatches to the first whose
    /// exception type matches.
    pub dest: Region,
}

/// Lower a `throw expr;` — spec §4.7: inside a `try`, emit `invoke`
/// (unwinding into the matching `catch`/`finally`); otherwise emit
/// `throw` followed by `unreachable` (there is no local unwind target).
pub fn lower_throw(
    builder: &mut Builder,
    span: Span,
    void_ty: TypeId,
    value: Value,
    unwind: Option<&UnwindTarget>,
) -> Value {
    match unwind {
        Some(target) => {
            let raise_fn = builder.emit(span, void_ty, OpKind::AddressOf(GlobalId(3)));
            builder.emit(
                span,
                void_ty,
                OpKind::Invoke {
                    callee: raise_fn,
                    args: vec![value],
                    normal_dest: Region::new(),
                    unwind_dest: target.dest.clone(),
                },
            )
        }
        None => {
            let throw = builder.emit(span, void_ty, OpKind::Throw(value));
            builder.emit(span, void_ty, OpKind::Unreachable);
            throw
        }
    }
}

/// Allocate and throw, per-ABI. `descriptor` is looked up or built once per
/// thrown class; `payload_class` is the thrown value's runtime class
/// (used by the MSVC path's `CatchableTypeArray` construction, which lists
/// every base class the exception can be caught as, spec's polymorphic
/// catch clause matching). `unwind` mirrors [`lower_throw`]'s: when the
/// allocation site sits inside a `try`, the final ABI throw call unwinds
/// locally via `Invoke` instead of leaving the function.
pub fn emit_allocate_and_throw(
    builder: &mut Builder,
    span: Span,
    void_ty: TypeId,
    descriptor: &ExceptionTypeDescriptor,
    payload_class: ClassId,
    payload_size: Value,
    typeinfo_global: GlobalId,
    unwind: Option<&UnwindTarget>,
) -> Value {
    match descriptor.abi {
        ExceptionAbi::Itanium => {
            let allocate_fn = builder.emit(span, void_ty, OpKind::AddressOf(GlobalId(0)));
            let exception_slot = builder.emit(span, void_ty, OpKind::Call { callee: allocate_fn, args: vec![payload_size] });
            let typeinfo = builder.emit(span, void_ty, OpKind::AddressOf(typeinfo_global));
            let throw_fn = builder.emit(span, void_ty, OpKind::AddressOf(GlobalId(1)));
            match unwind {
                Some(target) => builder.emit(
                    span,
                    void_ty,
                    OpKind::Invoke {
                        callee: throw_fn,
                        args: vec![exception_slot, typeinfo],
                        normal_dest: Region::new(),
                        unwind_dest: target.dest.clone(),
                    },
                ),
                None => builder.emit(span, void_ty, OpKind::Call { callee: throw_fn, args: vec![exception_slot, typeinfo] }),
            }
        }
        ExceptionAbi::Msvc => {
            let _ = payload_class;
            let throw_info = builder.emit(span, void_ty, OpKind::AddressOf(typeinfo_global));
            let throw_fn = builder.emit(span, void_ty, OpKind::AddressOf(GlobalId(2)));
            match unwind {
                Some(target) => builder.emit(
                    span,
                    void_ty,
                    OpKind::Invoke {
                        callee: throw_fn,
                        args: vec![payload_size, throw_info],
                        normal_dest: Region::new(),
                        unwind_dest: target.dest.clone(),
                    },
                ),
                None => builder.emit(span, void_ty, OpKind::Call { callee: throw_fn, args: vec![payload_size, throw_info] }),
            }
        }
    }
}

/// `try { body } catch (e) { ... } finally { ... }` — spec's `Try { body,
/// catches, finally }` op shape. Catch clauses are lowered before the body
/// so their entry markers can be threaded into the body as an
/// [`UnwindTarget`]: any `throw` (or allocate-and-throw) reachable from
/// `body` routes through it via `Invoke` rather than unwinding out of the
/// function.
pub fn lower_try(
    builder: &mut Builder,
    span: Span,
    void_ty: TypeId,
    body: impl FnOnce(&mut Builder, Option<&UnwindTarget>) -> Result<Option<Value>, ()>,
    catches: Vec<(Value, Box<dyn FnOnce(&mut Builder) -> Result<Option<Value>, ()> + '_>)>,
    finally: Option<impl FnOnce(&mut Builder) -> Result<Option<Value>, ()>>,
) -> Result<Option<Value>, ()> {
    let mut built_catches = Vec::with_capacity(catches.len());
    for (exception_ref, handler) in catches {
        let (result, region) = builder.build_region(handler);
        result?;
        built_catches.push(CatchClause { exception_ref, body: region });
    }

    let unwind_target = if built_catches.is_empty() {
        None
    } else {
        let (_, dest) = builder.build_region(|b| {
            for clause in &built_catches {
                b.emit(span, void_ty, OpKind::Catch(clause.exception_ref));
            }
        });
        Some(UnwindTarget { dest })
    };

    let (body_result, body_region) = builder.build_region(|b| body(b, unwind_target.as_ref()));
    body_result?;

    let finally_region: Option<Region> = match finally {
        Some(f) => {
            let (result, region) = builder.build_region(f);
            result?;
            Some(region)
        }
        None => None,
    };

    let value = builder.emit(span, void_ty, OpKind::Try { body: body_region, catches: built_catches, finally: finally_region });
    Ok(Some(value))
}

/// Personality routine symbol for unwind-table generation — one per
/// function that contains a `try`, regardless of how many catch clauses it
/// has (spec §4.7: the personality routine is a function-level attribute,
/// not a per-catch one).
pub fn personality_function_name(abi: ExceptionAbi) -> &'static str {
    match abi {
        ExceptionAbi::Itanium => "__gxx_personality_v0",
        ExceptionAbi::Msvc => "__CxxFrameHandler3",
    }
}
