//! Statement-level lowering and the dependency fixed-point driver —
//! spec §5/§8: lowering a block's statements is "confluent regardless of
//! retry order" and "terminates either when all statements succeed or a
//! full pass makes no progress", at which point the first statement still
//! unresolved reports its location as the diagnostic site.
//!
//! This mirrors `ecmair_types::generics::GenericEngine`'s own fixed-point
//! shape (a worklist retried until a pass makes no progress), generalized
//! here to statement lowering rather than specialization.

use crate::ir::{Builder, OpKind, Value};
use crate::lower::expr::LowerResult;
use ecmair_common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use ecmair_common::span::Span;
use ecmair_symbols::TypeId;

/// `return` — spec §4.3: "`return` without expression in a non-void
/// context is an error unless a partial-resolve pass is active; `return`
/// in void context emits `return` op; otherwise the value is cast to the
/// declared/inferred return type and stored through the entry block's
/// return-ref before `exit`." `return_ref` is the enclosing function's
/// `Entry`'s payload (`None` for a void function); `partial_resolve`
/// mirrors the dummy-run pass (spec §4.6) that discovers return types
/// before the real emission pass runs and must not error on a bare
/// `return;` it hasn't yet resolved a type for.
pub fn lower_return(
    builder: &mut Builder,
    sink: &mut DiagnosticSink,
    span: Span,
    return_ty: TypeId,
    void_ty: TypeId,
    return_ref: Option<Value>,
    expr: Option<impl FnOnce(&mut Builder) -> LowerResult>,
    partial_resolve: bool,
) -> LowerResult {
    match expr {
        None => {
            if return_ty != void_ty && !partial_resolve {
                sink.report(Diagnostic::error(
                    DiagnosticKind::TypeMismatch,
                    span,
                    "a function with a non-void return type must return a value",
                ));
                return Err(());
            }
            builder.emit(span, void_ty, OpKind::Return);
            builder.emit(span, void_ty, OpKind::Exit(None));
            Ok(None)
        }
        Some(expr) => {
            let value = expr(builder)?.ok_or(())?;
            let cast = builder.emit(span, return_ty, OpKind::Cast { value, target: return_ty });
            if let Some(return_ref) = return_ref {
                builder.emit(span, return_ty, OpKind::Store { value: cast, target: return_ref });
            }
            builder.emit(span, return_ty, OpKind::ReturnVal(cast));
            let exit = builder.emit(span, return_ty, OpKind::Exit(Some(cast)));
            Ok(Some(exit))
        }
    }
}

/// What trying to lower one statement produced this pass.
pub enum StmtAttempt<T> {
    /// Lowered successfully; remove it from the worklist.
    Resolved(T),
    /// Depends on something not yet available (e.g. a forward-referenced
    /// function's return type still mid-inference); retry next pass.
    Pending,
    /// A real error — not a dependency ordering issue.
    Failed,
}

/// Drive `try_resolve` over `count` items until every item resolves or a
/// full pass makes zero progress. `initial_order` is the worklist's
/// starting visitation order — a permutation of `0..count` — since each
/// pass revisits whatever is left in that same relative order; confluence
/// (spec §5/§8) means the final result must not depend on it. `span_of`
/// locates an item for the first-unresolved diagnostic. Returns the
/// resolved values in their original index order, or `Err(())` if the
/// sink received an unresolved-symbol diagnostic for the stalled item.
pub fn resolve_fixed_point<T>(
    count: usize,
    initial_order: &[usize],
    span_of: impl Fn(usize) -> Span,
    mut try_resolve: impl FnMut(usize) -> StmtAttempt<T>,
    sink: &mut DiagnosticSink,
) -> Result<Vec<T>, ()> {
    debug_assert_eq!(initial_order.len(), count, "initial_order must be a permutation of 0..count");
    let mut results: Vec<Option<T>> = (0..count).map(|_| None).collect();
    let mut pending: Vec<usize> = initial_order.to_vec();

    let mut pass = 0;
    loop {
        if pending.is_empty() {
            break;
        }
        pass += 1;
        let mut made_progress = false;
        let mut still_pending = Vec::new();

        for index in pending.drain(..) {
            match try_resolve(index) {
                StmtAttempt::Resolved(value) => {
                    results[index] = Some(value);
                    made_progress = true;
                }
                StmtAttempt::Pending => {
                    still_pending.push(index);
                }
                StmtAttempt::Failed => {
                    made_progress = true; // a hard failure still removes the item
                }
            }
        }

        pending = still_pending;
        tracing::debug!(pass, remaining = pending.len(), made_progress, "dependency fixed-point pass");
        if !made_progress {
            break;
        }
    }

    if let Some(&stalled) = pending.first() {
        sink.report(Diagnostic::error(
            DiagnosticKind::UnresolvedSymbol,
            span_of(stalled),
            "statement depends on a declaration that never resolved",
        ));
        return Err(());
    }

    Ok(results.into_iter().map(|r| r.expect("every non-pending index was resolved or failed")).collect())
}
