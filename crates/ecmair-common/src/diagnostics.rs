//! Diagnostics: user-visible messages carrying a source location, plus a
//! sink that supports the buffering/flush-on-failure policy spec §7
//! requires for "partial-resolve" (dummy-run) passes.

use crate::span::Span;
use thiserror::Error;

/// Misuse of [`DiagnosticSink`]'s buffering-frame stack. Always a caller
/// bug (an unmatched `pop_frame`), never something a source file can
/// trigger, but a typed error reads better at the call site than a panic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum DiagnosticsError {
    #[error("pop_frame called without a matching push_frame")]
    UnbalancedFrame,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Suggestion,
}

/// Spec §7's enumerated diagnostic kinds, surfaced as a code so callers can
/// match on kind without string comparison.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    ParseDiagnostic,
    UnresolvedSymbol,
    AmbiguousName,
    Redeclaration,
    TypeMismatch,
    MissingType,
    IncompatibleIntersection,
    UnderConstrainedTypeParameter,
    ConstraintViolated,
    InfiniteSpecialization,
    MissingInterfaceMember,
    SignatureMismatch,
    DuplicateMethod,
    UnknownLabel,
    ReturnInVoidContext,
    YieldOutsideGenerator,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Warning,
            kind,
            span,
            message: message.into(),
        }
    }
}

/// Diagnostic sink with the buffering behavior spec §7 describes:
///
/// "Partial-resolve mode ... suppresses all user-visible error emission:
/// diagnostics are buffered; if the outer pass fails, they flush; if the
/// outer pass succeeds, they are discarded."
///
/// Dummy-runs (closure-capture discovery, generic return-type discovery)
/// push a buffering frame before they start and pop it when they finish,
/// deciding whether to keep or drop what was collected.
pub struct DiagnosticSink {
    flushed: Vec<Diagnostic>,
    frames: Vec<Vec<Diagnostic>>,
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink {
    pub fn new() -> Self {
        DiagnosticSink { flushed: Vec::new(), frames: vec![Vec::new()] }
    }

    /// Enter a buffering frame, e.g. around a dummy-run.
    pub fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Leave the current frame. `keep = true` moves the buffered
    /// diagnostics up to the parent frame (or flushes them if this was the
    /// root frame); `keep = false` discards them, as spec §7 requires when
    /// "the outer pass succeeds".
    pub fn pop_frame(&mut self, keep: bool) -> Result<(), DiagnosticsError> {
        let buffered = self.frames.pop().ok_or(DiagnosticsError::UnbalancedFrame)?;
        if !keep {
            return Ok(());
        }
        match self.frames.last_mut() {
            Some(parent) => parent.extend(buffered),
            None => self.flushed.extend(buffered),
        }
        Ok(())
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.frames
            .last_mut()
            .expect("DiagnosticSink always has a root frame")
            .push(diagnostic);
    }

    /// All diagnostics that have reached the root frame. Diagnostics still
    /// inside an open buffering frame are not visible here until the frame
    /// is popped with `keep = true`.
    pub fn flushed(&self) -> &[Diagnostic] {
        &self.flushed
    }

    pub fn has_errors(&self) -> bool {
        self.flushed.iter().any(|d| d.category == DiagnosticCategory::Error)
            || self
                .frames
                .first()
                .map(|f| f.iter().any(|d| d.category == DiagnosticCategory::Error))
                .unwrap_or(false)
    }

    /// Drain everything visible at the root frame. Used once a compilation
    /// job completes.
    pub fn into_diagnostics(mut self) -> Vec<Diagnostic> {
        if let Some(root) = self.frames.pop() {
            self.flushed.extend(root);
        }
        self.flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy(kind: DiagnosticKind) -> Diagnostic {
        Diagnostic::error(kind, Span::at(0), "boom")
    }

    #[test]
    fn buffered_diagnostics_are_discarded_on_success() {
        let mut sink = DiagnosticSink::new();
        sink.push_frame();
        sink.report(dummy(DiagnosticKind::TypeMismatch));
        sink.pop_frame(false).unwrap();
        assert!(sink.into_diagnostics().is_empty());
    }

    #[test]
    fn buffered_diagnostics_flush_on_failure() {
        let mut sink = DiagnosticSink::new();
        sink.push_frame();
        sink.report(dummy(DiagnosticKind::TypeMismatch));
        sink.pop_frame(true).unwrap();
        assert_eq!(sink.into_diagnostics().len(), 1);
    }

    #[test]
    fn nested_frames_flush_through_parent() {
        let mut sink = DiagnosticSink::new();
        sink.push_frame();
        sink.push_frame();
        sink.report(dummy(DiagnosticKind::UnresolvedSymbol));
        sink.pop_frame(true).unwrap();
        sink.pop_frame(true).unwrap();
        assert_eq!(sink.into_diagnostics().len(), 1);
    }

    #[test]
    fn popping_an_already_empty_frame_stack_is_an_unbalanced_frame_error() {
        let mut sink = DiagnosticSink::new();
        sink.pop_frame(true).unwrap();
        assert_eq!(sink.pop_frame(true), Err(DiagnosticsError::UnbalancedFrame));
    }
}
