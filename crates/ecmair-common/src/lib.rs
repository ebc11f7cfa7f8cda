//! Common types and utilities for the ecmair semantic-analysis core.
//!
//! This crate provides foundational pieces shared by every other crate in
//! the workspace:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`)
//! - Diagnostics (`Diagnostic`, `DiagnosticSink`, buffering for dummy-runs)
//! - Compiler configuration (`CompilerConfig`, `ExceptionAbi`, `NumberPrecision`)
//! - Centralized limits shared across passes

pub mod config;
pub mod diagnostics;
pub mod interner;
pub mod limits;
pub mod span;

pub use config::{CompilerConfig, ExceptionAbi, NumberPrecision};
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSink, DiagnosticsError};
pub use interner::{Atom, Interner};
pub use span::Span;

#[cfg(test)]
#[path = "../tests/diagnostics_buffering_tests.rs"]
mod diagnostics_buffering_tests;
