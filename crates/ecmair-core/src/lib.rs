//! Top-level compiler API — spec §6 (external interfaces) and §9's
//! overall shape: ties the namespace/symbol/type/class/generic arenas and
//! the `ecmair-lower` IR builder together behind one entry point, a single
//! facade a CLI or WASM host can drive.
//!
//! This crate does not parse source text; a `SourceFile`'s `NodeArena` and
//! a binder that turns it into `module::ClassDeclaration`-shaped input are
//! external collaborators (spec §1's Non-goals). What lives here is
//! everything downstream of binding: session setup, class layout
//! orchestration, and draining the result into a `CompiledModule` or a
//! diagnostic list.

pub mod module;
pub mod session;
pub mod tracing_init;

pub use module::{declare_and_layout_class, finish, ClassDeclaration, ClassLayout, CompiledModule, FieldDeclaration};
pub use session::CompilationSession;
pub use tracing_init::init_tracing;

pub use ecmair_common::config::{CompilerConfig, ExceptionAbi, NumberPrecision};

#[cfg(test)]
#[path = "../tests/compile_session_tests.rs"]
mod compile_session_tests;
