//! MLIR-like IR and AST-to-IR lowering — spec §4 (IR, lowering policies,
//! generic instantiation bridge, closures, exceptions) and §8 (generator
//! desugaring, for-of/for-await-of strategy).

pub mod ir;
pub mod lower;

pub use ir::{Builder, OpArena, OpKind, Region, Value};
pub use lower::{ExceptionAbi, LowerResult};

#[cfg(test)]
#[path = "../tests/closure_in_try_tests.rs"]
mod closure_in_try_tests;
