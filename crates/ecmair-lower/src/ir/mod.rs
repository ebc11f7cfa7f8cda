//! The MLIR-like op representation and builder — spec §4.1.

pub mod builder;
pub mod op;

pub use builder::{Builder, OpArena};
pub use op::{
    ArithOp, ArithUnaryOp, CatchClause, CompareOp, IncDecOp, LogicalOp, Op, OpKind, Region, SwitchCase, Value,
};
