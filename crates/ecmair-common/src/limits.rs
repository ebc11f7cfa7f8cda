//! Centralized limits and thresholds shared across passes. Most of these
//! are also reachable through `CompilerConfig` when they are user-tunable;
//! the constants here are the hard backstops that apply regardless of
//! configuration.

/// Hard ceiling on generic specialization recursion depth, independent of
/// `CompilerConfig::max_specialization_depth` (which may lower it further).
/// Exists so a misconfigured job cannot disable the fixed-point guard
/// entirely.
pub const HARD_MAX_SPECIALIZATION_DEPTH: usize = 4096;

/// Maximum nesting depth of union/intersection flattening before the
/// builder gives up and returns `never` rather than recursing further.
pub const MAX_TYPE_FLATTEN_DEPTH: usize = 256;

/// Maximum number of dependency-fixed-point retry passes over a single
/// block's statement list (spec §5's ordering guarantees) before the
/// driver declares no-progress and emits the first unresolved statement's
/// diagnostic.
pub const MAX_DEPENDENCY_FIXED_POINT_PASSES: usize = 64;
