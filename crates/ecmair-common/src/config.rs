//! Compiler configuration — spec §6's enumerated configuration surface.

/// Exception ABI selected at build time (spec §4.7). Both lowerings coexist
/// in the binary; this only selects which one a given compilation job uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ExceptionAbi {
    #[default]
    Itanium,
    Msvc,
}

/// Width of the `number` type (spec §3, §6).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum NumberPrecision {
    F32,
    #[default]
    F64,
}

/// The four knobs spec §6 enumerates, plus limits carried over from the
/// ambient stack (see SPEC_FULL.md §2).
#[derive(Clone, Debug)]
pub struct CompilerConfig {
    /// When true, `new` lowers to a plain `new` op. When false, class
    /// allocation uses the typed-GC fast path (spec §4.5).
    pub disable_gc: bool,
    pub exception_abi: ExceptionAbi,
    /// When true, a missing parameter/variable type annotation defaults to
    /// `any` with a warning; when false it is an error.
    pub any_as_default: bool,
    pub number_precision: NumberPrecision,
    /// Recursion backstop for the generic engine's fixed-point guard
    /// (spec §5's "guarded by the `processing` flag").
    pub max_specialization_depth: usize,
    /// Recursion backstop for namespace parent-chain lookup.
    pub max_scope_walk_iterations: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            disable_gc: false,
            exception_abi: ExceptionAbi::default(),
            any_as_default: true,
            number_precision: NumberPrecision::default(),
            max_specialization_depth: 256,
            max_scope_walk_iterations: 10_000,
        }
    }
}
