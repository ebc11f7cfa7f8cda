//! `CompilationSession` — the per-job bundle of arenas spec §5 describes
//! as "shared resources mutated only from a single pass at a time": one
//! interner, one namespace table, one symbol table, one type arena, one
//! class/interface/function arena, one generic engine, one IR op arena,
//! one diagnostic sink, all scoped to a single compilation job and torn
//! down with it. Nothing here is global/static state (spec §9's Design
//! Notes reject ambient mutable globals in favor of explicit threading).

use ecmair_common::config::CompilerConfig;
use ecmair_common::diagnostics::DiagnosticSink;
use ecmair_common::interner::{Atom, Interner};
use ecmair_lower::ir::OpArena;
use ecmair_sem::{ClassArena, FunctionArena, InterfaceArena};
use ecmair_symbols::{NamespaceTable, SymbolTable};
use ecmair_types::{FloatWidth, GenericEngine, TypeArena};

fn float_width_of(config: &CompilerConfig) -> FloatWidth {
    match config.number_precision {
        ecmair_common::config::NumberPrecision::F32 => FloatWidth::F32,
        ecmair_common::config::NumberPrecision::F64 => FloatWidth::F64,
    }
}

/// Everything a compilation job needs, alive for exactly the job's
/// lifetime. Construct one per source module; nothing here is reused
/// across modules (spec §3's namespace root is per-module).
pub struct CompilationSession {
    pub config: CompilerConfig,
    pub interner: Interner,
    pub namespaces: NamespaceTable,
    pub symbols: SymbolTable,
    pub types: TypeArena,
    pub classes: ClassArena,
    pub interfaces: InterfaceArena,
    pub functions: FunctionArena,
    pub generics: GenericEngine,
    pub ops: OpArena,
    pub diagnostics: DiagnosticSink,
}

impl CompilationSession {
    pub fn new(config: CompilerConfig, module_name: &str) -> Self {
        let mut interner = Interner::new();
        let module_atom = interner.intern(module_name);
        let generics = GenericEngine::new(config.max_specialization_depth);
        CompilationSession {
            types: TypeArena::new(float_width_of(&config)),
            config,
            interner,
            namespaces: NamespaceTable::new(module_atom),
            symbols: SymbolTable::new(),
            classes: ClassArena::new(),
            interfaces: InterfaceArena::new(),
            functions: FunctionArena::new(),
            generics,
            ops: OpArena::new(),
            diagnostics: DiagnosticSink::new(),
        }
    }

    pub fn root_namespace(&self) -> ecmair_symbols::NamespaceId {
        self.namespaces.root()
    }

    /// Scope-walk recursion limit for `NamespaceTable::lookup`, read from
    /// this session's config rather than hardcoded at every call site.
    pub fn lookup(&self, start: ecmair_symbols::NamespaceId, name: Atom) -> Option<(ecmair_symbols::NamespaceId, ecmair_symbols::namespace::NamespaceEntity)> {
        self.namespaces.lookup(start, name, self.config.max_scope_walk_iterations)
    }

    /// Translate the `exception-abi` configuration knob (spec §6) into the
    /// ABI selector `ecmair-lower`'s exception-emission functions take. The
    /// two crates keep separate enums: `ecmair-common`'s is the
    /// user-facing configuration surface, `ecmair-lower`'s is an
    /// implementation detail of `lower_try`/`emit_allocate_and_throw`. This
    /// is the one seam where a caller crosses from one to the other.
    pub fn exception_abi_for_lowering(&self) -> ecmair_lower::ExceptionAbi {
        match self.config.exception_abi {
            ecmair_common::config::ExceptionAbi::Itanium => ecmair_lower::ExceptionAbi::Itanium,
            ecmair_common::config::ExceptionAbi::Msvc => ecmair_lower::ExceptionAbi::Msvc,
        }
    }
}
