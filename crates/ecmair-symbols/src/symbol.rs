//! Symbol entries — spec §3's "(name, storage-type, read-write-flag,
//! owning-function-id, ignore-for-capture-flag, location)".

use crate::ids::{FunctionId, SymbolId, TypeId};
use ecmair_common::interner::Atom;
use ecmair_common::span::Span;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// `let`/`var` binding — lowers to an IR reference cell (`ref(T)`).
    Variable,
    /// `const` binding with no reassignment — lowers to a plain IR value.
    Immutable,
    Parameter,
    Function,
    Class,
    Interface,
    Enum,
    EnumMember,
    TypeAlias,
    Namespace,
    Import,
}

#[derive(Clone, Debug)]
pub struct SymbolEntry {
    pub name: Atom,
    pub kind: SymbolKind,
    /// `None` until the type builder resolves it (spec §3: symbols are
    /// created before their type is known, e.g. during the binder's first
    /// walk).
    pub storage_type: Option<TypeId>,
    /// `true` for a mutable variable/parameter (IR `ref(T)`); `false` for
    /// an immutable binding (plain IR value). Mirrors spec §3's
    /// read-write-flag.
    pub is_read_write: bool,
    /// Which function body this symbol was declared in, `FunctionId::NONE`
    /// for module-level globals.
    pub owning_function: FunctionId,
    /// Set on synthetic/desugared bindings (e.g. the hidden iterator
    /// variable of a `for..of` loop) that must never be reported as a
    /// closure capture even though they are read from a nested function.
    pub ignore_for_capture: bool,
    pub span: Span,
}

impl SymbolEntry {
    pub fn new(name: Atom, kind: SymbolKind, owning_function: FunctionId, span: Span) -> Self {
        let is_read_write = matches!(kind, SymbolKind::Variable | SymbolKind::Parameter);
        SymbolEntry {
            name,
            kind,
            storage_type: None,
            is_read_write,
            owning_function,
            ignore_for_capture: false,
            span,
        }
    }
}

/// Arena of symbol entries, indexed by `SymbolId`. Owned per compilation
/// job (spec §5's shared-resource policy: "Maps ... are mutated only from
/// a single pass at a time").
#[derive(Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn alloc(&mut self, entry: SymbolEntry) -> SymbolId {
        let id = SymbolId(self.entries.len() as u32);
        self.entries.push(entry);
        id
    }

    pub fn get(&self, id: SymbolId) -> &SymbolEntry {
        &self.entries[id.index()]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut SymbolEntry {
        &mut self.entries[id.index()]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
