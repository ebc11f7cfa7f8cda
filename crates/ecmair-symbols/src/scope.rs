//! Lexical variable scoping. Spec §3: "Variables live in lexically scoped
//! tables"; this is distinct from the namespace tree (`namespace.rs`),
//! which resolves declarations (classes, functions, interfaces, ...), not
//! block-local bindings.

use crate::ids::SymbolId;
use ecmair_common::interner::Atom;
use rustc_hash::FxHashMap;

/// A stack of block scopes. Each function body pushes one scope per block
/// it lowers (`{ ... }`, loop bodies, `catch` blocks, ...) and pops it on
/// exit.
#[derive(Default)]
pub struct ScopeStack {
    blocks: Vec<FxHashMap<Atom, SymbolId>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack { blocks: vec![FxHashMap::default()] }
    }

    pub fn push_block(&mut self) {
        self.blocks.push(FxHashMap::default());
    }

    pub fn pop_block(&mut self) {
        assert!(self.blocks.len() > 1, "cannot pop the function's outermost block scope");
        self.blocks.pop();
    }

    /// `register(name, entry)` rejects duplicates only for variable
    /// redeclaration in the same scope (spec §4.2); returns `false` on a
    /// rejected duplicate so the caller can turn it into a `Redeclaration`
    /// diagnostic.
    pub fn register(&mut self, name: Atom, symbol: SymbolId) -> bool {
        let top = self.blocks.last_mut().expect("ScopeStack always has a block");
        if top.contains_key(&name) {
            return false;
        }
        top.insert(name, symbol);
        true
    }

    /// Walks from the innermost block outward within the current
    /// function, shadowing as it goes (innermost wins).
    pub fn lookup(&self, name: Atom) -> Option<SymbolId> {
        for block in self.blocks.iter().rev() {
            if let Some(&sym) = block.get(&name) {
                return Some(sym);
            }
        }
        None
    }

    pub fn depth(&self) -> usize {
        self.blocks.len()
    }
}
