//! String interning for identifier and generated-name deduplication.
//!
//! The namespace tree, symbol table and IR builder all mint a large number
//! of short-lived name strings (specialization names like `id<i32>`,
//! synthesized members like `Class..rtti`). Interning keeps comparisons to a
//! `u32` equality check instead of a string compare.

use rustc_hash::FxHashMap;
use std::fmt;

/// An interned string handle. Cheap to copy, compare and hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom(u32);

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({})", self.0)
    }
}

/// Arena-backed interner. Strings live as long as the `Interner` (for the
/// lifetime of one compilation job, per spec §5's shared-resource policy).
#[derive(Default)]
pub struct Interner {
    strings: Vec<String>,
    lookup: FxHashMap<String, Atom>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.lookup.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        self.strings.push(s.to_string());
        self.lookup.insert(s.to_string(), atom);
        atom
    }

    pub fn resolve(&self, atom: Atom) -> &str {
        &self.strings[atom.0 as usize]
    }

    /// Mint a full name `parent.short` the way the namespace tree's
    /// `register` does for every entity it binds (spec §4.2 invariant).
    pub fn intern_qualified(&mut self, parent: &str, short: &str) -> Atom {
        if parent.is_empty() {
            self.intern(short)
        } else {
            let joined = format!("{parent}.{short}");
            self.intern(&joined)
        }
    }

    /// Mint a specialization name `Base<T1,T2,...>`, the name a generic
    /// instantiation is given per spec §3's "Generic info" lifecycle.
    pub fn intern_specialization(&mut self, base: &str, args: &[&str]) -> Atom {
        let mut joined = String::with_capacity(base.len() + args.len() * 8 + 2);
        joined.push_str(base);
        joined.push('<');
        for (i, a) in args.iter().enumerate() {
            if i > 0 {
                joined.push(',');
            }
            joined.push_str(a);
        }
        joined.push('>');
        self.intern(&joined)
    }
}
