//! Closure-capture discovery — spec §4.6:
//!
//! "When a function body is first processed, a dummy-run builds a
//! disposable copy of the entry block. During lowering, the identifier
//! resolver, on every successful variable lookup, checks whether the
//! value's defining region is an ancestor of the current function's
//! region; if not, and the variable is not flagged `ignore-for-capture`,
//! the variable is recorded in the pass result." This module owns the
//! region-ancestry check and the capture bookkeeping; `ecmair-lower` drives
//! the actual two-pass dummy-run/real-run machinery and performs the
//! `symbol-ref` → `create-bound-function` rewrite at referencing sites.

use ecmair_common::interner::Atom;
use ecmair_symbols::{SymbolId, TypeId};
use rustc_hash::FxHashSet;

/// A lexical region: a function body or a nested block inside one. Regions
/// form a forest; "ancestor" in the spec's capture rule is ordinary tree
/// ancestry over this forest. Each function introduces a *fresh root*
/// region with no parent edge back to the enclosing function — lexical
/// nesting across a function boundary is exactly the case the capture rule
/// must catch, so it must never read as "ancestor". Nested blocks *within*
/// one function link to that function's region (or an enclosing block's),
/// so ordinary block-scoped locals never look like captures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(u32);

pub struct RegionTree {
    parents: Vec<Option<RegionId>>,
}

impl Default for RegionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionTree {
    pub fn new() -> Self {
        RegionTree { parents: Vec::new() }
    }

    pub fn new_region(&mut self, parent: Option<RegionId>) -> RegionId {
        let id = RegionId(self.parents.len() as u32);
        self.parents.push(parent);
        id
    }

    /// Is `ancestor` equal to or a strict ancestor of `region`?
    pub fn is_ancestor(&self, ancestor: RegionId, region: RegionId) -> bool {
        let mut cur = Some(region);
        while let Some(r) = cur {
            if r == ancestor {
                return true;
            }
            cur = self.parents[r.0 as usize];
        }
        false
    }
}

/// A binding the identifier resolver found for some name: either a local
/// variable/parameter or an outer one. `by_reference_candidate` mirrors
/// spec's "read-write" condition for by-reference capture.
#[derive(Clone, Debug)]
pub struct VariableBinding {
    pub symbol: SymbolId,
    pub name: Atom,
    pub ty: TypeId,
    pub defining_region: RegionId,
    pub by_reference_candidate: bool,
    /// Spec's `ignore-for-capture` flag — set on module-level bindings,
    /// `this`, and other pseudo-variables that never need a capture slot.
    pub ignore_for_capture: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedVariable {
    pub symbol: SymbolId,
    pub name: Atom,
    pub ty: TypeId,
    pub by_reference: bool,
}

/// Accumulates captures found during one dummy-run of a function body.
pub struct CaptureDiscovery {
    function_region: RegionId,
    captured: Vec<CapturedVariable>,
    seen: FxHashSet<SymbolId>,
}

impl CaptureDiscovery {
    pub fn new(function_region: RegionId) -> Self {
        CaptureDiscovery { function_region, captured: Vec::new(), seen: FxHashSet::default() }
    }

    /// Called by the identifier resolver on every successful variable
    /// lookup during the dummy run, from the region the reference occurs
    /// in (`reference_region`, possibly nested deeper than
    /// `function_region` via inner blocks).
    pub fn record_lookup(&mut self, regions: &RegionTree, reference_region: RegionId, binding: &VariableBinding) {
        if binding.ignore_for_capture {
            return;
        }
        if regions.is_ancestor(binding.defining_region, reference_region) {
            // Defined at or above the reference's own region, within the
            // same function: not a capture.
            return;
        }
        if !self.seen.insert(binding.symbol) {
            return;
        }
        tracing::debug!(
            function_region = ?self.function_region,
            symbol = binding.symbol.0,
            by_reference = binding.by_reference_candidate,
            "capture discovered"
        );
        self.captured.push(CapturedVariable {
            symbol: binding.symbol,
            name: binding.name,
            ty: binding.ty,
            by_reference: binding.by_reference_candidate,
        });
    }

    pub fn has_captures(&self) -> bool {
        !self.captured.is_empty()
    }

    pub fn finish(self) -> Vec<CapturedVariable> {
        self.captured
    }
}

/// Result of the dummy run, handed back to the lowering driver to decide
/// whether the real pass needs an amended prototype.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassResult {
    pub captured: Vec<CapturedVariable>,
    /// Set when the dummy run found at least one field the real pass must
    /// additionally thread through (spec's `has-extra-fields?`), e.g. an
    /// object-literal method's shared `.captured` field.
    pub extra_fields_in_this_context: bool,
}

impl PassResult {
    pub fn from_discovery(discovery: CaptureDiscovery, extra_fields_in_this_context: bool) -> Self {
        PassResult { captured: discovery.finish(), extra_fields_in_this_context }
    }
}
