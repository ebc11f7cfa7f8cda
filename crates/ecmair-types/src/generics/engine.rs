//! `GenericEngine` — drives spec §4.4's six-step instantiation procedure
//! and the fixed-point reentrancy guard from spec §9's Design Notes.

use super::info::{GenericInfo, TypeParameter};
use super::unify::{substitute, unify, Bindings};
use crate::arena::TypeArena;
use crate::construct::{is_subtype, widen};
use crate::kind::TypeKind;
use ecmair_common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use ecmair_common::interner::Atom;
use ecmair_common::span::Span;
use ecmair_symbols::{GenericId, TypeId};
use rustc_hash::{FxHashMap, FxHashSet};

/// `(generic, type arguments)` — the cache/reentrancy key spec §9 asks
/// for ("a `HashSet<SpecializationKey>` on the generic engine").
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpecializationKey {
    pub generic: GenericId,
    pub args: Vec<TypeId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpecializationOutcome {
    /// Every type parameter resolved to a concrete (named-generic-free)
    /// type; `TypeId` names the materialized specialization.
    Specialized(TypeId),
    /// At least one type parameter is still a bare `named-generic` after
    /// inference — the generic's own unsubstituted type is returned
    /// unchanged (spec §4.4 step 6: "otherwise return the generic base
    /// type").
    GenericBase(TypeId),
    /// Re-entrant specialization of the same key while it is still being
    /// processed — a tombstone that resolves to the generic base (spec
    /// §9's Design Notes).
    Cycle(TypeId),
    TooManyTypeArguments,
}

pub struct GenericEngine {
    infos: Vec<GenericInfo>,
    cache: FxHashMap<SpecializationKey, TypeId>,
    processing: FxHashSet<SpecializationKey>,
    max_depth: usize,
    depth: usize,
}

impl GenericEngine {
    pub fn new(max_depth: usize) -> Self {
        GenericEngine {
            infos: Vec::new(),
            cache: FxHashMap::default(),
            processing: FxHashSet::default(),
            max_depth,
            depth: 0,
        }
    }

    pub fn register(&mut self, info: GenericInfo) -> GenericId {
        let id = GenericId(self.infos.len() as u32);
        self.infos.push(info);
        id
    }

    pub fn get(&self, id: GenericId) -> &GenericInfo {
        &self.infos[id.index()]
    }

    /// Look up a prior specialization without creating one, used by
    /// callers that only want to know whether a given argument list has
    /// already been materialized (spec §8: "re-specializing with the same
    /// argument list yields the cached instance").
    pub fn cached(&self, generic: GenericId, args: &[TypeId]) -> Option<TypeId> {
        self.cache.get(&SpecializationKey { generic, args: args.to_vec() }).copied()
    }

    /// Run spec §4.4's six steps:
    /// 1. explicit-argument zip (with defaults only filled after inference)
    /// 2. inference from call-operand types via `unify`
    /// 3. delayed arrow specialization — NOT performed here; see
    ///    `ecmair-lower`'s closure/dummy-run machinery, which resolves an
    ///    arrow-typed operand to a concrete type *before* calling this
    ///    method, so from this engine's point of view it is just another
    ///    entry in `operand_types` (see DESIGN.md).
    /// 4. constraint check (emits warnings to `sink`)
    /// 5. widening
    /// 6. emission decision
    pub fn instantiate(
        &mut self,
        arena: &mut TypeArena,
        sink: &mut DiagnosticSink,
        generic: GenericId,
        explicit_args: &[TypeId],
        template_params: &[TypeId],
        operand_types: &[TypeId],
        call_span: Span,
    ) -> SpecializationOutcome {
        let type_params = self.infos[generic.index()].type_params.clone();

        if explicit_args.len() > type_params.len() {
            return SpecializationOutcome::TooManyTypeArguments;
        }

        // Step 1: explicit-argument zip.
        let mut bindings = Bindings::new();
        for (param, &arg) in type_params.iter().zip(explicit_args.iter()) {
            bindings.bind(arena, param.name, arg);
        }

        // Step 2: inference from call operands.
        for (&template, &actual) in template_params.iter().zip(operand_types.iter()) {
            unify(arena, template, actual, &mut bindings);
        }

        // Fill defaults for any parameter still unbound, now that
        // inference has had its chance (spec: "use defaults for missing
        // trailing args *only after* inference").
        for param in &type_params {
            if bindings.get(param.name).is_none() {
                if let Some(default) = param.default {
                    bindings.bind(arena, param.name, default);
                }
            }
        }

        let args: Vec<TypeId> = type_params
            .iter()
            .map(|p| bindings.get(p.name).unwrap_or(arena.unknown))
            .collect();
        let key = SpecializationKey { generic, args: args.clone() };

        if let Some(&cached) = self.cache.get(&key) {
            tracing::trace!(generic = generic.index(), "instantiate: cache hit");
            return SpecializationOutcome::Specialized(cached);
        }
        if self.processing.contains(&key) {
            tracing::debug!(generic = generic.index(), depth = self.depth, "instantiate: reentrant cycle, returning tombstone");
            let base = self.infos[generic.index()].discovered_type.unwrap_or(arena.never);
            return SpecializationOutcome::Cycle(base);
        }
        if self.depth >= self.max_depth {
            tracing::debug!(generic = generic.index(), max_depth = self.max_depth, "instantiate: max depth reached, returning tombstone");
            let base = self.infos[generic.index()].discovered_type.unwrap_or(arena.never);
            return SpecializationOutcome::Cycle(base);
        }

        self.processing.insert(key.clone());
        self.depth += 1;

        // Step 4: constraint check.
        for param in &type_params {
            self.check_constraint(arena, sink, param, &bindings, call_span);
        }

        // Step 5: widening.
        let mut widened = Bindings::new();
        for param in &type_params {
            if let Some(bound) = bindings.get(param.name) {
                let w = widen(arena, bound);
                widened.bind(arena, param.name, w);
            }
        }

        self.processing.remove(&key);
        self.depth -= 1;

        // Step 6: emission.
        let under_constrained = type_params.iter().any(|p| widened.get(p.name).is_none());
        if under_constrained {
            sink.report(Diagnostic::error(
                DiagnosticKind::UnderConstrainedTypeParameter,
                call_span,
                format!(
                    "could not infer all type parameters of generic entity (arity {})",
                    type_params.len()
                ),
            ));
            let base = self.infos[generic.index()].discovered_type.unwrap_or(arena.unknown);
            return SpecializationOutcome::GenericBase(base);
        }

        let final_args: Vec<TypeId> = type_params.iter().map(|p| widened.get(p.name).unwrap()).collect();
        let has_named_generic_remaining =
            final_args.iter().any(|&a| contains_named_generic(arena, a, 0));

        if has_named_generic_remaining {
            let base = self.infos[generic.index()].discovered_type.unwrap_or(arena.unknown);
            return SpecializationOutcome::GenericBase(base);
        }

        let base = self.marker_type(arena, generic);
        let specialized = arena.intern(TypeKind::Instantiated { base, args: final_args });
        self.cache.insert(key, specialized);
        tracing::trace!(generic = generic.index(), cache_size = self.cache.len(), "instantiate: new specialization cached");
        SpecializationOutcome::Specialized(specialized)
    }

    fn marker_type(&self, arena: &mut TypeArena, generic: GenericId) -> TypeId {
        use super::info::GenericEntityKind;
        match self.infos[generic.index()].kind {
            GenericEntityKind::Function(f) => arena.intern(TypeKind::Function(f)),
            GenericEntityKind::Class(c) => arena.intern(TypeKind::Class(c)),
            GenericEntityKind::Interface(i) => arena.intern(TypeKind::Interface(i)),
            GenericEntityKind::TypeAlias(t) => arena.intern(TypeKind::TypeAlias(t)),
        }
    }

    fn check_constraint(
        &self,
        arena: &mut TypeArena,
        sink: &mut DiagnosticSink,
        param: &TypeParameter,
        bindings: &Bindings,
        span: Span,
    ) {
        let (Some(bound), Some(constraint)) = (bindings.get(param.name), param.constraint) else {
            return;
        };
        if !is_subtype(arena, bound, constraint) {
            sink.report(Diagnostic::warning(
                DiagnosticKind::ConstraintViolated,
                span,
                "type argument does not satisfy the declared constraint",
            ));
        }
    }
}

fn contains_named_generic(arena: &TypeArena, ty: TypeId, depth: usize) -> bool {
    if depth > 64 {
        return false;
    }
    match arena.get(ty) {
        TypeKind::NamedGeneric(_) => true,
        TypeKind::Array(e) | TypeKind::ConstArray(e, _) | TypeKind::Optional(e) | TypeKind::Ref(e) => {
            contains_named_generic(arena, *e, depth + 1)
        }
        TypeKind::Tuple(elems) | TypeKind::ConstTuple(elems) | TypeKind::Union(elems) | TypeKind::Intersection(elems) => {
            elems.iter().any(|&e| contains_named_generic(arena, e, depth + 1))
        }
        TypeKind::Instantiated { args, .. } => args.iter().any(|&a| contains_named_generic(arena, a, depth + 1)),
        TypeKind::FunctionSignature(sig) => {
            sig.params.iter().any(|p| contains_named_generic(arena, p.ty, depth + 1))
                || contains_named_generic(arena, sig.return_type, depth + 1)
        }
        _ => false,
    }
}

#[allow(unused)]
fn _names(b: &Bindings) -> Vec<Atom> {
    b.names().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generics::info::{GenericEntityKind, GenericInfo, TypeParameter};
    use crate::kind::FloatWidth;
    use ecmair_ast::NodeId;
    use ecmair_common::interner::Interner;
    use ecmair_symbols::{FunctionId, NamespaceId};

    fn setup() -> (TypeArena, Interner, DiagnosticSink, GenericEngine) {
        (TypeArena::new(FloatWidth::F64), Interner::new(), DiagnosticSink::new(), GenericEngine::new(64))
    }

    #[test]
    fn re_specializing_same_args_returns_cached_pointer_equal_type() {
        let (mut arena, mut interner, mut sink, mut engine) = setup();
        let t = interner.intern("T");
        let named = arena.intern(TypeKind::NamedGeneric(t));
        let info = GenericInfo::new(
            interner.intern("id"),
            vec![TypeParameter { name: t, constraint: None, default: None }],
            NodeId(0),
            NamespaceId(0),
            GenericEntityKind::Function(FunctionId(0)),
        );
        let generic = engine.register(info);

        let outcome1 = engine.instantiate(&mut arena, &mut sink, generic, &[], &[named], &[arena.i32], Span::at(0));
        let outcome2 = engine.instantiate(&mut arena, &mut sink, generic, &[], &[named], &[arena.i32], Span::at(0));

        match (outcome1, outcome2) {
            (SpecializationOutcome::Specialized(a), SpecializationOutcome::Specialized(b)) => assert_eq!(a, b),
            other => panic!("expected two specialized outcomes, got {other:?}"),
        }
    }

    #[test]
    fn distinct_argument_lists_specialize_distinctly() {
        let (mut arena, mut interner, mut sink, mut engine) = setup();
        let t = interner.intern("T");
        let named = arena.intern(TypeKind::NamedGeneric(t));
        let info = GenericInfo::new(
            interner.intern("id"),
            vec![TypeParameter { name: t, constraint: None, default: None }],
            NodeId(0),
            NamespaceId(0),
            GenericEntityKind::Function(FunctionId(0)),
        );
        let generic = engine.register(info);

        let a = engine.instantiate(&mut arena, &mut sink, generic, &[], &[named], &[arena.i32], Span::at(0));
        let b = engine.instantiate(&mut arena, &mut sink, generic, &[], &[named], &[arena.string], Span::at(0));
        match (a, b) {
            (SpecializationOutcome::Specialized(x), SpecializationOutcome::Specialized(y)) => assert_ne!(x, y),
            other => panic!("expected two specialized outcomes, got {other:?}"),
        }
    }

    #[test]
    fn cycle_returns_tombstone_resolving_to_generic_base() {
        let (mut arena, mut interner, mut sink, mut engine) = setup();
        let t = interner.intern("T");
        let named = arena.intern(TypeKind::NamedGeneric(t));
        let mut info = GenericInfo::new(
            interner.intern("rec"),
            vec![TypeParameter { name: t, constraint: None, default: None }],
            NodeId(0),
            NamespaceId(0),
            GenericEntityKind::TypeAlias(ecmair_symbols::TypeAliasId(0)),
        );
        info.discovered_type = Some(arena.unknown);
        let generic = engine.register(info);

        // Simulate manual reentrancy: mark the key as `processing` before
        // calling instantiate again with the same arguments.
        let key = SpecializationKey { generic, args: vec![arena.i32] };
        engine.processing.insert(key);
        let outcome = engine.instantiate(&mut arena, &mut sink, generic, &[arena.i32], &[named], &[], Span::at(0));
        assert_eq!(outcome, SpecializationOutcome::Cycle(arena.unknown));
    }

    #[test]
    fn too_many_type_arguments_is_rejected() {
        let (mut arena, mut interner, mut sink, mut engine) = setup();
        let t = interner.intern("T");
        let info = GenericInfo::new(
            interner.intern("id"),
            vec![TypeParameter { name: t, constraint: None, default: None }],
            NodeId(0),
            NamespaceId(0),
            GenericEntityKind::Function(FunctionId(0)),
        );
        let generic = engine.register(info);
        let outcome =
            engine.instantiate(&mut arena, &mut sink, generic, &[arena.i32, arena.string], &[], &[], Span::at(0));
        assert_eq!(outcome, SpecializationOutcome::TooManyTypeArguments);
    }
}
