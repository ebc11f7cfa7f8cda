//! Unification — spec §4.4 step 2: "for each parameter (with template
//! type `T_p`) and each argument value (with concrete type `T_a`),
//! recursively unify" the listed constructor pairs.

use crate::arena::TypeArena;
use crate::construct::union_default;
use crate::kind::TypeKind;
use ecmair_common::interner::Atom;
use ecmair_common::limits::MAX_TYPE_FLATTEN_DEPTH;
use ecmair_symbols::TypeId;
use rustc_hash::FxHashMap;

/// Accumulates `named-generic ↦ type` bindings discovered during
/// unification. "merge-bind n ↦ join(prior(n), T_a)" (spec §4.4 step 2):
/// re-binding the same name widens to the union of every type it was
/// unified against, rather than overwriting or erroring.
#[derive(Default, Debug, Clone)]
pub struct Bindings {
    map: FxHashMap<Atom, TypeId>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings::default()
    }

    pub fn bind(&mut self, arena: &mut TypeArena, name: Atom, ty: TypeId) {
        let joined = match self.map.get(&name) {
            Some(&prior) => union_default(arena, &[prior, ty]),
            None => ty,
        };
        self.map.insert(name, joined);
    }

    pub fn get(&self, name: Atom) -> Option<TypeId> {
        self.map.get(&name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = Atom> + '_ {
        self.map.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Recursively unify `template` (may contain `NamedGeneric`s) against
/// `actual` (a concrete call-operand type), recording bindings. Returns
/// `false` if the two shapes are fundamentally incompatible (e.g. a tuple
/// template against a non-tuple actual) — per spec this does not abort
/// the whole inference, it just contributes no binding for that pair.
pub fn unify(arena: &mut TypeArena, template: TypeId, actual: TypeId, bindings: &mut Bindings) -> bool {
    unify_depth(arena, template, actual, bindings, 0)
}

fn unify_depth(arena: &mut TypeArena, template: TypeId, actual: TypeId, bindings: &mut Bindings, depth: usize) -> bool {
    if depth > MAX_TYPE_FLATTEN_DEPTH {
        return false;
    }

    if let TypeKind::NamedGeneric(name) = arena.get(template).clone() {
        bindings.bind(arena, name, actual);
        return true;
    }

    match (arena.get(template).clone(), arena.get(actual).clone()) {
        (TypeKind::Instantiated { base: b1, args: a1 }, TypeKind::Instantiated { base: b2, args: a2 })
            if b1 == b2 =>
        {
            a1.len() == a2.len()
                && a1.iter().zip(a2.iter()).all(|(&x, &y)| unify_depth(arena, x, y, bindings, depth + 1))
        }
        (TypeKind::Array(e1), TypeKind::Array(e2)) => unify_depth(arena, e1, e2, bindings, depth + 1),
        (TypeKind::Array(e1), TypeKind::ConstArray(e2, _)) => unify_depth(arena, e1, e2, bindings, depth + 1),
        (TypeKind::Optional(i1), TypeKind::Optional(i2)) => unify_depth(arena, i1, i2, bindings, depth + 1),
        (TypeKind::Optional(i1), _) => unify_depth(arena, i1, actual, bindings, depth + 1),
        (TypeKind::FunctionSignature(f1), TypeKind::FunctionSignature(f2)) => {
            let mut ok = f1.params.len() == f2.params.len();
            for (p1, p2) in f1.params.iter().zip(f2.params.iter()) {
                ok &= unify_depth(arena, p1.ty, p2.ty, bindings, depth + 1);
            }
            ok && unify_depth(arena, f1.return_type, f2.return_type, bindings, depth + 1)
        }
        (TypeKind::Union(m1), TypeKind::Union(m2)) if m1.len() == m2.len() => {
            m1.iter().zip(m2.iter()).all(|(&x, &y)| unify_depth(arena, x, y, bindings, depth + 1))
        }
        (TypeKind::Tuple(m1), TypeKind::Tuple(m2)) if m1.len() == m2.len() => {
            m1.iter().zip(m2.iter()).all(|(&x, &y)| unify_depth(arena, x, y, bindings, depth + 1))
        }
        _ => template == actual,
    }
}

/// Replace every `NamedGeneric` occurrence in `template` with its bound
/// type, defaulting unbound names to `unknown` under-constrained
/// (constraint checking and the under-constrained diagnostic happen at
/// the call site, not here).
pub fn substitute(arena: &mut TypeArena, template: TypeId, bindings: &Bindings) -> TypeId {
    substitute_depth(arena, template, bindings, 0)
}

fn substitute_depth(arena: &mut TypeArena, template: TypeId, bindings: &Bindings, depth: usize) -> TypeId {
    if depth > MAX_TYPE_FLATTEN_DEPTH {
        return template;
    }
    match arena.get(template).clone() {
        TypeKind::NamedGeneric(name) => bindings.get(name).unwrap_or(template),
        TypeKind::Array(e) => {
            let e = substitute_depth(arena, e, bindings, depth + 1);
            arena.intern(TypeKind::Array(e))
        }
        TypeKind::ConstArray(e, n) => {
            let e = substitute_depth(arena, e, bindings, depth + 1);
            arena.intern(TypeKind::ConstArray(e, n))
        }
        TypeKind::Optional(i) => {
            let i = substitute_depth(arena, i, bindings, depth + 1);
            crate::construct::optional(arena, i)
        }
        TypeKind::Tuple(elems) => {
            let elems: Vec<TypeId> = elems.iter().map(|&e| substitute_depth(arena, e, bindings, depth + 1)).collect();
            arena.intern(TypeKind::Tuple(elems))
        }
        TypeKind::Union(members) => {
            let members: Vec<TypeId> =
                members.iter().map(|&m| substitute_depth(arena, m, bindings, depth + 1)).collect();
            crate::construct::union_default(arena, &members)
        }
        TypeKind::Instantiated { base, args } => {
            let args: Vec<TypeId> = args.iter().map(|&a| substitute_depth(arena, a, bindings, depth + 1)).collect();
            arena.intern(TypeKind::Instantiated { base, args })
        }
        TypeKind::FunctionSignature(sig) => {
            let params = sig
                .params
                .iter()
                .map(|p| crate::kind::ParamType {
                    name: p.name,
                    ty: substitute_depth(arena, p.ty, bindings, depth + 1),
                    optional: p.optional,
                    variadic: p.variadic,
                })
                .collect();
            let return_type = substitute_depth(arena, sig.return_type, bindings, depth + 1);
            arena.intern(TypeKind::FunctionSignature(crate::kind::FunctionSignature {
                params,
                return_type,
                is_generator: sig.is_generator,
                is_async: sig.is_async,
            }))
        }
        _ => template,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::TypeArena;
    use crate::kind::FloatWidth;
    use ecmair_common::interner::Interner;

    #[test]
    fn named_generic_unifies_against_concrete_argument() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        let mut interner = Interner::new();
        let t = interner.intern("T");
        let template = arena.intern(TypeKind::NamedGeneric(t));
        let mut bindings = Bindings::new();
        assert!(unify(&mut arena, template, arena.number, &mut bindings));
        assert_eq!(bindings.get(t), Some(arena.number));
    }

    #[test]
    fn repeated_binding_joins_via_union() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        let mut interner = Interner::new();
        let t = interner.intern("T");
        let template = arena.intern(TypeKind::NamedGeneric(t));
        let mut bindings = Bindings::new();
        unify(&mut arena, template, arena.number, &mut bindings);
        unify(&mut arena, template, arena.string, &mut bindings);
        let joined = bindings.get(t).unwrap();
        assert_eq!(joined, crate::construct::union_default(&mut arena, &[arena.number, arena.string]));
    }

    #[test]
    fn array_unifies_element_type() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        let mut interner = Interner::new();
        let t = interner.intern("T");
        let named = arena.intern(TypeKind::NamedGeneric(t));
        let template = arena.intern(TypeKind::Array(named));
        let actual = arena.intern(TypeKind::Array(arena.number));
        let mut bindings = Bindings::new();
        assert!(unify(&mut arena, template, actual, &mut bindings));
        assert_eq!(bindings.get(t), Some(arena.number));
    }

    #[test]
    fn substitute_replaces_named_generic_with_binding() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        let mut interner = Interner::new();
        let t = interner.intern("T");
        let named = arena.intern(TypeKind::NamedGeneric(t));
        let template = arena.intern(TypeKind::Array(named));
        let mut bindings = Bindings::new();
        bindings.bind(&mut arena, t, arena.string);
        let result = substitute(&mut arena, template, &bindings);
        assert_eq!(result, arena.intern(TypeKind::Array(arena.string)));
    }
}
