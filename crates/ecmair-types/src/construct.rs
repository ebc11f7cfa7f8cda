//! Type constructors: union, intersection, widening. Spec §4.1: "Union
//! construction deduplicates, flattens nested unions, collapses
//! literal-of(x,T) with T when T is also a member (configurable), and
//! returns `never` on empty." and "Intersection merges tuple fields,
//! chains interface extends, and otherwise returns `never` unless one side
//! is any/unknown (identity on the other)."

use crate::arena::TypeArena;
use crate::kind::TypeKind;
use ecmair_common::limits::MAX_TYPE_FLATTEN_DEPTH;
use ecmair_symbols::TypeId;

/// Whether `union()` collapses a `literal-of(x,T)` member with a
/// structurally-present `T` member. Spec marks this "(configurable)";
/// default on, matching every call site in this workspace.
#[derive(Copy, Clone, Debug)]
pub struct UnionOptions {
    pub collapse_literal_into_base: bool,
}

impl Default for UnionOptions {
    fn default() -> Self {
        UnionOptions { collapse_literal_into_base: true }
    }
}

fn collect_union_members(arena: &TypeArena, parts: &[TypeId], out: &mut Vec<TypeId>, depth: usize) {
    if depth > MAX_TYPE_FLATTEN_DEPTH {
        return;
    }
    for &part in parts {
        match arena.get(part) {
            TypeKind::Union(members) => {
                let members = members.clone();
                collect_union_members(arena, &members, out, depth + 1);
            }
            TypeKind::Never => {
                // `never` is the union identity: it never contributes a
                // member (`T | never == T`).
            }
            _ => out.push(part),
        }
    }
}

/// Build `T1 | T2 | ... | Tn`, flattened and deduplicated. Returns `never`
/// for an empty input (spec §4.1).
pub fn union(arena: &mut TypeArena, parts: &[TypeId], opts: UnionOptions) -> TypeId {
    let mut flat = Vec::with_capacity(parts.len());
    collect_union_members(arena, parts, &mut flat, 0);

    flat.sort_by_key(|t| t.0);
    flat.dedup();

    if opts.collapse_literal_into_base {
        let present = flat.clone();
        flat.retain(|&t| match arena.get(t) {
            TypeKind::LiteralOf(_, base) => !present.contains(base),
            _ => true,
        });
    }

    match flat.len() {
        0 => arena.never,
        1 => flat[0],
        _ => arena.intern(TypeKind::Union(flat)),
    }
}

pub fn union_default(arena: &mut TypeArena, parts: &[TypeId]) -> TypeId {
    union(arena, parts, UnionOptions::default())
}

/// `optional(T) ≡ union(T, undef-placeholder)` (spec §3's invariant).
pub fn optional(arena: &mut TypeArena, inner: TypeId) -> TypeId {
    if let TypeKind::Optional(_) = arena.get(inner) {
        return inner;
    }
    let placeholder = arena.undef_placeholder;
    union_default(arena, &[inner, placeholder])
}

fn intersect_pair(arena: &mut TypeArena, a: TypeId, b: TypeId) -> TypeId {
    if a == b {
        return a;
    }
    match (arena.get(a).clone(), arena.get(b).clone()) {
        (TypeKind::Any, _) | (TypeKind::Unknown, _) => b,
        (_, TypeKind::Any) | (_, TypeKind::Unknown) => a,
        (TypeKind::Never, _) | (_, TypeKind::Never) => arena.never,
        (TypeKind::Tuple(xs), TypeKind::Tuple(ys)) if xs.len() == ys.len() => {
            let merged: Vec<TypeId> =
                xs.iter().zip(ys.iter()).map(|(&x, &y)| intersect_pair(arena, x, y)).collect();
            if merged.iter().any(|&t| t == arena.never) {
                arena.never
            } else {
                arena.intern(TypeKind::Tuple(merged))
            }
        }
        (TypeKind::Interface(_), TypeKind::Interface(_)) => {
            // Full interface-extends merging needs `InterfaceInfo`, which
            // lives one layer up in `ecmair-sem::layout` (it has to know
            // about field/method ordering, not just structural identity).
            // At this layer the pair is kept intact as an intersection
            // node; `ecmair-sem` resolves member lookups against both
            // sides directly rather than flattening them here.
            arena.intern(TypeKind::Intersection(vec![a, b]))
        }
        _ => arena.never,
    }
}

/// Build `T1 & T2 & ... & Tn`. Folds pairwise per spec §4.1; a malformed
/// combination (e.g. two incompatible value types) yields `never`, which
/// then propagates rather than panicking (spec §4.1's failure mode).
pub fn intersection(arena: &mut TypeArena, parts: &[TypeId]) -> TypeId {
    match parts {
        [] => arena.unknown,
        [only] => *only,
        [first, rest @ ..] => {
            let mut acc = *first;
            for &part in rest {
                acc = intersect_pair(arena, acc, part);
            }
            acc
        }
    }
}

/// Erasure of `literal-of` constraints and constness on collections for
/// storage contexts (spec GLOSSARY: "Widening"). Used by the generic
/// engine's step 5 and by `let`/`var` initializer inference.
pub fn widen(arena: &mut TypeArena, ty: TypeId) -> TypeId {
    match arena.get(ty).clone() {
        TypeKind::LiteralOf(_, base) => widen(arena, base),
        TypeKind::ConstArray(elem, _) => {
            let elem = widen(arena, elem);
            arena.intern(TypeKind::Array(elem))
        }
        TypeKind::ConstTuple(elems) => {
            let widened: Vec<TypeId> = elems.iter().map(|&e| widen(arena, e)).collect();
            arena.intern(TypeKind::Tuple(widened))
        }
        _ => ty,
    }
}

/// Minimal structural subtype check — enough to support `extends()`
/// constraint checking (spec §4.4 step 4) and the few subtype-dependent
/// invariants spec §8 enumerates. This is intentionally not a full
/// assignability checker (that lives in `ecmair-sem`/`ecmair-lower`'s
/// expression lowering, which has the symbol/member context such a check
/// also needs).
pub fn is_subtype(arena: &TypeArena, sub: TypeId, sup: TypeId) -> bool {
    if sub == sup || sup == arena.any || sup == arena.unknown || sub == arena.never {
        return true;
    }
    match arena.get(sub) {
        TypeKind::LiteralOf(_, base) => *base == sup || is_subtype(arena, *base, sup),
        TypeKind::Union(members) => members.iter().all(|&m| is_subtype(arena, m, sup)),
        _ => match arena.get(sup) {
            TypeKind::Union(members) => members.iter().any(|&m| is_subtype(arena, sub, m)),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::FloatWidth;

    #[test]
    fn union_is_idempotent_with_existing_member() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        let u = union_default(&mut arena, &[arena.number, arena.string]);
        let u2 = union_default(&mut arena, &[u, arena.string]);
        assert_eq!(u, u2);
        let u3 = union_default(&mut arena, &[u, u]);
        assert_eq!(u, u3);
    }

    #[test]
    fn union_flattening_is_order_independent() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        let a = union_default(&mut arena, &[arena.number, arena.string, arena.boolean]);
        let b = union_default(&mut arena, &[arena.boolean, arena.string, arena.number]);
        assert_eq!(a, b);
    }

    #[test]
    fn union_of_empty_is_never() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        assert_eq!(union_default(&mut arena, &[]), arena.never);
    }

    #[test]
    fn literal_of_widens_to_base() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        let lit = arena.intern(TypeKind::LiteralOf(crate::kind::LiteralValue::Number(1.0), arena.number));
        assert_eq!(widen(&mut arena, lit), arena.number);
    }

    #[test]
    fn literal_collapses_into_present_base() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        let lit = arena.intern(TypeKind::LiteralOf(crate::kind::LiteralValue::Number(1.0), arena.number));
        let u = union_default(&mut arena, &[lit, arena.number]);
        assert_eq!(u, arena.number);
    }

    #[test]
    fn optional_is_union_with_undef_placeholder() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        let opt = optional(&mut arena, arena.string);
        let expected = union_default(&mut arena, &[arena.string, arena.undef_placeholder]);
        assert_eq!(opt, expected);
    }

    #[test]
    fn intersection_of_incompatible_values_is_never() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        assert_eq!(intersection(&mut arena, &[arena.number, arena.string]), arena.never);
    }

    #[test]
    fn intersection_with_any_is_identity() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        assert_eq!(intersection(&mut arena, &[arena.any, arena.string]), arena.string);
    }

    #[test]
    fn const_tuple_widens_erasing_literal_of() {
        let mut arena = TypeArena::new(FloatWidth::F64);
        let lit = arena.intern(TypeKind::LiteralOf(crate::kind::LiteralValue::Number(1.0), arena.number));
        let const_tuple = arena.intern(TypeKind::ConstTuple(vec![lit]));
        let widened = widen(&mut arena, const_tuple);
        assert_eq!(widened, arena.intern(TypeKind::Tuple(vec![arena.number])));
    }
}
