//! `TypeKind` — spec §3's closed sum over value and reference categories.
//! Recursive positions hold `TypeId`s into the owning `TypeArena` rather
//! than boxed `TypeKind`s, so the arena can intern and deduplicate
//! structurally-equal types cheaply.

use ecmair_common::interner::Atom;
use ecmair_symbols::{ClassId, EnumId, FunctionId, InterfaceId, TypeAliasId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    F32,
    F64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Eq for LiteralValue {}

impl std::hash::Hash for LiteralValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            LiteralValue::String(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            LiteralValue::Number(n) => {
                1u8.hash(state);
                n.to_bits().hash(state);
            }
            LiteralValue::Boolean(b) => {
                2u8.hash(state);
                b.hash(state);
            }
        }
    }
}

/// spec §3's Type sum. `TypeId` is the arena handle; `TypeKind` is what it
/// resolves to. Every variant that itself contains a type is expressed as
/// a `TypeId`, never as `Box<TypeKind>` — this is what makes union
/// flattening and structural equality an arena-level operation rather than
/// a deep tree walk (spec §4.1).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    // ---- value categories ----
    Void,
    Boolean,
    Int(IntWidth),
    Number,
    BigInt,

    // ---- reference categories ----
    String,
    Char,
    Symbol,
    Array(super::TypeId),
    ConstArray(super::TypeId, u64),
    Tuple(Vec<super::TypeId>),
    ConstTuple(Vec<super::TypeId>),
    Object(ecmair_symbols::SymbolId),
    Class(ClassId),
    /// The storage-tuple view of a class, used as the pointee of `ref(T)`
    /// for `this` and for field addressing (spec §4.5).
    ClassStorage(ClassId),
    Interface(InterfaceId),
    Namespace(ecmair_symbols::NamespaceId),
    Enum(EnumId),
    Function(FunctionId),
    /// The (receiver, function) pair used for instance-method call sites
    /// (spec's "Bound function").
    BoundFunction(super::TypeId),
    /// A function type that may additionally be called unbound (rare
    /// source pattern: a method reference used both as `obj.m()` and
    /// passed around as a plain function value).
    HybridFunction(super::TypeId),
    Union(Vec<super::TypeId>),
    Intersection(Vec<super::TypeId>),
    LiteralOf(LiteralValue, super::TypeId),
    Optional(super::TypeId),
    Ref(super::TypeId),
    ValueRef(super::TypeId),
    Opaque,
    Any,
    Unknown,
    Never,
    Null,
    Undefined,
    /// Placeholder `undefined` literal used to build `optional(T)` as
    /// `union(T, undef-placeholder)` (spec §3's invariant).
    UndefPlaceholder,
    /// An unresolved generic type parameter at its declaration site.
    Generic,
    /// A type variable left unbound after unification, carrying its name
    /// (spec GLOSSARY: "Named-generic").
    NamedGeneric(Atom),
    Infer(super::TypeId),

    /// Not part of spec §3's sum directly: a sentinel error type so a failed
    /// type computation can keep flowing through later phases without a
    /// `panic!` (spec §7: "internal invariant violations ... are assertion
    /// failures, not user errors" — this is the recoverable counterpart,
    /// used when a *user* error already produced a diagnostic).
    Error,

    /// Function types also need a parameter/return shape distinct from
    /// `FunctionId` (which names a *declared* function). Used for
    /// anonymous function types (arrow functions, callback parameters).
    FunctionSignature(FunctionSignature),
    TypeAlias(TypeAliasId),

    /// A generic entity applied to type arguments that have not (yet)
    /// been unified/specialized to a concrete type — `class(C<T>)` used as
    /// a unification template, or `List<string>` before the engine
    /// materializes it. `base` names the generic entity's own marker type
    /// (its `Class`/`Interface`/`TypeAlias` variant); `args` are positional
    /// and unified by position with the entity's own type parameters
    /// (spec §4.4 step 2: "unify positional type-params by name").
    Instantiated { base: super::TypeId, args: Vec<super::TypeId> },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    pub params: Vec<ParamType>,
    pub return_type: super::TypeId,
    pub is_generator: bool,
    pub is_async: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamType {
    pub name: Atom,
    pub ty: super::TypeId,
    pub optional: bool,
    pub variadic: bool,
}
