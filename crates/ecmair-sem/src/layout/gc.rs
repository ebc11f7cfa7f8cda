//! GC descriptor construction — spec §4.5:
//!
//! "Each class with a non-empty pointer-field set gets a `Class..typedescr`
//! lazily-initialized `i64` global holding a packed bitmap of which storage
//! slots are pointer-like (one bit per field, vtable slot excluded), read by
//! the allocator's scan routine; a class whose field count exceeds the
//! packable width falls back to a `Class..typebitmap()` constructor that
//! builds the bitmap at class-init time instead of constant-folding it."
//!
//! Exact word-size/byte-offset packing is a backend `DataLayout` concern the
//! IR layer doesn't model (spec §1 Non-goals: no target data layout), so the
//! bitmap here is one bit per *field*, not per byte — resolved as an Open
//! Question in the design notes.

use super::storage::flatten_fields;
use crate::class::ClassArena;
use ecmair_symbols::ClassId;
use ecmair_types::{TypeArena, TypeKind};

/// Bits fitting in a single constant-folded `i64` global before falling back
/// to the `..typebitmap()` constructor path.
pub const INLINE_BITMAP_WIDTH: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GcDescriptor {
    /// One entry per instance field (vtable slot excluded), `true` when the
    /// field's type is pointer-like and must be traced.
    pub bitmap: Vec<bool>,
    /// Whether the descriptor must be built at class-init time rather than
    /// constant-folded into `Class..typedescr`.
    pub needs_constructor_fallback: bool,
}

impl GcDescriptor {
    /// Pack the bitmap into an `i64` when it fits; `None` when the
    /// constructor-fallback path is required.
    pub fn as_packed_i64(&self) -> Option<i64> {
        if self.needs_constructor_fallback {
            return None;
        }
        let mut word: i64 = 0;
        for (i, &is_pointer) in self.bitmap.iter().enumerate() {
            if is_pointer {
                word |= 1 << i;
            }
        }
        Some(word)
    }
}

fn is_pointer_like(types: &TypeArena, ty: ecmair_symbols::TypeId) -> bool {
    !matches!(
        types.get(ty),
        TypeKind::Void | TypeKind::Boolean | TypeKind::Int(_) | TypeKind::Number
    )
}

pub fn build_gc_descriptor(classes: &ClassArena, types: &TypeArena, class: ClassId) -> GcDescriptor {
    let fields = flatten_fields(classes, class);
    let bitmap: Vec<bool> = fields.iter().map(|f| is_pointer_like(types, f.ty)).collect();
    let needs_constructor_fallback = bitmap.len() > INLINE_BITMAP_WIDTH;
    if needs_constructor_fallback {
        tracing::debug!(class = class.index(), field_count = bitmap.len(), "build_gc_descriptor: bitmap exceeds inline width, falls back to constructor");
    }
    GcDescriptor { bitmap, needs_constructor_fallback }
}
