//! Opaque arena indices shared by every crate in the workspace. None of
//! these types carry behavior; they exist purely so arenas owned by
//! different crates can reference each other without an ownership cycle
//! (spec §9's Design Notes, "replace with arena + typed indices").

macro_rules! arena_id {
    ($name:ident) => {
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub const NONE: $name = $name(u32::MAX);

            #[inline]
            pub fn is_none(self) -> bool {
                self == Self::NONE
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

arena_id!(TypeId);
arena_id!(SymbolId);
arena_id!(NamespaceId);
arena_id!(ClassId);
arena_id!(InterfaceId);
arena_id!(EnumId);
arena_id!(TypeAliasId);
arena_id!(GenericId);
arena_id!(FunctionId);
arena_id!(GlobalId);
/// References an op result inside the IR builder (`ecmair-lower`).
arena_id!(OpId);
