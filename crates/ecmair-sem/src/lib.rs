//! Class/interface layout, vtables, RTTI, typed-GC descriptors, and
//! closure-capture discovery — spec §4.5 and §4.6.
//!
//! Sits between `ecmair-types` (which owns `TypeId`/`TypeKind` and
//! generic specialization) and `ecmair-lower` (which drives the actual
//! two-pass dummy-run lowering and emits IR for everything this crate only
//! plans). Nothing here touches the IR builder directly; it hands back
//! plain data (`Vec<VtableEntry>`, `RttiPlan`, `GcDescriptor`,
//! `PassResult`) that `ecmair-lower` consumes.

pub mod capture;
pub mod class;
pub mod interface;
pub mod layout;
pub mod prototype;

pub use capture::{CaptureDiscovery, CapturedVariable, PassResult, RegionId, RegionTree, VariableBinding};
pub use class::{AccessorInfo, ClassArena, ClassFlags, ClassInfo, FieldInfo, ImplementedInterface, MethodInfo};
pub use interface::{InterfaceArena, InterfaceField, InterfaceInfo, InterfaceMethod};
pub use layout::{
    build_gc_descriptor, build_interface_vtable_for_class, build_rtti_plan, build_storage_tuple, build_vtable,
    flatten_fields, FieldLayout, GcDescriptor, InterfaceVtableSlot, RttiPlan, VtableEntry, INLINE_BITMAP_WIDTH,
};
pub use prototype::{FunctionArena, FunctionPrototype, ParamPrototype};

pub use ecmair_symbols::{ClassId, InterfaceId};

#[cfg(test)]
#[path = "../tests/class_hierarchy_tests.rs"]
mod class_hierarchy_tests;
