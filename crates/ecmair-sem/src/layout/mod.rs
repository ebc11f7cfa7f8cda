//! Class/interface physical layout — spec §4.5.

pub mod gc;
pub mod rtti;
pub mod storage;
pub mod vtable;

pub use gc::{build_gc_descriptor, GcDescriptor, INLINE_BITMAP_WIDTH};
pub use rtti::{build_rtti_plan, RttiPlan};
pub use storage::{build_storage_tuple, flatten_fields, FieldLayout};
pub use vtable::{build_interface_vtable_for_class, build_vtable, InterfaceVtableSlot, VtableEntry};
