//! Navigation - read-only walks over the view tree.
//!
//! - **Slot** - unwrap polymorphic slot values down to render nodes, views
//!   and containers
//! - **Navigator** - parent, root, and declaration walks between views
//! - **Injector** - locate parent dependency-injection scopes
//!
//! Every walk takes `&ViewTree`; precondition violations come back as
//! [`crate::NavError`] and never as panics.

mod injector;
mod navigator;
mod slot;

pub use injector::{
    decode_scope_index, decode_view_offset, has_parent, parent_injector_descriptor,
    parent_injector_location, parent_injector_view, InjectorLocation, PackedLocation,
    HOST_BOUNDARY_FLAG, INJECTOR_INDEX_MASK, MAX_VIEW_OFFSET, NO_PARENT_INJECTOR,
    VIEW_OFFSET_SHIFT,
};
pub use navigator::{
    ancestors, component_boundary_view, component_view_by_index, document_of,
    first_root_render_node, is_creation_mode, is_root, last_root_render_node, native_by_descriptor,
    native_by_index, parent_of, root_context_of, root_view_of, view_attached_to_change_detector,
    view_attached_to_container, Ancestors, StartPoint,
};
pub use slot::{is_container, is_view, resolve_component_view, resolve_container, resolve_render_node};
