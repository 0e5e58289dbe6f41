//! # spark-view
//!
//! Navigation and resolution core for a view-tree rendering runtime.
//!
//! ## Architecture
//!
//! Views are instantiated from compiled templates, often many times over
//! (loop bodies, conditional branches, dynamic containers). Each view is a
//! record in an arena: a fixed header plus one slot per template position.
//! A slot holds a render node, a nested view, a container of views, or a
//! decoration wrapper, and navigation unwraps them on demand:
//!
//! ```text
//! RenderNodeId --association--> ViewId --parent/declaration--> ... --> root view
//!                                  |
//!                                  +--slots--> Slot::{Node, View, Container, Decorated}
//! ```
//!
//! All walks are read-only over `&ViewTree` and report broken preconditions
//! as [`NavError`].
//!
//! ## Modules
//!
//! - [`types`] - Handles, flags, the slot sum type
//! - [`engine`] - Record arena and the mutation surface the renderer drives
//! - [`navigation`] - Slot resolver, view tree navigator, injector locations
//! - [`state`] - Render node association table
//! - [`primitives`] - Change identity, flattening, stringification
//! - [`renderer`] - What the core asks of the renderer backend
//! - [`config`] - Check mode and scheduler selection

pub mod config;
pub mod engine;
pub mod error;
pub mod navigation;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{CheckMode, NavConfig, SchedulerKind};
pub use error::{Link, NavError, Result};

pub use engine::{
    Context, DescriptorInit, FrameScheduler, ImmediateScheduler, NodeDescriptor, RootContext,
    Scheduler, TemplateKind, ViewInit, ViewRecord, ViewTree,
};

pub use navigation::{
    parent_injector_descriptor, parent_injector_location, parent_injector_view, parent_of,
    resolve_component_view, resolve_container, resolve_render_node, root_context_of,
    root_view_of, InjectorLocation, PackedLocation, StartPoint,
};

pub use primitives::{flatten, is_different, stringify, BindingValue};

pub use renderer::RenderHost;

pub use state::{associate, clear as clear_association, lookup, resolve_owning_view, Association};
