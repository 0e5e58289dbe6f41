//! State Module - Process-wide runtime state
//!
//! - **Association** - render node to owning view / context index

pub mod association;

pub use association::{
    associate, associate_view_nodes, association_count, clear, clear_view_nodes, lookup,
    reset_associations, resolve_owning_view, Association, ContextEnvelope,
};
