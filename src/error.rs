//! Precondition violations raised while walking the view tree.
//!
//! Every failure here means a caller broke an invariant: wrong record kind,
//! an index past the end of a view or template, or a link that traversal
//! needs but that was never set. None of them is used for control flow.

use thiserror::Error;

use crate::types::{
    ContainerId, DescriptorId, NodeType, RenderNodeId, Slot, TemplateId, ViewId,
};

/// Header link that traversal needed but found unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Parent,
    DeclarationView,
    Host,
    HostDescriptor,
    FirstChild,
    RootContext,
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Link::Parent => "parent",
            Link::DeclarationView => "declaration view",
            Link::Host => "host",
            Link::HostDescriptor => "host descriptor",
            Link::FirstChild => "first child",
            Link::RootContext => "root context",
        };
        f.write_str(name)
    }
}

/// Navigation and resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// A value expected to be a View Record is something else.
    #[error("expected a view, found {found:?}")]
    NotAView { found: Slot },

    /// Handle does not refer to a live record in this tree.
    #[error("unknown {kind} handle {index}")]
    UnknownHandle { kind: &'static str, index: usize },

    /// An arena already holds as many records as a handle can address.
    #[error("{kind} arena is full")]
    ArenaFull { kind: &'static str },

    /// Injector scope requested on a position kind that cannot own one.
    #[error("{0:?} positions cannot own an injector scope")]
    InjectorNotAllowed(NodeType),

    /// Dynamic slot or descriptor index past the end of the data.
    #[error("index {index} out of range (valid {start}..{end})")]
    IndexOutOfRange {
        index: usize,
        start: usize,
        end: usize,
    },

    /// A link required by the traversal is absent.
    #[error("{view:?} is missing its {link}")]
    MissingLink { view: ViewId, link: Link },

    /// The container has no view at the requested position.
    #[error("{container:?} has no view at position {position}")]
    NoViewAt {
        container: ContainerId,
        position: usize,
    },

    /// Slot chain ended on an empty slot before reaching a render node.
    #[error("slot chain ended without a render node")]
    EmptySlot,

    /// A walk exceeded the number of views in the tree (cycle).
    #[error("walk from {start:?} did not terminate")]
    Cycle { start: ViewId },

    /// Render node has no entry in the association table.
    #[error("render node {0:?} is not associated with any view")]
    Unassociated(RenderNodeId),

    /// Descriptor belongs to a different template than the view.
    #[error("{descriptor:?} does not belong to {template:?}")]
    ForeignDescriptor {
        descriptor: DescriptorId,
        template: TemplateId,
    },

    /// Injector location cannot be packed (view offset reserved for the sentinel).
    #[error("view offset {0} cannot be encoded")]
    OffsetOverflow(u32),

    /// Scope index wider than the packed mask.
    #[error("scope index {0} cannot be encoded")]
    ScopeIndexOverflow(u16),

    /// Location is the "no parent injector" sentinel.
    #[error("location has no parent injector")]
    NoParentInjector,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NavError>;
