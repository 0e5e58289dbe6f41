//! Core types for spark-view.
//!
//! Handles, flags and the polymorphic slot type that every other module
//! walks over. Records themselves live in [`crate::engine`].

use std::fmt;

// =============================================================================
// Handles
// =============================================================================

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Raw arena index.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

handle!(
    /// A View Record in a [`crate::engine::ViewTree`].
    ViewId, "view#"
);
handle!(
    /// A Container Record (dynamic insertion point).
    ContainerId, "container#"
);
handle!(
    /// A decoration wrapper placed around a slot value.
    DecorationId, "decoration#"
);
handle!(
    /// A static Node Descriptor.
    DescriptorId, "descriptor#"
);
handle!(
    /// A compiled template (the static blueprint shared by views).
    TemplateId, "template#"
);
handle!(
    /// A component, template or root context attached to a view.
    ContextId, "context#"
);

/// Identity of one [`crate::engine::ViewTree`].
///
/// Every other handle is an index valid only inside the tree that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub(crate) u64);

impl fmt::Debug for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree#{}", self.0)
    }
}

/// Opaque handle to a render node owned by the renderer backend.
///
/// The renderer hands these out; the core only compares them by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderNodeId(pub u64);

/// Opaque handle to the document a render node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

// =============================================================================
// Layout
// =============================================================================

/// Absolute index of the first dynamic slot in every View Record.
///
/// Header fields (flags, parent, declaration view, context, host, host
/// descriptor) occupy the positions below this offset, so descriptor
/// indices start here.
pub const HEADER_OFFSET: usize = 6;

// =============================================================================
// Slot
// =============================================================================

/// Content of one dynamic slot (or a host reference).
///
/// The kind is an explicit tag; nothing is inferred from record size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// Nothing stored yet.
    #[default]
    Empty,
    /// A bare render node.
    Node(RenderNodeId),
    /// A nested view (component view hosted at this position).
    View(ViewId),
    /// A dynamic container anchored at this position.
    Container(ContainerId),
    /// A decoration wrapper around another slot value.
    Decorated(DecorationId),
}

impl Slot {
    /// True for every kind that wraps a host reference.
    #[inline]
    pub const fn is_wrapper(&self) -> bool {
        matches!(self, Slot::View(_) | Slot::Container(_) | Slot::Decorated(_))
    }
}

impl From<RenderNodeId> for Slot {
    fn from(node: RenderNodeId) -> Self {
        Slot::Node(node)
    }
}

/// Raw parent reference stored in a view header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    View(ViewId),
    Container(ContainerId),
}

// =============================================================================
// Flags
// =============================================================================

bitflags::bitflags! {
    /// State flags stored in a view header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ViewFlags: u16 {
        const CREATION_MODE = 1 << 0;
        const FIRST_PASS = 1 << 1;
        const CHECK_ALWAYS = 1 << 2;
        const ATTACHED = 1 << 3;
        /// View has no logical parent.
        const IS_ROOT = 1 << 4;
    }
}

bitflags::bitflags! {
    /// Static flags on a node descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DescriptorFlags: u8 {
        const IS_COMPONENT = 1 << 0;
        /// Compiler output carried for the query engine; navigation ignores it.
        const HAS_CONTENT_QUERY = 1 << 1;
    }
}

/// Kind of template position a descriptor stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Anchor of a dynamic container.
    Container,
    Projection,
    /// Root of an embedded template view.
    View,
    Element,
    ElementContainer,
    IcuContainer,
    Text,
}

impl NodeType {
    /// Positions that can own an injector scope.
    #[inline]
    pub const fn can_host_injector(self) -> bool {
        matches!(
            self,
            NodeType::Element | NodeType::Container | NodeType::ElementContainer
        )
    }
}
