//! Record types stored in the view tree arena.
//!
//! - [`NodeDescriptor`] / [`Template`]: static data shared by every view
//!   created from the same template.
//! - [`ViewRecord`]: one instantiation of a template (header + dynamic slots).
//! - [`ContainerRecord`]: a dynamic insertion point owning an ordered list of views.
//! - [`Decoration`]: a wrapper the engine places around a slot value.
//! - [`Context`]: what a view's context header points at.

use std::fmt;
use std::rc::Rc;

use crate::primitives::BindingValue;
use crate::types::{
    ContextId, DescriptorFlags, DescriptorId, NodeType, ParentRef, Slot, TemplateId, ViewFlags,
    ViewId,
};

use super::scheduler::{Scheduler, Task};

// =============================================================================
// Templates & Descriptors
// =============================================================================

/// What a template compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Bootstrapped application root.
    Root,
    /// A component's own template.
    Component,
    /// An embedded template (loop body, conditional branch, ...).
    Embedded,
}

/// Static blueprint shared by all views of one template.
#[derive(Debug, Clone)]
pub struct Template {
    pub(crate) kind: TemplateKind,
    pub(crate) host: Option<DescriptorId>,
    pub(crate) first_child: Option<DescriptorId>,
    pub(crate) descriptors: Vec<DescriptorId>,
}

impl Template {
    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// `View`-type descriptor standing for an embedded template's root.
    ///
    /// Views of the template use it as their host descriptor. It takes no slot.
    pub fn host(&self) -> Option<DescriptorId> {
        self.host
    }

    /// First root-level descriptor, head of the root sibling chain.
    pub fn first_child(&self) -> Option<DescriptorId> {
        self.first_child
    }

    /// Descriptors in index order.
    pub fn descriptors(&self) -> &[DescriptorId] {
        &self.descriptors
    }

    /// Number of dynamic slots each view of this template gets.
    pub fn slot_count(&self) -> usize {
        self.descriptors.len()
    }
}

/// Static metadata for one template position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub node_type: NodeType,
    /// Absolute slot index (>= [`crate::HEADER_OFFSET`]).
    pub index: usize,
    pub flags: DescriptorFlags,
    /// Injector scope slot visible at this position.
    ///
    /// A position without an injector of its own carries its parent's
    /// index; `None` when no scope is visible in this template.
    pub injector_index: Option<u16>,
    pub parent: Option<DescriptorId>,
    pub next: Option<DescriptorId>,
    pub child: Option<DescriptorId>,
    pub template: TemplateId,
}

impl NodeDescriptor {
    #[inline]
    pub fn is_component(&self) -> bool {
        self.flags.contains(DescriptorFlags::IS_COMPONENT)
    }
}

/// Arguments for [`super::ViewTree::add_descriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorInit {
    pub node_type: NodeType,
    pub parent: Option<DescriptorId>,
    pub flags: DescriptorFlags,
    pub injector_index: Option<u16>,
}

impl DescriptorInit {
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            flags: DescriptorFlags::empty(),
            injector_index: None,
        }
    }

    pub fn with_parent(mut self, parent: DescriptorId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_flags(mut self, flags: DescriptorFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Give the position its own injector scope at `injector_index`.
    pub fn with_injector(mut self, injector_index: u16) -> Self {
        self.injector_index = Some(injector_index);
        self
    }
}

// =============================================================================
// View Record
// =============================================================================

/// Runtime instance of one template.
///
/// The header is the typed fields; `slots` holds one entry per template
/// position, addressed by absolute index minus [`crate::HEADER_OFFSET`].
#[derive(Debug, Clone)]
pub struct ViewRecord {
    pub(crate) flags: ViewFlags,
    pub(crate) parent: Option<ParentRef>,
    pub(crate) declaration_view: Option<ViewId>,
    pub(crate) context: Option<ContextId>,
    pub(crate) host: Option<Slot>,
    pub(crate) host_descriptor: Option<DescriptorId>,
    pub(crate) template: TemplateId,
    pub(crate) slots: Vec<Slot>,
}

impl ViewRecord {
    pub fn flags(&self) -> ViewFlags {
        self.flags
    }

    pub fn is_root(&self) -> bool {
        self.flags.contains(ViewFlags::IS_ROOT)
    }

    /// Raw parent reference (a view or a container).
    pub fn parent(&self) -> Option<ParentRef> {
        self.parent
    }

    pub fn declaration_view(&self) -> Option<ViewId> {
        self.declaration_view
    }

    pub fn context(&self) -> Option<ContextId> {
        self.context
    }

    /// Host render-node reference (component views: the host element).
    pub fn host(&self) -> Option<Slot> {
        self.host
    }

    /// Static root descriptor: where this view is declared in its parent template.
    pub fn host_descriptor(&self) -> Option<DescriptorId> {
        self.host_descriptor
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn set_flags(&mut self, flags: ViewFlags) {
        self.flags |= flags;
    }

    pub fn clear_flags(&mut self, flags: ViewFlags) {
        self.flags &= !flags;
    }

    pub fn set_context(&mut self, context: Option<ContextId>) {
        self.context = context;
    }
}

/// Header values for [`super::ViewTree::create_view`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewInit {
    pub flags: ViewFlags,
    pub declaration_view: Option<ViewId>,
    pub context: Option<ContextId>,
    pub host: Option<Slot>,
    pub host_descriptor: Option<DescriptorId>,
}

impl ViewInit {
    /// Header for a root view.
    pub fn root(context: ContextId) -> Self {
        Self {
            flags: ViewFlags::IS_ROOT,
            context: Some(context),
            ..Default::default()
        }
    }

    /// Header for a view declared at `host_descriptor` inside `declaration_view`.
    pub fn declared(declaration_view: ViewId, host_descriptor: DescriptorId) -> Self {
        Self {
            declaration_view: Some(declaration_view),
            host_descriptor: Some(host_descriptor),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: ContextId) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_host(mut self, host: Slot) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_flags(mut self, flags: ViewFlags) -> Self {
        self.flags |= flags;
        self
    }
}

// =============================================================================
// Container Record
// =============================================================================

/// Dynamic insertion point. Views are kept in document order.
#[derive(Debug, Clone)]
pub struct ContainerRecord {
    pub(crate) host: Slot,
    pub(crate) parent: ViewId,
    pub(crate) views: Vec<ViewId>,
}

impl ContainerRecord {
    /// What the container wraps (its anchor node, or a nested wrapper).
    pub fn host(&self) -> Slot {
        self.host
    }

    /// View that declares this container.
    pub fn parent(&self) -> ViewId {
        self.parent
    }

    pub fn views(&self) -> &[ViewId] {
        &self.views
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

// =============================================================================
// Decoration
// =============================================================================

/// What a decoration wrapper carries for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationKind {
    Styling,
    Animation,
    Named(String),
}

/// Wrapper the engine places around a slot value.
#[derive(Debug, Clone)]
pub struct Decoration {
    pub(crate) kind: DecorationKind,
    pub(crate) host: Slot,
}

impl Decoration {
    pub fn kind(&self) -> &DecorationKind {
        &self.kind
    }

    pub fn host(&self) -> Slot {
        self.host
    }
}

// =============================================================================
// Contexts
// =============================================================================

/// Context of an application root.
pub struct RootContext {
    pub(crate) scheduler: Rc<dyn Scheduler>,
}

impl RootContext {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self { scheduler }
    }

    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }

    /// Hand work to the root's scheduler.
    pub fn schedule(&self, task: Task) {
        self.scheduler.schedule(task);
    }
}

impl fmt::Debug for RootContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootContext")
            .field("pending", &self.scheduler.pending())
            .finish()
    }
}

/// Value a view's context header refers to.
#[derive(Debug)]
pub enum Context {
    Root(RootContext),
    Component { type_name: String },
    Template(BindingValue),
}

impl Context {
    pub fn as_root(&self) -> Option<&RootContext> {
        match self {
            Context::Root(root) => Some(root),
            _ => None,
        }
    }
}
