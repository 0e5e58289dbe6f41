//! View Tree Navigator - structural walks over the view tree.
//!
//! Two kinds of links are followed here:
//! - the *parent* link (where a view is attached; containers are skipped
//!   so the parent of a view is always a view)
//! - the *declaration* link (where a view's template was declared)
//!
//! All walks are read-only and assume the engine does not insert or detach
//! views while they run.

use crate::engine::{HopGuard, RootContext, ViewTree};
use crate::error::{Link, NavError, Result};
use crate::renderer::RenderHost;
use crate::state::association::resolve_owning_view;
use crate::types::{DescriptorId, DocumentId, NodeType, ParentRef, RenderNodeId, ViewFlags, ViewId};

use super::slot::{resolve_component_view, resolve_render_node};

// =============================================================================
// Start Points
// =============================================================================

/// Where a root walk starts: a view, or a render node looked up in the
/// association table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPoint {
    View(ViewId),
    Node(RenderNodeId),
}

impl From<ViewId> for StartPoint {
    fn from(view: ViewId) -> Self {
        StartPoint::View(view)
    }
}

impl From<RenderNodeId> for StartPoint {
    fn from(node: RenderNodeId) -> Self {
        StartPoint::Node(node)
    }
}

/// Nodes resolve only through entries recorded for this same tree.
fn start_view(tree: &ViewTree, start: StartPoint) -> Result<ViewId> {
    match start {
        StartPoint::View(view) => Ok(view),
        StartPoint::Node(node) => {
            resolve_owning_view(tree, node).ok_or(NavError::Unassociated(node))
        }
    }
}

// =============================================================================
// Flag Tests
// =============================================================================

pub fn is_root(tree: &ViewTree, view: ViewId) -> Result<bool> {
    Ok(tree.view(view)?.is_root())
}

pub fn is_creation_mode(tree: &ViewTree, view: ViewId) -> Result<bool> {
    Ok(tree.view(view)?.flags().contains(ViewFlags::CREATION_MODE))
}

pub fn view_attached_to_change_detector(tree: &ViewTree, view: ViewId) -> Result<bool> {
    Ok(tree.view(view)?.flags().contains(ViewFlags::ATTACHED))
}

/// True when the view currently sits inside a container.
pub fn view_attached_to_container(tree: &ViewTree, view: ViewId) -> Result<bool> {
    Ok(matches!(
        tree.view(view)?.parent(),
        Some(ParentRef::Container(_))
    ))
}

// =============================================================================
// Parent Walks
// =============================================================================

/// Logical parent view.
///
/// A container parent is replaced by the view that declares the container.
/// Root views have no parent; any other view without one is detached and
/// reported as a missing link.
pub fn parent_of(tree: &ViewTree, view: ViewId) -> Result<Option<ViewId>> {
    let record = tree.view(view)?;
    match record.parent() {
        Some(ParentRef::View(parent)) => Ok(Some(parent)),
        Some(ParentRef::Container(container)) => Ok(Some(tree.container(container)?.parent())),
        None if record.is_root() => Ok(None),
        None => Err(NavError::MissingLink {
            view,
            link: Link::Parent,
        }),
    }
}

/// Iterator over the logical ancestors of a view, nearest first.
///
/// Ends after the root; yields one error and stops if the chain breaks.
#[derive(Debug)]
pub struct Ancestors<'t> {
    tree: &'t ViewTree,
    current: Option<ViewId>,
    guard: HopGuard,
}

impl Iterator for Ancestors<'_> {
    type Item = Result<ViewId>;

    fn next(&mut self) -> Option<Self::Item> {
        let view = self.current?;
        let step = self
            .guard
            .step()
            .and_then(|()| parent_of(self.tree, view));
        match step {
            Ok(parent) => {
                self.current = parent;
                parent.map(Ok)
            }
            Err(err) => {
                self.current = None;
                Some(Err(err))
            }
        }
    }
}

pub fn ancestors(tree: &ViewTree, view: ViewId) -> Ancestors<'_> {
    Ancestors {
        tree,
        current: Some(view),
        guard: tree.hop_guard(view),
    }
}

/// Climb parents until a view flagged root.
pub fn root_view_of(tree: &ViewTree, start: impl Into<StartPoint>) -> Result<ViewId> {
    let mut view = start_view(tree, start.into())?;
    let mut guard = tree.hop_guard(view);
    while !tree.view(view)?.is_root() {
        guard.step()?;
        view = parent_of(tree, view)?.ok_or(NavError::MissingLink {
            view,
            link: Link::Parent,
        })?;
        tracing::trace!(?view, "root walk hop");
    }
    Ok(view)
}

/// Root context of the application `start` belongs to.
///
/// Fails when the root view carries no root context, i.e. the view tree is
/// disconnected from its application root.
pub fn root_context_of(tree: &ViewTree, start: impl Into<StartPoint>) -> Result<&RootContext> {
    let root = root_view_of(tree, start)?;
    let missing = NavError::MissingLink {
        view: root,
        link: Link::RootContext,
    };
    let context = tree.view(root)?.context().ok_or(missing.clone())?;
    tree.context(context)?.as_root().ok_or(missing)
}

// =============================================================================
// Declaration Walks
// =============================================================================

/// Nearest view (starting at `view`) that is not an embedded template view.
///
/// Embedded views are replaced by their declaration view until a component
/// or root view is reached.
pub fn component_boundary_view(tree: &ViewTree, view: ViewId) -> Result<ViewId> {
    let mut current = view;
    let mut guard = tree.hop_guard(view);
    loop {
        let record = tree.view(current)?;
        let embedded = match record.host_descriptor() {
            Some(host) => tree.descriptor(host)?.node_type == NodeType::View,
            None => false,
        };
        if !embedded {
            return Ok(current);
        }
        guard.step()?;
        current = record.declaration_view().ok_or(NavError::MissingLink {
            view: current,
            link: Link::DeclarationView,
        })?;
        tracing::trace!(view = ?current, "component boundary hop");
    }
}

// =============================================================================
// Render Nodes
// =============================================================================

fn root_descriptors(tree: &ViewTree, view: ViewId) -> Result<DescriptorId> {
    let template = tree.view(view)?.template();
    tree.template(template)?
        .first_child()
        .ok_or(NavError::MissingLink {
            view,
            link: Link::FirstChild,
        })
}

/// Render node of the view's last root-level position.
///
/// A template compiled with no root positions is a caller error here.
pub fn last_root_render_node(tree: &ViewTree, view: ViewId) -> Result<RenderNodeId> {
    let mut last = root_descriptors(tree, view)?;
    while let Some(next) = tree.descriptor(last)?.next {
        last = next;
    }
    native_by_descriptor(tree, view, last)
}

/// Render node of the view's first root-level position.
pub fn first_root_render_node(tree: &ViewTree, view: ViewId) -> Result<RenderNodeId> {
    let first = root_descriptors(tree, view)?;
    native_by_descriptor(tree, view, first)
}

/// Render node behind the slot at absolute `index`.
pub fn native_by_index(tree: &ViewTree, view: ViewId, index: usize) -> Result<RenderNodeId> {
    resolve_render_node(tree, tree.slot(view, index)?)
}

/// Render node behind `descriptor`'s slot in `view`.
pub fn native_by_descriptor(
    tree: &ViewTree,
    view: ViewId,
    descriptor: DescriptorId,
) -> Result<RenderNodeId> {
    let record = tree.descriptor(descriptor)?;
    if tree.config().checks.enabled() {
        let template = tree.view(view)?.template();
        if record.template != template {
            tracing::debug!(?descriptor, ?view, "descriptor from another template");
            return Err(NavError::ForeignDescriptor {
                descriptor,
                template,
            });
        }
    }
    native_by_index(tree, view, record.index)
}

/// Component view hosted at absolute `index`.
pub fn component_view_by_index(tree: &ViewTree, view: ViewId, index: usize) -> Result<ViewId> {
    resolve_component_view(tree, tree.slot(view, index)?)
}

/// Document owning the view's render nodes.
///
/// Uses the view's host node when it has one, else its first root node.
pub fn document_of(
    tree: &ViewTree,
    host: &impl RenderHost,
    view: ViewId,
) -> Result<Option<DocumentId>> {
    let node = match tree.view(view)?.host() {
        Some(slot) => resolve_render_node(tree, slot)?,
        None => first_root_render_node(tree, view)?,
    };
    Ok(host.owner_document(node))
}
