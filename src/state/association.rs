//! Association Table - render node back to its owning view.
//!
//! A discovery index, not an ownership relation:
//! - Populated by the engine when a view attaches its render nodes
//! - Cleared by the engine when a render node is discarded
//! - Read by introspection code to get from a node back into the tree
//!
//! Entries hold handles only, so the table never keeps a view alive. Handles
//! are only meaningful inside the tree that issued them, so every entry is
//! keyed by [`TreeId`] as well as the render node. The table is
//! thread-local: the host runs single-threaded and nothing here synchronizes.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::engine::ViewTree;
use crate::error::Result;
use crate::navigation::resolve_render_node;
use crate::types::{ContextId, RenderNodeId, Slot, TreeId, ViewId};

// =============================================================================
// Entries
// =============================================================================

/// Context plus the slot index it was found at.
///
/// Used when several logical views share one render node (a component host
/// element belongs to both the host view and the component view).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextEnvelope {
    pub view: ViewId,
    pub node_index: usize,
    pub component: Option<ContextId>,
}

/// Value stored per render node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    View(ViewId),
    Context(ContextEnvelope),
}

impl Association {
    /// View this entry leads to.
    pub fn view(&self) -> ViewId {
        match self {
            Association::View(view) => *view,
            Association::Context(envelope) => envelope.view,
        }
    }
}

impl From<ViewId> for Association {
    fn from(view: ViewId) -> Self {
        Association::View(view)
    }
}

impl From<ContextEnvelope> for Association {
    fn from(envelope: ContextEnvelope) -> Self {
        Association::Context(envelope)
    }
}

thread_local! {
    /// (tree, render node) to owning view or context envelope.
    static ASSOCIATIONS: RefCell<HashMap<(TreeId, RenderNodeId), Association>> =
        RefCell::new(HashMap::new());
}

// =============================================================================
// Table Operations
// =============================================================================

/// Record (or replace) the entry for `node` in `tree`, returning the previous one.
///
/// The view the entry leads to must exist in `tree`.
pub fn associate(
    tree: &ViewTree,
    node: RenderNodeId,
    value: impl Into<Association>,
) -> Result<Option<Association>> {
    let value = value.into();
    tree.view(value.view())?;
    Ok(ASSOCIATIONS.with(|table| table.borrow_mut().insert((tree.id(), node), value)))
}

/// Stored entry for `node` in `tree`, if any.
pub fn lookup(tree: &ViewTree, node: RenderNodeId) -> Option<Association> {
    ASSOCIATIONS.with(|table| table.borrow().get(&(tree.id(), node)).copied())
}

/// Drop the entry for `node` in `tree`.
pub fn clear(tree: &ViewTree, node: RenderNodeId) -> Option<Association> {
    ASSOCIATIONS.with(|table| table.borrow_mut().remove(&(tree.id(), node)))
}

/// View of `tree` that owns `node`, through either entry kind.
pub fn resolve_owning_view(tree: &ViewTree, node: RenderNodeId) -> Option<ViewId> {
    lookup(tree, node).map(|entry| entry.view())
}

/// Number of live entries across all trees.
pub fn association_count() -> usize {
    ASSOCIATIONS.with(|table| table.borrow().len())
}

// =============================================================================
// Per-View Helpers
// =============================================================================

/// Associate every render node held directly in `view`'s slots.
///
/// Bare nodes and decorated nodes are recorded; nested views and containers
/// are skipped since their nodes belong to other views. Returns how many
/// entries were written.
pub fn associate_view_nodes(tree: &ViewTree, view: ViewId) -> Result<usize> {
    let nodes = owned_nodes(tree, view)?;
    for &node in &nodes {
        associate(tree, node, view)?;
    }
    tracing::trace!(?view, count = nodes.len(), "associated view nodes");
    Ok(nodes.len())
}

/// Remove the entries [`associate_view_nodes`] wrote for `view`.
pub fn clear_view_nodes(tree: &ViewTree, view: ViewId) -> Result<usize> {
    let mut cleared = 0;
    for node in owned_nodes(tree, view)? {
        if lookup(tree, node).is_some_and(|entry| entry.view() == view) {
            clear(tree, node);
            cleared += 1;
        }
    }
    Ok(cleared)
}

fn owned_nodes(tree: &ViewTree, view: ViewId) -> Result<Vec<RenderNodeId>> {
    let mut nodes = Vec::new();
    for &slot in tree.view(view)?.slots() {
        match slot {
            Slot::Node(node) => nodes.push(node),
            Slot::Decorated(_) => nodes.push(resolve_render_node(tree, slot)?),
            Slot::Empty | Slot::View(_) | Slot::Container(_) => {}
        }
    }
    Ok(nodes)
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop every entry.
pub fn reset_associations() {
    ASSOCIATIONS.with(|table| table.borrow_mut().clear());
}
