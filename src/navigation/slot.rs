//! Slot Resolver - unwrap polymorphic slot values.
//!
//! A slot may hold a bare render node or a wrapper (view, container,
//! decoration) whose host reference leads further down. Resolution follows
//! host references until it reaches what the caller asked for.

use crate::engine::ViewTree;
use crate::error::{Link, NavError, Result};
use crate::types::{ContainerId, RenderNodeId, Slot, ViewId};

/// True when the slot holds a View Record.
#[inline]
pub fn is_view(slot: Slot) -> bool {
    matches!(slot, Slot::View(_))
}

/// True when the slot holds a Container Record.
#[inline]
pub fn is_container(slot: Slot) -> bool {
    matches!(slot, Slot::Container(_))
}

/// One step down a wrapper: the value it hosts.
fn host_of(tree: &ViewTree, slot: Slot) -> Result<Option<Slot>> {
    match slot {
        Slot::View(view) => tree
            .view(view)?
            .host()
            .map(Some)
            .ok_or(NavError::MissingLink {
                view,
                link: Link::Host,
            }),
        Slot::Container(container) => Ok(Some(tree.container(container)?.host())),
        Slot::Decorated(decoration) => Ok(Some(tree.decoration(decoration)?.host())),
        Slot::Node(_) | Slot::Empty => Ok(None),
    }
}

/// Follow host references down to the underlying render node.
pub fn resolve_render_node(tree: &ViewTree, slot: Slot) -> Result<RenderNodeId> {
    let mut current = slot;
    loop {
        match current {
            Slot::Node(node) => return Ok(node),
            Slot::Empty => return Err(NavError::EmptySlot),
            wrapper => {
                tracing::trace!(?wrapper, "unwrapping slot");
                // Wrappers always carry a host, so `None` is unreachable here.
                current = host_of(tree, wrapper)?.unwrap_or(Slot::Empty);
            }
        }
    }
}

/// Nearest container in the host chain of `slot`, if any.
///
/// A view without a host reference ends the chain.
pub fn resolve_container(tree: &ViewTree, slot: Slot) -> Result<Option<ContainerId>> {
    let mut current = slot;
    loop {
        match current {
            Slot::Container(container) => return Ok(Some(container)),
            Slot::Node(_) | Slot::Empty => return Ok(None),
            Slot::View(view) => match tree.view(view)?.host() {
                Some(host) => current = host,
                None => return Ok(None),
            },
            Slot::Decorated(decoration) => current = tree.decoration(decoration)?.host(),
        }
    }
}

/// View stored in `slot`, unwrapping one wrapper level when needed.
///
/// A component host slot holds the component view directly, or a
/// container/decoration whose host is the component view.
pub fn resolve_component_view(tree: &ViewTree, slot: Slot) -> Result<ViewId> {
    let inner = match slot {
        Slot::View(view) => return Ok(view),
        wrapper if wrapper.is_wrapper() => host_of(tree, wrapper)?.unwrap_or(Slot::Empty),
        other => other,
    };
    match inner {
        Slot::View(view) => Ok(view),
        found => Err(NavError::NotAView { found }),
    }
}
