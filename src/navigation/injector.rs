//! Injector Location Codec & Resolver.
//!
//! An injector location says where the parent dependency-injection scope of
//! a template position lives: how many declaration-view hops up
//! (`view_offset`) and which slot in that view (`scope_index`).
//!
//! Inside the crate locations are the explicit [`InjectorLocation`] record.
//! The DI container stores them packed as a [`PackedLocation`]:
//!
//! ```text
//!  31              16 15  14              0
//! +------------------+---+-----------------+
//! |   view offset    | H |   scope index   |
//! +------------------+---+-----------------+
//! ```
//!
//! `H` marks a walk that crossed a component host. All ones is the
//! "no parent injector" sentinel; offset `u16::MAX` is never encoded so no
//! valid location can collide with it.

use crate::engine::ViewTree;
use crate::error::{Link, NavError, Result};
use crate::types::{DescriptorId, ViewId};

// =============================================================================
// Constants
// =============================================================================

pub const INJECTOR_INDEX_MASK: u32 = 0x7FFF;
pub const HOST_BOUNDARY_FLAG: u32 = 1 << 15;
pub const VIEW_OFFSET_SHIFT: u32 = 16;
pub const NO_PARENT_INJECTOR: u32 = u32::MAX;
/// Largest view offset an encoding may carry.
pub const MAX_VIEW_OFFSET: u16 = u16::MAX - 1;

// =============================================================================
// Codec
// =============================================================================

/// Decoded location of a parent injector scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InjectorLocation {
    pub scope_index: u16,
    pub view_offset: u16,
    /// The walk that produced this location passed a component host.
    pub crosses_host_boundary: bool,
}

impl InjectorLocation {
    pub const fn new(scope_index: u16, view_offset: u16) -> Self {
        Self {
            scope_index,
            view_offset,
            crosses_host_boundary: false,
        }
    }

    pub const fn with_host_boundary(mut self) -> Self {
        self.crosses_host_boundary = true;
        self
    }

    /// Pack for storage.
    pub fn encode(self) -> Result<PackedLocation> {
        if u32::from(self.scope_index) > INJECTOR_INDEX_MASK {
            return Err(NavError::ScopeIndexOverflow(self.scope_index));
        }
        if self.view_offset > MAX_VIEW_OFFSET {
            return Err(NavError::OffsetOverflow(u32::from(self.view_offset)));
        }
        let mut raw =
            u32::from(self.scope_index) | (u32::from(self.view_offset) << VIEW_OFFSET_SHIFT);
        if self.crosses_host_boundary {
            raw |= HOST_BOUNDARY_FLAG;
        }
        Ok(PackedLocation(raw))
    }

    /// Unpack a stored location; `None` for the sentinel.
    pub fn decode(packed: PackedLocation) -> Option<Self> {
        packed.has_parent().then(|| Self {
            scope_index: packed.scope_index(),
            view_offset: packed.view_offset(),
            crosses_host_boundary: packed.crosses_host_boundary(),
        })
    }
}

/// Packed injector location as the DI container stores it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedLocation(u32);

impl PackedLocation {
    /// "No parent injector".
    pub const NONE: Self = Self(NO_PARENT_INJECTOR);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn has_parent(self) -> bool {
        self.0 != NO_PARENT_INJECTOR
    }

    #[inline]
    pub const fn scope_index(self) -> u16 {
        (self.0 & INJECTOR_INDEX_MASK) as u16
    }

    #[inline]
    pub const fn view_offset(self) -> u16 {
        (self.0 >> VIEW_OFFSET_SHIFT) as u16
    }

    #[inline]
    pub const fn crosses_host_boundary(self) -> bool {
        self.0 & HOST_BOUNDARY_FLAG != 0
    }
}

impl std::fmt::Debug for PackedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.has_parent() {
            return f.write_str("PackedLocation(NONE)");
        }
        write!(
            f,
            "PackedLocation(scope={}, offset={}{})",
            self.scope_index(),
            self.view_offset(),
            if self.crosses_host_boundary() { ", host" } else { "" }
        )
    }
}

pub fn decode_scope_index(location: PackedLocation) -> u16 {
    location.scope_index()
}

pub fn decode_view_offset(location: PackedLocation) -> u16 {
    location.view_offset()
}

pub fn has_parent(location: PackedLocation) -> bool {
    location.has_parent()
}

// =============================================================================
// Resolver
// =============================================================================

fn declaration_of(tree: &ViewTree, view: ViewId) -> Result<ViewId> {
    tree.view(view)?
        .declaration_view()
        .ok_or(NavError::MissingLink {
            view,
            link: Link::DeclarationView,
        })
}

/// Climb `hops` declaration links from `start`.
fn climb_declarations(tree: &ViewTree, start: ViewId, hops: u16) -> Result<ViewId> {
    let mut view = start;
    let mut guard = tree.hop_guard(start);
    for _ in 0..hops {
        guard.step()?;
        view = declaration_of(tree, view)?;
        tracing::trace!(?view, "injector walk hop");
    }
    Ok(view)
}

/// View whose slots hold the parent injector.
///
/// Offset 0 is `start_view` itself.
pub fn parent_injector_view(
    tree: &ViewTree,
    location: InjectorLocation,
    start_view: ViewId,
) -> Result<ViewId> {
    climb_declarations(tree, start_view, location.view_offset)
}

/// Descriptor of the parent injector of `start_descriptor`.
///
/// When the static parent of `start_descriptor` carries a scope, the answer
/// is found in the static tree: climb while the next parent shares the same
/// scope index, and return the topmost one. Otherwise the scope sits in an
/// ancestor view; the first hop is the start view's own declaration point,
/// so `view_offset - 1` more declaration hops reach the view whose host
/// descriptor is the answer. `None` when that view has no host descriptor.
pub fn parent_injector_descriptor(
    tree: &ViewTree,
    location: InjectorLocation,
    start_view: ViewId,
    start_descriptor: DescriptorId,
) -> Result<Option<DescriptorId>> {
    let static_parent = tree.descriptor(start_descriptor)?.parent;
    if let Some(parent) = static_parent {
        if let Some(scope) = tree.descriptor(parent)?.injector_index {
            let mut current = parent;
            // Positions without an injector of their own inherit the scope
            // of their parent, so equal indices are one scope.
            while let Some(next) = tree.descriptor(current)?.parent {
                if tree.descriptor(next)?.injector_index != Some(scope) {
                    break;
                }
                current = next;
            }
            tracing::trace!(descriptor = ?current, scope, "injector found in template");
            return Ok(Some(current));
        }
    }

    let hops = location.view_offset.saturating_sub(1);
    let view = climb_declarations(tree, start_view, hops)?;
    Ok(tree.view(view)?.host_descriptor())
}

/// Location of the parent injector visible from `descriptor` in `view`.
///
/// Offset 0 when the static parent has a scope. Otherwise host descriptors
/// are examined from the view's own (offset 1) up the declaration chain
/// until one carries a scope. `None` when the chain ends first.
pub fn parent_injector_location(
    tree: &ViewTree,
    view: ViewId,
    descriptor: DescriptorId,
) -> Result<Option<InjectorLocation>> {
    if let Some(parent) = tree.descriptor(descriptor)?.parent {
        if let Some(scope) = tree.descriptor(parent)?.injector_index {
            return Ok(Some(InjectorLocation::new(scope, 0)));
        }
    }

    let mut current = view;
    let mut offset: u32 = 1;
    let mut crosses_host_boundary = false;
    let mut guard = tree.hop_guard(view);
    loop {
        let record = tree.view(current)?;
        let Some(host) = record.host_descriptor() else {
            return Ok(None);
        };
        let host = tree.descriptor(host)?;
        crosses_host_boundary |= host.is_component();
        if let Some(scope) = host.injector_index {
            let view_offset =
                u16::try_from(offset).map_err(|_| NavError::OffsetOverflow(offset))?;
            if view_offset > MAX_VIEW_OFFSET {
                return Err(NavError::OffsetOverflow(offset));
            }
            return Ok(Some(InjectorLocation {
                scope_index: scope,
                view_offset,
                crosses_host_boundary,
            }));
        }
        let Some(declaration) = record.declaration_view() else {
            return Ok(None);
        };
        guard.step()?;
        current = declaration;
        offset += 1;
    }
}
