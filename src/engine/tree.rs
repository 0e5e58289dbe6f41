//! View Tree - Arena of templates, descriptors, views and containers.
//!
//! This is the rendering engine's mutation surface:
//! - Template compilation output (templates + descriptor chains)
//! - View creation and container insert/detach
//! - Component view attachment and slot decoration
//!
//! Records are never freed; a detached view stays reachable by handle.
//! Navigation over the tree lives in [`crate::navigation`].

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::NavConfig;
use crate::error::{Link, NavError, Result};
use crate::types::{
    ContainerId, ContextId, DecorationId, DescriptorId, NodeType, ParentRef, Slot, TemplateId,
    TreeId, ViewFlags, ViewId, HEADER_OFFSET,
};

use super::records::{
    Context, ContainerRecord, Decoration, DecorationKind, DescriptorInit, NodeDescriptor,
    RootContext, Template, TemplateKind, ViewInit, ViewRecord,
};
use super::scheduler::scheduler_for;

// =============================================================================
// Tree State
// =============================================================================

/// Owner of every record a set of views is made of.
#[derive(Debug)]
pub struct ViewTree {
    id: TreeId,
    config: NavConfig,
    templates: Vec<Template>,
    descriptors: Vec<NodeDescriptor>,
    views: Vec<ViewRecord>,
    containers: Vec<ContainerRecord>,
    decorations: Vec<Decoration>,
    contexts: Vec<Context>,
}

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

/// Handle for the next record of an arena currently holding `len` records.
fn next_id(len: usize, kind: &'static str) -> Result<u32> {
    u32::try_from(len).map_err(|_| NavError::ArenaFull { kind })
}

fn unknown(kind: &'static str, index: usize) -> NavError {
    NavError::UnknownHandle { kind, index }
}

impl ViewTree {
    pub fn new(config: NavConfig) -> Self {
        Self {
            id: TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed)),
            config,
            templates: Vec::new(),
            descriptors: Vec::new(),
            views: Vec::new(),
            containers: Vec::new(),
            decorations: Vec::new(),
            contexts: Vec::new(),
        }
    }

    /// Identity distinguishing this tree's handles from other trees'.
    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn config(&self) -> NavConfig {
        self.config
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn template(&self, id: TemplateId) -> Result<&Template> {
        self.templates.get(id.index()).ok_or_else(|| unknown("template", id.index()))
    }

    pub fn descriptor(&self, id: DescriptorId) -> Result<&NodeDescriptor> {
        self.descriptors
            .get(id.index())
            .ok_or_else(|| unknown("descriptor", id.index()))
    }

    pub fn view(&self, id: ViewId) -> Result<&ViewRecord> {
        self.views.get(id.index()).ok_or_else(|| unknown("view", id.index()))
    }

    pub fn view_mut(&mut self, id: ViewId) -> Result<&mut ViewRecord> {
        self.views.get_mut(id.index()).ok_or_else(|| unknown("view", id.index()))
    }

    pub fn container(&self, id: ContainerId) -> Result<&ContainerRecord> {
        self.containers
            .get(id.index())
            .ok_or_else(|| unknown("container", id.index()))
    }

    pub fn decoration(&self, id: DecorationId) -> Result<&Decoration> {
        self.decorations
            .get(id.index())
            .ok_or_else(|| unknown("decoration", id.index()))
    }

    pub fn context(&self, id: ContextId) -> Result<&Context> {
        self.contexts.get(id.index()).ok_or_else(|| unknown("context", id.index()))
    }

    pub fn context_mut(&mut self, id: ContextId) -> Result<&mut Context> {
        self.contexts
            .get_mut(id.index())
            .ok_or_else(|| unknown("context", id.index()))
    }

    // =========================================================================
    // Templates
    // =========================================================================

    pub fn add_template(&mut self, kind: TemplateKind) -> Result<TemplateId> {
        let id = TemplateId(next_id(self.templates.len(), "template")?);
        self.templates.push(Template {
            kind,
            host: None,
            first_child: None,
            descriptors: Vec::new(),
        });
        Ok(id)
    }

    /// Append a descriptor to `template`.
    ///
    /// The descriptor gets the next absolute slot index and is linked at the
    /// end of its parent's child chain (or the template's root chain). Only
    /// element-like positions and container anchors may own a scope.
    pub fn add_descriptor(
        &mut self,
        template: TemplateId,
        init: DescriptorInit,
    ) -> Result<DescriptorId> {
        let index = HEADER_OFFSET + self.template(template)?.slot_count();
        if init.injector_index.is_some() && !init.node_type.can_host_injector() {
            tracing::debug!(node_type = ?init.node_type, "injector on a position that cannot own one");
            return Err(NavError::InjectorNotAllowed(init.node_type));
        }
        let mut injector_index = init.injector_index;
        if let Some(parent) = init.parent {
            let parent_record = self.descriptor(parent)?;
            if parent_record.template != template {
                return Err(NavError::ForeignDescriptor {
                    descriptor: parent,
                    template,
                });
            }
            injector_index = injector_index.or(parent_record.injector_index);
        }

        let id = DescriptorId(next_id(self.descriptors.len(), "descriptor")?);
        self.descriptors.push(NodeDescriptor {
            node_type: init.node_type,
            index,
            flags: init.flags,
            injector_index,
            parent: init.parent,
            next: None,
            child: None,
            template,
        });

        let head = match init.parent {
            Some(parent) => {
                let parent = &mut self.descriptors[parent.index()];
                parent.child.get_or_insert(id);
                parent.child
            }
            None => {
                let template = &mut self.templates[template.index()];
                template.first_child.get_or_insert(id);
                template.first_child
            }
        };
        if let Some(head) = head.filter(|&head| head != id) {
            let mut last = head;
            while let Some(next) = self.descriptors[last.index()].next {
                last = next;
            }
            self.descriptors[last.index()].next = Some(id);
        }

        self.templates[template.index()].descriptors.push(id);
        Ok(id)
    }

    /// Template instantiated at the container `anchor` of another template.
    ///
    /// The new template gets a `View`-type host descriptor that shares the
    /// anchor's slot index and injector scope.
    pub fn add_embedded_template(&mut self, anchor: DescriptorId) -> Result<TemplateId> {
        let anchor_record = self.descriptor(anchor)?;
        let (index, injector_index) = (anchor_record.index, anchor_record.injector_index);

        let template = self.add_template(TemplateKind::Embedded)?;
        let host = DescriptorId(next_id(self.descriptors.len(), "descriptor")?);
        self.descriptors.push(NodeDescriptor {
            node_type: NodeType::View,
            index,
            flags: Default::default(),
            injector_index,
            parent: None,
            next: None,
            child: None,
            template,
        });
        self.templates[template.index()].host = Some(host);
        Ok(template)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Allocate a view of `template` with one empty slot per position.
    pub fn create_view(&mut self, template: TemplateId, init: ViewInit) -> Result<ViewId> {
        let slot_count = self.template(template)?.slot_count();
        if let Some(host) = init.host_descriptor {
            self.descriptor(host)?;
        }
        if let Some(declaration) = init.declaration_view {
            self.view(declaration)?;
        }

        let id = ViewId(next_id(self.views.len(), "view")?);
        self.views.push(ViewRecord {
            flags: init.flags | ViewFlags::CREATION_MODE | ViewFlags::FIRST_PASS | ViewFlags::ATTACHED,
            parent: None,
            declaration_view: init.declaration_view,
            context: init.context,
            host: init.host,
            host_descriptor: init.host_descriptor,
            template,
            slots: vec![Slot::Empty; slot_count],
        });
        tracing::debug!(view = ?id, ?template, slot_count, "created view");
        Ok(id)
    }

    /// Instantiate an embedded template declared inside `declaration_view`.
    ///
    /// The view starts detached; insert it into a container to attach it.
    pub fn create_embedded_view(
        &mut self,
        template: TemplateId,
        declaration_view: ViewId,
        context: Option<ContextId>,
    ) -> Result<ViewId> {
        let host = self.template(template)?.host.ok_or(NavError::MissingLink {
            view: declaration_view,
            link: Link::HostDescriptor,
        })?;
        let init = ViewInit {
            flags: ViewFlags::CHECK_ALWAYS,
            declaration_view: Some(declaration_view),
            context,
            host: None,
            host_descriptor: Some(host),
        };
        self.create_view(template, init)
    }

    fn slot_offset(&self, view: ViewId, index: usize) -> Result<usize> {
        let len = self.view(view)?.slots.len();
        if index < HEADER_OFFSET || index >= HEADER_OFFSET + len {
            return Err(NavError::IndexOutOfRange {
                index,
                start: HEADER_OFFSET,
                end: HEADER_OFFSET + len,
            });
        }
        Ok(index - HEADER_OFFSET)
    }

    /// Read the dynamic slot at absolute `index`.
    pub fn slot(&self, view: ViewId, index: usize) -> Result<Slot> {
        let offset = self.slot_offset(view, index)?;
        Ok(self.views[view.index()].slots[offset])
    }

    /// Store `slot` at absolute `index`.
    pub fn set_slot(&mut self, view: ViewId, index: usize, slot: Slot) -> Result<()> {
        let offset = self.slot_offset(view, index)?;
        self.views[view.index()].slots[offset] = slot;
        Ok(())
    }

    /// Make `view` a child of another view (component views, projected roots).
    pub fn set_parent(&mut self, view: ViewId, parent: Option<ParentRef>) -> Result<()> {
        match parent {
            Some(ParentRef::View(parent)) => {
                self.view(parent)?;
            }
            Some(ParentRef::Container(container)) => {
                self.container(container)?;
            }
            None => {}
        }
        self.view_mut(view)?.parent = parent;
        Ok(())
    }

    /// Host a component view at `index` of `host_view`.
    ///
    /// Whatever the slot held (normally the host element) becomes the
    /// component view's host reference.
    pub fn attach_component_view(
        &mut self,
        host_view: ViewId,
        index: usize,
        component: ViewId,
    ) -> Result<()> {
        let element = self.slot(host_view, index)?;
        let record = self.view_mut(component)?;
        record.host = Some(element);
        record.parent = Some(ParentRef::View(host_view));
        self.set_slot(host_view, index, Slot::View(component))?;
        tracing::debug!(?host_view, index, ?component, "attached component view");
        Ok(())
    }

    // =========================================================================
    // Containers
    // =========================================================================

    /// Turn the slot at `index` into a container anchored on its current value.
    pub fn create_container(&mut self, host_view: ViewId, index: usize) -> Result<ContainerId> {
        let anchor = self.slot(host_view, index)?;
        let id = ContainerId(next_id(self.containers.len(), "container")?);
        self.containers.push(ContainerRecord {
            host: anchor,
            parent: host_view,
            views: Vec::new(),
        });
        self.set_slot(host_view, index, Slot::Container(id))?;
        tracing::debug!(container = ?id, ?host_view, index, "created container");
        Ok(id)
    }

    /// Insert `view` at `position` (document order) and make the container its parent.
    pub fn insert_view(
        &mut self,
        container: ContainerId,
        view: ViewId,
        position: usize,
    ) -> Result<()> {
        self.view(view)?;
        let record = self
            .containers
            .get_mut(container.index())
            .ok_or_else(|| unknown("container", container.index()))?;
        if position > record.views.len() {
            return Err(NavError::IndexOutOfRange {
                index: position,
                start: 0,
                end: record.views.len() + 1,
            });
        }
        record.views.insert(position, view);
        let record = &mut self.views[view.index()];
        record.parent = Some(ParentRef::Container(container));
        record.flags |= ViewFlags::ATTACHED;
        tracing::debug!(?container, ?view, position, "inserted view");
        Ok(())
    }

    /// Remove the view at `position`; it keeps its slots but loses its parent.
    pub fn detach_view(&mut self, container: ContainerId, position: usize) -> Result<ViewId> {
        let record = self
            .containers
            .get_mut(container.index())
            .ok_or_else(|| unknown("container", container.index()))?;
        if position >= record.views.len() {
            return Err(NavError::NoViewAt {
                container,
                position,
            });
        }
        let view = record.views.remove(position);
        let record = &mut self.views[view.index()];
        record.parent = None;
        record.flags &= !ViewFlags::ATTACHED;
        tracing::debug!(?container, ?view, position, "detached view");
        Ok(view)
    }

    // =========================================================================
    // Decorations
    // =========================================================================

    /// Wrap the value at `index` in a decoration record.
    pub fn decorate(
        &mut self,
        view: ViewId,
        index: usize,
        kind: DecorationKind,
    ) -> Result<DecorationId> {
        let host = self.slot(view, index)?;
        let id = DecorationId(next_id(self.decorations.len(), "decoration")?);
        self.decorations.push(Decoration { kind, host });
        self.set_slot(view, index, Slot::Decorated(id))?;
        Ok(id)
    }

    // =========================================================================
    // Contexts
    // =========================================================================

    pub fn add_context(&mut self, context: Context) -> Result<ContextId> {
        let id = ContextId(next_id(self.contexts.len(), "context")?);
        self.contexts.push(context);
        Ok(id)
    }

    /// Root context whose scheduler follows the tree's configuration.
    pub fn create_root_context(&mut self) -> Result<ContextId> {
        let scheduler = scheduler_for(self.config.scheduler);
        self.add_context(Context::Root(RootContext::new(scheduler)))
    }

    // =========================================================================
    // Walk Budget
    // =========================================================================

    /// Guard for walks that follow parent or declaration links.
    pub(crate) fn hop_guard(&self, start: ViewId) -> HopGuard {
        HopGuard {
            remaining: self
                .config
                .checks
                .enabled()
                .then_some(self.views.len()),
            start,
        }
    }
}

/// Limits a walk to one hop per view when checks are on.
#[derive(Debug)]
pub(crate) struct HopGuard {
    remaining: Option<usize>,
    start: ViewId,
}

impl HopGuard {
    pub(crate) fn step(&mut self) -> Result<()> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                tracing::debug!(start = ?self.start, "walk exceeded hop budget");
                return Err(NavError::Cycle { start: self.start });
            }
            *remaining -= 1;
        }
        Ok(())
    }
}
