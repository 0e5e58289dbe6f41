//! End-to-end walks over a bootstrapped application tree.

mod common;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_view::config::{CheckMode, NavConfig, SchedulerKind};
use spark_view::engine::{Context, DescriptorInit, TemplateKind, ViewInit, ViewTree};
use spark_view::navigation::{
    self, InjectorLocation, PackedLocation, StartPoint,
};
use spark_view::state::association::{
    associate, associate_view_nodes, clear_view_nodes, resolve_owning_view, reset_associations,
};
use spark_view::{
    ContainerId, DescriptorFlags, DescriptorId, DocumentId, Link, NavError, NodeType,
    RenderNodeId, Slot, ViewId, HEADER_OFFSET,
};

/// Application:
///
/// ```text
/// root template          <app-shell [scope 0]> <app-list [component, scope 1]>
/// list component         <ul> <!--for-->
/// row (embedded at for)  <li> "label"
/// ```
struct App {
    tree: ViewTree,
    root: ViewId,
    list: ViewId,
    rows: Vec<ViewId>,
    list_host: DescriptorId,
    label: DescriptorId,
    container: ContainerId,
}

fn node(n: u64) -> Slot {
    Slot::Node(RenderNodeId(n))
}

fn bootstrap(config: NavConfig, row_count: u64) -> App {
    common::init_test_logging();
    let mut tree = ViewTree::new(config);

    let root_t = tree.add_template(TemplateKind::Root).unwrap();
    tree.add_descriptor(root_t, DescriptorInit::new(NodeType::Element).with_injector(0))
        .unwrap();
    let list_host = tree
        .add_descriptor(
            root_t,
            DescriptorInit::new(NodeType::Element)
                .with_injector(1)
                .with_flags(DescriptorFlags::IS_COMPONENT),
        )
        .unwrap();

    let list_t = tree.add_template(TemplateKind::Component).unwrap();
    tree.add_descriptor(list_t, DescriptorInit::new(NodeType::Element))
        .unwrap();
    let anchor = tree
        .add_descriptor(list_t, DescriptorInit::new(NodeType::Container))
        .unwrap();

    let row_t = tree.add_embedded_template(anchor).unwrap();
    let li = tree
        .add_descriptor(row_t, DescriptorInit::new(NodeType::Element))
        .unwrap();
    let label = tree
        .add_descriptor(row_t, DescriptorInit::new(NodeType::Text).with_parent(li))
        .unwrap();

    let ctx = tree.create_root_context().unwrap();
    let root = tree.create_view(root_t, ViewInit::root(ctx)).unwrap();
    tree.set_slot(root, HEADER_OFFSET, node(1)).unwrap();
    tree.set_slot(root, HEADER_OFFSET + 1, node(2)).unwrap();

    let list_ctx = tree
        .add_context(Context::Component {
            type_name: "AppList".into(),
        })
        .unwrap();
    let list = tree
        .create_view(list_t, ViewInit::declared(root, list_host).with_context(list_ctx))
        .unwrap();
    tree.attach_component_view(root, HEADER_OFFSET + 1, list).unwrap();
    tree.set_slot(list, HEADER_OFFSET, node(10)).unwrap();
    tree.set_slot(list, HEADER_OFFSET + 1, node(11)).unwrap();
    let container = tree.create_container(list, HEADER_OFFSET + 1).unwrap();

    let mut rows = Vec::new();
    for i in 0..row_count {
        let row = tree.create_embedded_view(row_t, list, None).unwrap();
        tree.set_slot(row, HEADER_OFFSET, node(100 + 2 * i)).unwrap();
        tree.set_slot(row, HEADER_OFFSET + 1, node(101 + 2 * i)).unwrap();
        tree.insert_view(container, row, rows.len()).unwrap();
        rows.push(row);
    }

    App {
        tree,
        root,
        list,
        rows,
        list_host,
        label,
        container,
    }
}

#[test]
fn test_root_of_root_is_itself() {
    let app = bootstrap(NavConfig::checked(), 0);
    assert_eq!(navigation::root_view_of(&app.tree, app.root).unwrap(), app.root);
    assert_eq!(navigation::parent_of(&app.tree, app.root).unwrap(), None);
}

#[test]
fn test_render_node_to_root_context() {
    reset_associations();
    let app = bootstrap(NavConfig::checked().with_scheduler(SchedulerKind::Frame), 3);
    for &row in &app.rows {
        assert_eq!(associate_view_nodes(&app.tree, row).unwrap(), 2);
    }

    let clicked = RenderNodeId(103);
    assert_eq!(resolve_owning_view(&app.tree, clicked), Some(app.rows[1]));
    assert_eq!(
        navigation::root_view_of(&app.tree, StartPoint::Node(clicked)).unwrap(),
        app.root
    );

    let ran = Rc::new(Cell::new(0));
    let counter = ran.clone();
    let root_context = navigation::root_context_of(&app.tree, clicked).unwrap();
    root_context.schedule(Box::new(move || counter.set(counter.get() + 1)));
    assert_eq!(ran.get(), 0);
    assert_eq!(root_context.scheduler().flush(), 1);
    assert_eq!(ran.get(), 1);
}

#[test]
fn test_association_round_trip() {
    reset_associations();
    let app = bootstrap(NavConfig::checked(), 1);
    associate(&app.tree, RenderNodeId(500), app.rows[0]).unwrap();
    assert_eq!(resolve_owning_view(&app.tree, RenderNodeId(500)), Some(app.rows[0]));

    associate_view_nodes(&app.tree, app.rows[0]).unwrap();
    assert_eq!(clear_view_nodes(&app.tree, app.rows[0]).unwrap(), 2);
    assert_eq!(resolve_owning_view(&app.tree, RenderNodeId(100)), None);

    assert_eq!(
        navigation::root_view_of(&app.tree, RenderNodeId(100)),
        Err(NavError::Unassociated(RenderNodeId(100)))
    );
}

#[test]
fn test_node_from_another_tree_is_unassociated() {
    reset_associations();
    let first = bootstrap(NavConfig::checked(), 1);
    let second = bootstrap(NavConfig::checked(), 1);
    // Same shape, so the handles are equal across the two trees.
    assert_eq!(first.list, second.list);

    associate(&first.tree, RenderNodeId(77), first.list).unwrap();
    assert_eq!(
        navigation::root_view_of(&first.tree, RenderNodeId(77)).unwrap(),
        first.root
    );
    assert_eq!(
        navigation::root_view_of(&second.tree, RenderNodeId(77)),
        Err(NavError::Unassociated(RenderNodeId(77)))
    );
    assert!(navigation::root_context_of(&second.tree, RenderNodeId(77)).is_err());
}

#[test]
fn test_row_parent_skips_container() {
    let app = bootstrap(NavConfig::checked(), 2);
    let row = app.rows[0];
    assert_eq!(navigation::parent_of(&app.tree, row).unwrap(), Some(app.list));

    let chain: Vec<ViewId> = navigation::ancestors(&app.tree, row)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(chain, vec![app.list, app.root]);
    assert!(navigation::view_attached_to_container(&app.tree, row).unwrap());
}

#[test]
fn test_component_boundary() {
    let app = bootstrap(NavConfig::checked(), 1);
    // Zero hops on a component view.
    assert_eq!(
        navigation::component_boundary_view(&app.tree, app.list).unwrap(),
        app.list
    );
    assert_eq!(
        navigation::component_boundary_view(&app.tree, app.rows[0]).unwrap(),
        app.list
    );
}

#[test]
fn test_root_render_nodes() {
    let app = bootstrap(NavConfig::checked(), 2);
    // The row template has one root position (<li>).
    assert_eq!(
        navigation::last_root_render_node(&app.tree, app.rows[1]).unwrap(),
        RenderNodeId(102)
    );
    // The list ends with its container anchor.
    assert_eq!(
        navigation::last_root_render_node(&app.tree, app.list).unwrap(),
        RenderNodeId(11)
    );
    assert_eq!(
        navigation::resolve_container(&app.tree, Slot::Container(app.container)).unwrap(),
        Some(app.container)
    );
}

#[test]
fn test_component_lookup_from_host_slot() {
    let app = bootstrap(NavConfig::checked(), 0);
    assert_eq!(
        navigation::component_view_by_index(&app.tree, app.root, HEADER_OFFSET + 1).unwrap(),
        app.list
    );
    assert_eq!(
        navigation::native_by_index(&app.tree, app.root, HEADER_OFFSET + 1).unwrap(),
        RenderNodeId(2)
    );
    assert!(matches!(
        navigation::component_view_by_index(&app.tree, app.root, HEADER_OFFSET),
        Err(NavError::NotAView { .. })
    ));
}

#[test]
fn test_injector_from_row_label() {
    let app = bootstrap(NavConfig::checked(), 2);
    let row = app.rows[1];

    let location = navigation::parent_injector_location(&app.tree, row, app.label)
        .unwrap()
        .unwrap();
    // <li> has no scope: the row's host inherits none from the anchor, the
    // list's host carries scope 1.
    assert_eq!(location.scope_index, 1);
    assert_eq!(location.view_offset, 2);
    assert!(location.crosses_host_boundary);

    // Stored packed by the DI container, then read back.
    let stored = location.encode().unwrap();
    let restored = InjectorLocation::decode(stored).unwrap();
    assert_eq!(restored, location);

    let view = navigation::parent_injector_view(&app.tree, restored, row).unwrap();
    let descriptor =
        navigation::parent_injector_descriptor(&app.tree, restored, row, app.label).unwrap();
    assert_eq!(view, app.root);
    assert_eq!(descriptor, Some(app.list_host));
    assert_eq!(
        navigation::native_by_descriptor(&app.tree, view, app.list_host).unwrap(),
        RenderNodeId(2)
    );
}

#[test]
fn test_injector_offset_zero_is_start_view() {
    let app = bootstrap(NavConfig::checked(), 1);
    let location = InjectorLocation::new(4, 0);
    assert_eq!(
        navigation::parent_injector_view(&app.tree, location, app.rows[0]).unwrap(),
        app.rows[0]
    );
    assert!(!navigation::has_parent(PackedLocation::NONE));
}

#[test]
fn test_detached_row_reports_missing_parent() {
    let mut app = bootstrap(NavConfig::checked(), 2);
    let detached = app.tree.detach_view(app.container, 0).unwrap();
    assert_eq!(
        navigation::root_view_of(&app.tree, detached),
        Err(NavError::MissingLink {
            view: detached,
            link: Link::Parent
        })
    );
    assert!(!navigation::view_attached_to_change_detector(&app.tree, detached).unwrap());
    // The remaining row still reaches the root.
    assert_eq!(navigation::root_view_of(&app.tree, app.rows[1]).unwrap(), app.root);
}

#[test]
fn test_document_of_rows() {
    let app = bootstrap(NavConfig::checked().with_checks(CheckMode::Disabled), 1);
    let host: HashMap<RenderNodeId, DocumentId> =
        [(RenderNodeId(2), DocumentId(1)), (RenderNodeId(100), DocumentId(1))]
            .into_iter()
            .collect();
    assert_eq!(
        navigation::document_of(&app.tree, &host, app.list).unwrap(),
        Some(DocumentId(1))
    );
    assert_eq!(
        navigation::document_of(&app.tree, &host, app.rows[0]).unwrap(),
        Some(DocumentId(1))
    );
}
