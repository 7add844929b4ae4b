//! End-to-end snapshot behavior: file round trips, repeated pasting with
//! identity refresh, and structural integrity after edits.

use std::collections::HashSet;

use trellis::geometry::Vector;
use trellis::manager::NodeManager;
use trellis::node::NodeId;

/// Builds a manager holding a three-node cycle: alpha → beta → gamma → alpha
fn cyclic_manager() -> (NodeManager, Vec<NodeId>) {
    let mut manager = NodeManager::default();
    let ids = vec![
        manager.add_node_at(Vector::new(0.0, 0.0)),
        manager.add_node_at(Vector::new(500.0, 0.0)),
        manager.add_node_at(Vector::new(250.0, 400.0)),
    ];
    for (id, text) in ids.iter().zip(["alpha", "beta", "gamma"]) {
        manager.node_mut(*id).unwrap().set_inner_text(text);
        manager.node_mut(*id).unwrap().details = format!("details of {text}");
    }
    assert!(manager.connect(ids[0], ids[1]));
    assert!(manager.connect(ids[1], ids[2]));
    assert!(manager.connect(ids[2], ids[0]));
    (manager, ids)
}

/// Edges as (parent position, child position) pairs, independent of identity
fn positional_edges(manager: &NodeManager) -> Vec<(usize, usize)> {
    let order: Vec<NodeId> = manager.nodes().iter().map(|n| n.id()).collect();
    let mut edges = Vec::new();
    for (parent_pos, node) in manager.nodes().iter().enumerate() {
        for child in node.children() {
            let child_pos = order.iter().position(|id| id == child).unwrap();
            edges.push((parent_pos, child_pos));
        }
    }
    edges
}

#[test]
fn save_then_load_preserves_structure() {
    let (manager, ids) = cyclic_manager();

    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("diagram.json");
    manager.dump().write_to(&path).expect("write snapshot");

    let mut reloaded = NodeManager::default();
    reloaded
        .load(&trellis::snapshot::Snapshot::read_from(&path).expect("read snapshot"))
        .expect("load snapshot");

    assert_eq!(reloaded.node_count(), 3);
    let texts: Vec<&str> = reloaded.nodes().iter().map(|n| n.inner_text()).collect();
    assert_eq!(texts, vec!["alpha", "beta", "gamma"]);
    let details: Vec<&str> = reloaded
        .nodes()
        .iter()
        .map(|n| n.details.as_str())
        .collect();
    assert_eq!(
        details,
        vec!["details of alpha", "details of beta", "details of gamma"]
    );

    // Plain load keeps identities as-is
    let reloaded_ids: Vec<NodeId> = reloaded.nodes().iter().map(|n| n.id()).collect();
    assert_eq!(reloaded_ids, ids);

    // Edge structure survives, compared positionally
    assert_eq!(positional_edges(&reloaded), vec![(0, 1), (1, 2), (2, 0)]);
    assert_eq!(reloaded.connectors().len(), 3);
}

#[test]
fn pasting_twice_with_refresh_never_collides() {
    let (mut manager, _) = cyclic_manager();
    let snapshot = manager.dump();

    manager
        .add_snapshot(&snapshot, Vector::new(2_000.0, 0.0), true)
        .expect("first paste");
    manager
        .add_snapshot(&snapshot, Vector::new(4_000.0, 0.0), true)
        .expect("second paste");

    assert_eq!(manager.node_count(), 9);
    let unique: HashSet<NodeId> = manager.nodes().iter().map(|n| n.id()).collect();
    assert_eq!(unique.len(), 9);

    // Each pasted copy carries its own cycle
    assert_eq!(
        positional_edges(&manager),
        vec![
            (0, 1),
            (1, 2),
            (2, 0),
            (3, 4),
            (4, 5),
            (5, 3),
            (6, 7),
            (7, 8),
            (8, 6),
        ]
    );
    assert_eq!(manager.connectors().len(), 9);
}

#[test]
fn pasted_copies_are_offset() {
    let (mut manager, ids) = cyclic_manager();
    let original_left = manager.node(ids[0]).unwrap().body_shape().left();

    let snapshot = manager.dump();
    manager
        .add_snapshot(&snapshot, Vector::new(2_000.0, 300.0), true)
        .expect("paste");

    let copy = &manager.nodes()[3];
    assert_eq!(copy.body_shape().left(), original_left + 2_000.0);
}

#[test]
fn deleting_a_node_purges_it_everywhere() {
    let (mut manager, ids) = cyclic_manager();

    manager.delete_node(ids[1]);

    assert_eq!(manager.node_count(), 2);
    assert!(manager.node(ids[1]).is_none());
    for node in manager.nodes() {
        assert!(!node.children().contains(&ids[1]));
    }
    // The only surviving edge is gamma → alpha
    assert_eq!(positional_edges(&manager), vec![(1, 0)]);
    assert_eq!(manager.connectors().len(), 1);
}

#[test]
fn translating_a_cycle_moves_every_node_once() {
    let (mut manager, ids) = cyclic_manager();
    let before: Vec<Vector> = manager
        .nodes()
        .iter()
        .map(|n| n.body_shape().location())
        .collect();

    let delta = Vector::new(0.0, 5_000.0);
    manager.move_node_with_children(ids[0], delta);

    for (id, original) in ids.iter().zip(before) {
        let location = manager.node(*id).unwrap().body_shape().location();
        assert_eq!(location, original.add(delta));
    }
}

#[test]
fn grow_lifecycle_creates_exactly_one_connected_node() {
    let mut manager = NodeManager::default();
    let root = manager.add_node_at(Vector::new(0.0, 0.0));
    manager.set_cursor(Some(root));

    // Confirm without prepare does nothing
    assert!(manager.grow_node_confirm().is_none());
    assert_eq!(manager.node_count(), 1);

    // Prepare then cancel creates nothing
    manager.grow_node();
    manager.grow_node_cancel();
    assert_eq!(manager.node_count(), 1);
    assert_eq!(manager.edge_count(), 0);

    // Prepare then confirm creates exactly one child of the cursor
    manager.grow_node();
    let grown = manager.grow_node_confirm().expect("node created");
    assert_eq!(manager.node_count(), 2);
    assert_eq!(manager.node(root).unwrap().children(), &[grown]);
    assert_eq!(manager.edge_count(), 1);
}
