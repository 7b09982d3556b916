//! Scene Graph Tests
//!
//! Tests for:
//! - Node creation and removal, subtree destruction
//! - Hierarchy: attach re-parenting, detach promotion to root
//! - Enabled-in-hierarchy semantics
//! - World-matrix composition

use glam::Vec3;
use totem::scene::{Node, SceneGraph};

// ============================================================================
// Creation & Removal
// ============================================================================

#[test]
fn create_and_get_node() {
    let mut graph = SceneGraph::new();
    let handle = graph.create_node_with_name("a");
    assert_eq!(graph.get_node(handle).unwrap().name.as_deref(), Some("a"));
    assert!(graph.root_nodes().contains(&handle));
}

#[test]
fn remove_subtree_destroys_descendants() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node();
    let child = graph.create_node();
    let grandchild = graph.create_node();
    graph.attach(child, parent);
    graph.attach(grandchild, child);

    graph.remove_subtree(parent);

    assert!(!graph.contains(parent));
    assert!(!graph.contains(child));
    assert!(!graph.contains(grandchild));
    assert!(graph.is_empty());
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn attach_sets_parent_and_child() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node();
    let child = graph.create_node();

    graph.attach(child, parent);

    assert_eq!(graph.get_node(child).unwrap().parent(), Some(parent));
    assert!(graph.get_node(parent).unwrap().children().contains(&child));
    assert!(!graph.root_nodes().contains(&child));
}

#[test]
fn attach_removes_from_old_parent() {
    let mut graph = SceneGraph::new();
    let parent1 = graph.create_node();
    let parent2 = graph.create_node();
    let child = graph.create_node();

    graph.attach(child, parent1);
    graph.attach(child, parent2);

    assert!(
        !graph.get_node(parent1).unwrap().children().contains(&child),
        "child removed from old parent"
    );
    assert!(graph.get_node(parent2).unwrap().children().contains(&child));
}

#[test]
fn attach_to_self_is_a_noop() {
    let mut graph = SceneGraph::new();
    let node = graph.create_node();
    graph.attach(node, node);
    assert_eq!(graph.get_node(node).unwrap().parent(), None);
}

#[test]
fn detach_promotes_to_root_and_keeps_subtree() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node();
    let child = graph.create_node();
    let grandchild = graph.create_node();
    graph.attach(child, parent);
    graph.attach(grandchild, child);

    graph.detach(child);

    assert!(graph.contains(child));
    assert!(graph.contains(grandchild));
    assert_eq!(graph.get_node(child).unwrap().parent(), None);
    assert!(graph.root_nodes().contains(&child));
    assert!(!graph.get_node(parent).unwrap().children().contains(&child));
    assert!(graph.get_node(child).unwrap().children().contains(&grandchild));
}

// ============================================================================
// Enabled State
// ============================================================================

#[test]
fn enabled_in_hierarchy_requires_every_ancestor() {
    let mut graph = SceneGraph::new();
    let root = graph.create_node();
    let mid = graph.create_node();
    let leaf = graph.create_node();
    graph.attach(mid, root);
    graph.attach(leaf, mid);

    assert!(graph.is_enabled_in_hierarchy(leaf));

    graph.set_enabled(mid, false);
    assert!(!graph.is_enabled_in_hierarchy(leaf));
    assert!(graph.is_enabled_in_hierarchy(root));

    graph.set_enabled(mid, true);
    assert!(graph.is_enabled_in_hierarchy(leaf));
}

// ============================================================================
// World Matrices
// ============================================================================

#[test]
fn world_matrices_compose_parent_to_child() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node();
    let child = graph.create_node();
    graph.attach(child, parent);

    graph.get_node_mut(parent).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);
    graph.get_node_mut(child).unwrap().transform.position = Vec3::new(0.0, 2.0, 0.0);

    graph.update_world_matrices();

    let world = graph.get_node(child).unwrap().world_matrix().translation;
    assert!((Vec3::from(world) - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
}

#[test]
fn reattach_marks_transform_dirty() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node();
    let child = graph.create_node();

    // Consume the initial dirty state
    graph
        .get_node_mut(child)
        .unwrap()
        .transform
        .update_local_matrix();

    graph.attach(child, parent);

    assert!(
        graph
            .get_node_mut(child)
            .unwrap()
            .transform
            .update_local_matrix(),
        "attach must force a recompute"
    );
}

#[test]
fn node_defaults() {
    let node = Node::new();
    assert!(node.enabled);
    assert!(node.parent().is_none());
    assert!(node.children().is_empty());
    assert!(node.animation.is_none());
}
