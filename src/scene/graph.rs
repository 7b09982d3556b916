//! The entity transform graph.
//!
//! A slotmap arena of [`Node`]s with explicit parent-child links. The graph
//! distinguishes two ways of taking a subtree out of play:
//!
//! - [`SceneGraph::detach`] unlinks a node from its parent and promotes it
//!   to a root — used for catalog-owned model hierarchies, which the binding
//!   engine must never destroy;
//! - [`SceneGraph::remove_subtree`] destroys a node and all descendants —
//!   used for privately cloned hierarchies when they are replaced.

use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

pub struct SceneGraph {
    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
        }
    }

    // ========================================================================
    // Node creation and access
    // ========================================================================

    /// Adds a node as a root and returns its handle.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Makes `child` a child of `parent`, detaching it from its previous
    /// parent (or the root list) first. Marks the child's transform dirty so
    /// the next matrix pass recomputes it in the new frame of reference.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself");
            return;
        }
        self.unlink(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        } else {
            log::error!("Parent node not found during attach");
            self.root_nodes.push(child);
            return;
        }

        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Unlinks a node from its parent and promotes it to a root. The node
    /// and its descendants stay alive.
    pub fn detach(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.unlink(handle);
        self.root_nodes.push(handle);
        if let Some(node) = self.nodes.get_mut(handle) {
            node.parent = None;
            node.transform.mark_dirty();
        }
    }

    /// Removes a node and all of its descendants from the graph.
    pub fn remove_subtree(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };
        let children = node.children.clone();
        for child in children {
            self.remove_subtree(child);
        }

        self.unlink(handle);
        self.nodes.remove(handle);
    }

    /// Removes `handle` from its parent's child list or the root list,
    /// whichever holds it.
    fn unlink(&mut self, handle: NodeHandle) {
        let parent = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(parent)
                && let Some(pos) = p.children.iter().position(|&c| c == handle)
            {
                p.children.remove(pos);
            }
        } else if let Some(pos) = self.root_nodes.iter().position(|&r| r == handle) {
            self.root_nodes.remove(pos);
        }
        if let Some(node) = self.nodes.get_mut(handle) {
            node.parent = None;
        }
    }

    // ========================================================================
    // Enabled state
    // ========================================================================

    pub fn set_enabled(&mut self, handle: NodeHandle, enabled: bool) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.enabled = enabled;
        }
    }

    /// Effective enabled state: the node and every ancestor must be enabled.
    #[must_use]
    pub fn is_enabled_in_hierarchy(&self, handle: NodeHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                return false;
            };
            if !node.enabled {
                return false;
            }
            current = node.parent;
        }
        true
    }

    // ========================================================================
    // World-matrix pass
    // ========================================================================

    /// Updates world matrices for the whole graph, parents before children.
    /// Iterative to keep deep hierarchies off the call stack.
    pub fn update_world_matrices(&mut self) {
        let mut stack: Vec<(NodeHandle, glam::Affine3A)> = self
            .root_nodes
            .iter()
            .map(|&h| (h, glam::Affine3A::IDENTITY))
            .collect();

        while let Some((handle, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            node.transform.update_local_matrix();
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);

            for &child in &node.children {
                stack.push((child, world));
            }
        }
    }
}
