use crate::scene::NodeHandle;
use crate::scene::render_scene::ModelInstanceId;
use crate::scene::transform::Transform;
use glam::Affine3A;

/// Sibling animation collaborator.
///
/// A node that animates a bound model carries one of these; the model
/// component keeps it pointed at the active instance so the animation
/// system never holds an ownership edge into the binding engine.
#[derive(Debug, Clone, Default)]
pub struct AnimationLink {
    model: Option<ModelInstanceId>,
    mesh_count: usize,
}

impl AnimationLink {
    /// Called by the model component whenever the bound model changes.
    pub fn set_model(&mut self, model: Option<(ModelInstanceId, usize)>) {
        match model {
            Some((id, mesh_count)) => {
                self.model = Some(id);
                self.mesh_count = mesh_count;
            }
            None => {
                self.model = None;
                self.mesh_count = 0;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn model(&self) -> Option<ModelInstanceId> {
        self.model
    }

    #[inline]
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.mesh_count
    }
}

/// A minimal scene node containing only essential hot data.
///
/// # Design Principles
///
/// - Only keeps data that must be traversed every frame (hierarchy,
///   transform, enabled state)
/// - Renderable state lives on mesh instances owned by the model component;
///   nodes stay small and contiguous
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child relationships:
/// - `parent`: optional handle to the parent node (None for roots)
/// - `children`: list of child node handles
#[derive(Debug, Clone)]
pub struct Node {
    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Core Spatial Data ===
    pub transform: Transform,

    // === Core State ===
    pub name: Option<String>,
    /// Local enabled flag; effective state also requires every ancestor to
    /// be enabled (see [`SceneGraph::is_enabled_in_hierarchy`]).
    ///
    /// [`SceneGraph::is_enabled_in_hierarchy`]: crate::scene::SceneGraph::is_enabled_in_hierarchy
    pub enabled: bool,

    /// Optional animation collaborator attached to this node.
    pub animation: Option<AnimationLink>,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            name: None,
            enabled: true,
            animation: None,
        }
    }

    #[must_use]
    pub fn with_name(name: &str) -> Self {
        let mut node = Self::new();
        node.name = Some(name.to_string());
        node
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// The world transformation matrix, updated by the graph's matrix pass.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
