//! The active model instance.
//!
//! A [`ModelInstance`] is the currently displayed form of a model: a node
//! subtree in the scene graph plus one [`MeshInstance`] per renderable
//! sub-mesh. Exactly one instance is active per component at a time, and
//! the component's binding manager owns it exclusively.
//!
//! Ownership of the node subtree is explicit: an instance produced by
//! cloning a catalog template (`owned == true`) has its subtree destroyed
//! by the manager on replacement; a catalog-owned shared hierarchy
//! (`owned == false`) is only ever detached, never destroyed, and its
//! meshes are never mutated through a shared template — mesh instances are
//! always this component's private records.

use std::sync::Arc;

use bitflags::bitflags;

use crate::assets::AssetId;
use crate::resources::Material;
use crate::resources::geometry::Geometry;
use crate::resources::model::ModelTemplate;
use crate::scene::node::Node;
use crate::scene::render_scene::ModelInstanceId;
use crate::scene::{NodeHandle, SceneGraph};

bitflags! {
    /// Component-level render flags mirrored onto every sub-mesh whenever
    /// the model or a flag changes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        const CAST_SHADOW    = 1 << 0;
        const RECEIVE_SHADOW = 1 << 1;
        const STATIC         = 1 << 2;
        const LIGHTMAPPED    = 1 << 3;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::CAST_SHADOW | Self::RECEIVE_SHADOW
    }
}

/// One renderable sub-mesh of the active instance.
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub node: NodeHandle,
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
    pub flags: RenderFlags,
}

/// The currently displayed render resource of one component.
pub struct ModelInstance {
    id: ModelInstanceId,
    root: NodeHandle,
    pub meshes: Vec<MeshInstance>,

    /// Back-reference to the owning entity: a lookup key, never an
    /// ownership edge.
    pub(crate) entity: Option<NodeHandle>,
    /// Catalog entry this instance was cloned from, if any.
    pub(crate) source: Option<AssetId>,
    /// True when the manager owns the node subtree and must destroy it on
    /// replacement.
    pub(crate) owned: bool,
}

impl ModelInstance {
    /// Clones a catalog template into the graph, producing a privately
    /// owned instance. Every mesh starts on the default material; the
    /// mapping resolver assigns real materials afterwards.
    #[must_use]
    pub fn instantiate(
        template: &ModelTemplate,
        graph: &mut SceneGraph,
        default_material: &Arc<Material>,
    ) -> Self {
        let mut handles: Vec<NodeHandle> = Vec::with_capacity(template.nodes.len());
        for template_node in &template.nodes {
            let mut node = Node::new();
            node.name = template_node.name.clone();
            node.transform = template_node.transform.clone();
            handles.push(graph.add_node(node));
        }
        for (index, template_node) in template.nodes.iter().enumerate() {
            if let Some(parent) = template_node.parent {
                graph.attach(handles[index], handles[parent]);
            }
        }

        let meshes = template
            .meshes
            .iter()
            .map(|mesh| MeshInstance {
                node: handles[mesh.node],
                geometry: Arc::clone(&mesh.geometry),
                material: Arc::clone(default_material),
                flags: RenderFlags::default(),
            })
            .collect();

        Self {
            id: ModelInstanceId::next(),
            root: handles[0],
            meshes,
            entity: None,
            source: None,
            owned: true,
        }
    }

    /// An instance built from parts the caller constructed in the graph
    /// and hands over completely (primitive shapes).
    #[must_use]
    pub fn from_parts(root: NodeHandle, meshes: Vec<MeshInstance>) -> Self {
        Self {
            id: ModelInstanceId::next(),
            root,
            meshes,
            entity: None,
            source: None,
            owned: true,
        }
    }

    /// Wraps a catalog-owned hierarchy the manager must never destroy —
    /// on replacement it is detached and left alive.
    #[must_use]
    pub fn shared(root: NodeHandle, meshes: Vec<MeshInstance>) -> Self {
        Self {
            id: ModelInstanceId::next(),
            root,
            meshes,
            entity: None,
            source: None,
            owned: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ModelInstanceId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn entity(&self) -> Option<NodeHandle> {
        self.entity
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> Option<AssetId> {
        self.source
    }

    #[inline]
    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    #[inline]
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}
