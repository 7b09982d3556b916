//! Model templates.
//!
//! A [`ModelTemplate`] is the pure-data form of a model as it sits in the
//! asset catalog: a node hierarchy described by indices, mesh slots with
//! geometry, and the catalog-declared default material mapping per mesh.
//!
//! Templates contain no scene handles and are shared immutably via `Arc`.
//! Binding a template clones it into a scene graph, producing a privately
//! owned instance; the template itself is never mutated.

use std::sync::Arc;

use crate::assets::reference::AssetRef;
use crate::resources::geometry::Geometry;
use crate::scene::transform::Transform;

/// One node of a template hierarchy. Children reference their parent by
/// index into [`ModelTemplate::nodes`]; index 0 is the root.
#[derive(Debug, Clone)]
pub struct TemplateNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub parent: Option<usize>,
}

impl TemplateNode {
    #[must_use]
    pub fn new(name: Option<&str>, parent: Option<usize>) -> Self {
        Self {
            name: name.map(str::to_string),
            transform: Transform::new(),
            parent,
        }
    }
}

/// One renderable slot of a template: a geometry attached to a node, plus
/// the descriptor metadata naming its default material, if any.
#[derive(Debug, Clone)]
pub struct MeshTemplate {
    /// Index into [`ModelTemplate::nodes`].
    pub node: usize,
    pub geometry: Arc<Geometry>,
    /// Catalog-declared default material mapping for this mesh index.
    pub material: Option<AssetRef>,
}

/// The pure-data description of a model resource.
#[derive(Debug, Clone)]
pub struct ModelTemplate {
    pub name: String,
    pub nodes: Vec<TemplateNode>,
    pub meshes: Vec<MeshTemplate>,
}

impl ModelTemplate {
    /// A template with a single root node and no meshes.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: vec![TemplateNode::new(Some(name), None)],
            meshes: Vec::new(),
        }
    }

    /// Appends a node under `parent` and returns its index.
    pub fn add_node(&mut self, name: Option<&str>, parent: usize) -> usize {
        debug_assert!(parent < self.nodes.len());
        self.nodes.push(TemplateNode::new(name, Some(parent)));
        self.nodes.len() - 1
    }

    /// Appends a mesh slot and returns its mesh index.
    pub fn add_mesh(
        &mut self,
        node: usize,
        geometry: Arc<Geometry>,
        material: Option<AssetRef>,
    ) -> usize {
        debug_assert!(node < self.nodes.len());
        self.meshes.push(MeshTemplate {
            node,
            geometry,
            material,
        });
        self.meshes.len() - 1
    }

    /// Convenience constructor: one root node carrying one mesh.
    #[must_use]
    pub fn single_mesh(name: &str, geometry: Arc<Geometry>) -> Self {
        let mut template = Self::new(name);
        template.add_mesh(0, geometry, None);
        template
    }

    #[inline]
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// The catalog-declared default material mapping for a mesh index.
    #[must_use]
    pub fn default_mapping(&self, index: usize) -> Option<&AssetRef> {
        self.meshes.get(index)?.material.as_ref()
    }
}
