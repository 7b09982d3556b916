//! Shared test fixture: a catalog, a scene graph, a render scene and the
//! injected default material, plus helpers to drive update turns the way a
//! host engine would (drain catalog events, feed them to components).

#![allow(dead_code)]

use std::sync::Arc;

use totem::assets::{AssetCatalog, AssetId, AssetPayload};
use totem::model::{BindContext, ModelComponent};
use totem::resources::{Geometry, Material, ModelTemplate};
use totem::scene::{RenderScene, SceneGraph};
use totem::create_box;

pub struct Fixture {
    pub catalog: AssetCatalog,
    pub graph: SceneGraph,
    pub scene: RenderScene,
    pub default_material: Arc<Material>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            catalog: AssetCatalog::new(),
            graph: SceneGraph::new(),
            scene: RenderScene::new(),
            default_material: Material::standard_default(),
        }
    }

    pub fn ctx(&mut self) -> BindContext<'_> {
        BindContext {
            catalog: &mut self.catalog,
            graph: &mut self.graph,
            scene: &mut self.scene,
            default_material: &self.default_material,
        }
    }

    /// A component attached to a fresh entity node.
    pub fn component(&mut self) -> ModelComponent {
        let entity = self.graph.create_node_with_name("entity");
        ModelComponent::new(entity)
    }

    /// Delivers the catalog's queued events to one component, the way the
    /// host does once per update turn.
    pub fn pump(&mut self, component: &mut ModelComponent) {
        let events = self.catalog.drain_events();
        for event in &events {
            let mut ctx = self.ctx();
            component.handle_event(event, &mut ctx);
        }
    }

    /// One full turn: pending loads complete, then events are delivered.
    pub fn turn(&mut self, component: &mut ModelComponent) {
        self.catalog.flush_loads();
        self.pump(component);
    }

    pub fn add_model(&mut self, id: u64, path: Option<&str>, template: ModelTemplate) -> AssetId {
        self.catalog
            .add(id, path, AssetPayload::Model(Arc::new(template)))
            .unwrap()
    }

    pub fn add_material(&mut self, id: u64, path: Option<&str>, name: &str) -> AssetId {
        self.catalog
            .add(id, path, AssetPayload::Material(Arc::new(Material::new(name))))
            .unwrap()
    }

    /// Registers a model entry and completes its load in one step.
    pub fn add_loaded_model(
        &mut self,
        id: u64,
        path: Option<&str>,
        template: ModelTemplate,
    ) -> AssetId {
        let id = self.add_model(id, path, template);
        self.catalog.load(id).unwrap();
        self.catalog.flush_loads();
        self.catalog.drain_events();
        id
    }

    /// Registers a material entry and completes its load in one step.
    pub fn add_loaded_material(&mut self, id: u64, path: Option<&str>, name: &str) -> AssetId {
        let id = self.add_material(id, path, name);
        self.catalog.load(id).unwrap();
        self.catalog.flush_loads();
        self.catalog.drain_events();
        id
    }
}

/// A template with one root node and `mesh_count` child nodes each carrying
/// a unit box, with no catalog-declared material mapping.
pub fn simple_template(name: &str, mesh_count: usize) -> ModelTemplate {
    let geometry = Arc::new(create_box(1.0, 1.0, 1.0));
    let mut template = ModelTemplate::new(name);
    for i in 0..mesh_count {
        let node = template.add_node(Some(&format!("{name}_mesh{i}")), 0);
        template.add_mesh(node, Arc::clone(&geometry), None);
    }
    template
}

/// The name of the material currently applied to a mesh of the active
/// instance.
pub fn mesh_material_name(component: &ModelComponent, index: usize) -> String {
    component.model().expect("component has no model").meshes[index]
        .material
        .name
        .clone()
}

pub fn shared_box_geometry() -> Arc<Geometry> {
    Arc::new(create_box(1.0, 1.0, 1.0))
}
