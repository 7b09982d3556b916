//! The model binding manager.
//!
//! [`ModelComponent`] owns the currently-active model instance and keeps it
//! consistent with a declarative configuration: a kind (catalog asset or
//! primitive shape), a model asset reference, a material reference, a
//! per-mesh mapping table and the component-level render flags.
//!
//! All asynchronous behavior funnels through [`ModelComponent::handle_event`]:
//! the host drains the catalog's event queue once per update turn and feeds
//! each event to each component, which consults its subscription ledger to
//! decide whether the event concerns one of its binding slots.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::assets::catalog::{AssetEntry, AssetEvent, AssetEventKind};
use crate::assets::reference::{AssetId, AssetRef};
use crate::assets::subscriptions::{BindingSlot, SubscriptionLedger, Watch};
use crate::model::instance::{MeshInstance, ModelInstance, RenderFlags};
use crate::model::{BindContext, ModelKind};
use crate::resources::Material;
use crate::resources::model::ModelTemplate;
use crate::scene::NodeHandle;
use crate::scene::node::Node;
use crate::scene::render_scene::ModelInstanceId;

/// The model entry the component is currently bound to, kept so mesh
/// material resolution can consult the template's default mapping and
/// resolve relative paths against the entry's location.
pub(crate) struct BoundModel {
    pub id: AssetId,
    pub template: Arc<ModelTemplate>,
    pub base_path: Option<String>,
}

pub struct ModelComponent {
    entity: NodeHandle,
    pub(crate) enabled: bool,
    kind: ModelKind,

    model_asset: Option<AssetId>,
    pub(crate) material_ref: Option<AssetRef>,
    pub(crate) mapping: BTreeMap<usize, Option<AssetRef>>,

    pub(crate) flags: RenderFlags,
    lightmap_size_multiplier: f32,
    pub(crate) batch_group: i32,

    /// Resolved whole-component material override; `None` falls back to the
    /// injected process-wide default.
    pub(crate) material: Option<Arc<Material>>,
    pub(crate) model: Option<ModelInstance>,
    pub(crate) bound: Option<BoundModel>,
    pub(crate) ledger: SubscriptionLedger,
}

impl ModelComponent {
    #[must_use]
    pub fn new(entity: NodeHandle) -> Self {
        Self {
            entity,
            enabled: true,
            kind: ModelKind::Asset,
            model_asset: None,
            material_ref: None,
            mapping: BTreeMap::new(),
            flags: RenderFlags::default(),
            lightmap_size_multiplier: 1.0,
            batch_group: -1,
            material: None,
            model: None,
            bound: None,
            ledger: SubscriptionLedger::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn entity(&self) -> NodeHandle {
        self.entity
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn model(&self) -> Option<&ModelInstance> {
        self.model.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn model_asset(&self) -> Option<AssetId> {
        self.model_asset
    }

    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    #[must_use]
    pub fn flags(&self) -> RenderFlags {
        self.flags
    }

    #[inline]
    #[must_use]
    pub fn batch_group(&self) -> i32 {
        self.batch_group
    }

    #[inline]
    #[must_use]
    pub fn lightmap_size_multiplier(&self) -> f32 {
        self.lightmap_size_multiplier
    }

    /// The slot's dirty flag: true while it awaits asynchronous resolution.
    #[must_use]
    pub fn is_slot_pending(&self, slot: BindingSlot) -> bool {
        self.ledger.is_pending(slot)
    }

    // ========================================================================
    // Model binding
    // ========================================================================

    /// Points the component at a catalog model entry.
    ///
    /// Setting the current id again is a strict no-op: no subscription is
    /// torn down or re-established and scene membership is untouched.
    pub fn set_model_asset(&mut self, id: Option<AssetId>, ctx: &mut BindContext<'_>) {
        if self.model_asset == id {
            return;
        }
        self.model_asset = id;
        if self.kind == ModelKind::Asset {
            self.rebind_model_asset(ctx);
        }
    }

    /// Switches between a catalog-backed model and a generated primitive.
    /// Leaving `Asset` discards any pending model-asset subscription state.
    pub fn set_type(&mut self, kind: ModelKind, ctx: &mut BindContext<'_>) {
        if self.kind == kind {
            return;
        }
        self.kind = kind;
        if kind == ModelKind::Asset {
            self.rebind_model_asset(ctx);
        } else {
            self.ledger.unsubscribe_all(BindingSlot::Model);
            self.bound = None;
            let instance = self.build_primitive_instance(kind, ctx);
            self.set_model_internal(instance, ctx);
        }
    }

    /// Hands the component an instance directly, taking manual control of
    /// the model. The declarative model binding is released.
    pub fn set_model(&mut self, instance: Option<ModelInstance>, ctx: &mut BindContext<'_>) {
        self.ledger.unsubscribe_all(BindingSlot::Model);
        self.bound = None;
        self.model_asset = None;
        self.set_model_internal(instance, ctx);
    }

    /// Replaces the active instance: detaches (and, for private clones,
    /// destroys) the previous one, then wires the new one into the entity,
    /// the render scene, the animation link and the material resolver.
    pub(crate) fn set_model_internal(
        &mut self,
        instance: Option<ModelInstance>,
        ctx: &mut BindContext<'_>,
    ) {
        if let Some(old) = self.model.take() {
            ctx.scene.remove_model(old.id());
            ctx.scene.remove_shadow_caster(old.id());
            ctx.graph.detach(old.root());
            if old.is_owned() {
                ctx.graph.remove_subtree(old.root());
            }
            // The old instance's mesh slots must not outlive it
            for slot in self.ledger.active_slots() {
                if matches!(slot, BindingSlot::MeshMaterial(_)) {
                    self.ledger.unsubscribe_all(slot);
                }
            }
        }

        match instance {
            Some(mut model) => {
                model.entity = Some(self.entity);
                for mesh in &mut model.meshes {
                    mesh.flags = self.flags;
                }
                ctx.graph.attach(model.root(), self.entity);

                let id = model.id();
                let mesh_count = model.mesh_count();
                self.model = Some(model);
                self.refresh_membership(ctx);
                self.notify_animation(Some((id, mesh_count)), ctx);
                if self.kind == ModelKind::Asset {
                    self.resolve_all_mesh_materials(ctx);
                }
            }
            None => self.notify_animation(None, ctx),
        }
    }

    /// Tears down the model slot and resolves the stored asset reference
    /// from scratch.
    pub(crate) fn rebind_model_asset(&mut self, ctx: &mut BindContext<'_>) {
        self.ledger.unsubscribe_all(BindingSlot::Model);
        self.bound = None;

        let Some(id) = self.model_asset else {
            self.set_model_internal(None, ctx);
            return;
        };

        match ctx.catalog.get(id).map(AssetEntry::is_loaded) {
            None => {
                // Late registration is honored exactly once via the ledger
                self.set_model_internal(None, ctx);
                self.ledger.subscribe(BindingSlot::Model, Watch::AddedById(id));
            }
            Some(true) => self.bind_loaded_model(id, ctx),
            Some(false) => {
                self.set_model_internal(None, ctx);
                self.ledger.subscribe(
                    BindingSlot::Model,
                    Watch::Entry {
                        id,
                        kind: AssetEventKind::Loaded,
                    },
                );
                self.ledger.subscribe(
                    BindingSlot::Model,
                    Watch::Entry {
                        id,
                        kind: AssetEventKind::Changed,
                    },
                );
                self.ledger.subscribe(
                    BindingSlot::Model,
                    Watch::Entry {
                        id,
                        kind: AssetEventKind::Removed,
                    },
                );
                if let Err(err) = ctx.catalog.load(id) {
                    log::warn!("Model load request failed: {err}");
                }
            }
        }
    }

    /// Clones the loaded template into the graph and makes it the active
    /// instance. The model slot settles on a `Changed` + `Removed` set.
    fn bind_loaded_model(&mut self, id: AssetId, ctx: &mut BindContext<'_>) {
        let fetched = ctx.catalog.get(id).and_then(|entry| {
            entry.resource().map(|payload| {
                (
                    payload.as_model().cloned(),
                    entry.path().map(str::to_string),
                )
            })
        });

        self.ledger.unsubscribe_all(BindingSlot::Model);
        self.ledger.subscribe(
            BindingSlot::Model,
            Watch::Entry {
                id,
                kind: AssetEventKind::Changed,
            },
        );
        self.ledger.subscribe(
            BindingSlot::Model,
            Watch::Entry {
                id,
                kind: AssetEventKind::Removed,
            },
        );

        match fetched {
            Some((Some(template), base_path)) => {
                let mut instance =
                    ModelInstance::instantiate(template.as_ref(), ctx.graph, ctx.default_material);
                instance.source = Some(id);
                self.bound = Some(BoundModel {
                    id,
                    template,
                    base_path,
                });
                self.set_model_internal(Some(instance), ctx);
            }
            Some((None, _)) => {
                log::warn!("Model reference {id} resolved to a non-model payload");
                self.bound = None;
                self.set_model_internal(None, ctx);
            }
            None => {
                self.bound = None;
                self.set_model_internal(None, ctx);
            }
        }
    }

    fn build_primitive_instance(
        &self,
        kind: ModelKind,
        ctx: &mut BindContext<'_>,
    ) -> Option<ModelInstance> {
        let geometry = kind.generate_geometry()?;
        let root = ctx.graph.add_node(Node::with_name(kind.as_str()));
        let mesh = MeshInstance {
            node: root,
            geometry: Arc::new(geometry),
            material: self.component_material(ctx),
            flags: self.flags,
        };
        Some(ModelInstance::from_parts(root, vec![mesh]))
    }

    // ========================================================================
    // Event routing
    // ========================================================================

    /// Routes one catalog event through the subscription ledger. The only
    /// entry point for asynchronous resolution.
    pub fn handle_event(&mut self, event: &AssetEvent, ctx: &mut BindContext<'_>) {
        let slots = self.ledger.matching_slots(event);
        for slot in slots {
            // Handling an earlier slot may have rebound this one; deliver
            // only to subscription sets that still match.
            if !self.ledger.matching_slots(event).contains(&slot) {
                continue;
            }
            match slot {
                BindingSlot::Model => self.on_model_slot_event(event, ctx),
                BindingSlot::Material => self.on_material_slot_event(event, ctx),
                BindingSlot::MeshMaterial(index) => self.on_mesh_slot_event(index, event, ctx),
            }
        }
    }

    fn on_model_slot_event(&mut self, event: &AssetEvent, ctx: &mut BindContext<'_>) {
        match event.kind {
            // The watched id is now registered; resolve from scratch
            AssetEventKind::Added => self.rebind_model_asset(ctx),
            AssetEventKind::Loaded | AssetEventKind::Changed => {
                self.bind_loaded_model(event.id, ctx);
            }
            AssetEventKind::Removed => {
                self.ledger.unsubscribe_all(BindingSlot::Model);
                self.bound = None;
                self.set_model_internal(None, ctx);
                if let Some(id) = self.model_asset {
                    // Re-arm late registration so a future entry rebinds
                    self.ledger.subscribe(BindingSlot::Model, Watch::AddedById(id));
                }
            }
        }
    }

    // ========================================================================
    // Render flags
    // ========================================================================

    /// Mirrors the cast-shadow flag onto every sub-mesh and keeps the
    /// shadow-caster set consistent while the model is in the scene. The
    /// draw set is never touched here.
    pub fn set_cast_shadows(&mut self, value: bool, ctx: &mut BindContext<'_>) {
        if self.flags.contains(RenderFlags::CAST_SHADOW) == value {
            return;
        }
        self.flags.set(RenderFlags::CAST_SHADOW, value);
        if let Some(model) = &mut self.model {
            for mesh in &mut model.meshes {
                mesh.flags.set(RenderFlags::CAST_SHADOW, value);
            }
            let id = model.id();
            if ctx.scene.contains_model(id) {
                if value {
                    ctx.scene.add_shadow_caster(id);
                } else {
                    ctx.scene.remove_shadow_caster(id);
                }
            }
        }
    }

    pub fn set_receive_shadows(&mut self, value: bool) {
        self.set_flag(RenderFlags::RECEIVE_SHADOW, value);
    }

    pub fn set_static(&mut self, value: bool) {
        self.set_flag(RenderFlags::STATIC, value);
    }

    pub fn set_lightmapped(&mut self, value: bool) {
        self.set_flag(RenderFlags::LIGHTMAPPED, value);
    }

    fn set_flag(&mut self, flag: RenderFlags, value: bool) {
        if self.flags.contains(flag) == value {
            return;
        }
        self.flags.set(flag, value);
        if let Some(model) = &mut self.model {
            for mesh in &mut model.meshes {
                mesh.flags.set(flag, value);
            }
        }
    }

    /// Negative multipliers violate the configuration surface; they are
    /// clamped with a warning rather than treated as fatal.
    pub fn set_lightmap_size_multiplier(&mut self, value: f32) {
        if value < 0.0 {
            log::warn!("Lightmap size multiplier must be >= 0, got {value}; clamping");
            self.lightmap_size_multiplier = 0.0;
        } else {
            self.lightmap_size_multiplier = value;
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Component removal: tears down the model and every subscription.
    pub fn on_remove(&mut self, ctx: &mut BindContext<'_>) {
        self.set_model_internal(None, ctx);
        self.bound = None;
        self.ledger.clear();
    }

    pub(crate) fn notify_animation(
        &self,
        model: Option<(ModelInstanceId, usize)>,
        ctx: &mut BindContext<'_>,
    ) {
        if let Some(node) = ctx.graph.get_node_mut(self.entity)
            && let Some(link) = node.animation.as_mut()
        {
            link.set_model(model);
        }
    }
}
