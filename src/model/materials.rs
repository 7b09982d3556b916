//! The material mapping resolver.
//!
//! Resolution order per mesh index:
//!
//! 1. an explicit override from the component mapping table — a `None`
//!    entry forces the process-wide default material;
//! 2. else the bound template's catalog-declared default mapping;
//! 3. else the process-wide default material, immediately.
//!
//! References resolve by id directly, or by path relative to the bound
//! model entry's catalog location. An unresolved id is not an error — it is
//! "no override" and falls through. An unmatched path applies the default
//! material and defers until an entry is registered at that path. Entries
//! that are not yet loaded get a load request and the default material as
//! an interim value; every bound entry is watched for removal so
//! invalidation degrades to the default.
//!
//! Re-resolution always releases the slot's prior watches before
//! establishing new ones, so a stale handler can never mutate a mesh that
//! has since been reassigned.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::assets::catalog::{AssetEvent, AssetEventKind};
use crate::assets::reference::{AssetId, AssetRef};
use crate::assets::subscriptions::{BindingSlot, Watch};
use crate::model::component::ModelComponent;
use crate::model::instance::ModelInstance;
use crate::model::{BindContext, ModelKind};
use crate::resources::Material;

impl ModelComponent {
    // ========================================================================
    // Whole-component material
    // ========================================================================

    /// Rebinds the whole-component material override.
    pub fn set_material_ref(&mut self, reference: Option<AssetRef>, ctx: &mut BindContext<'_>) {
        if self.material_ref == reference {
            return;
        }
        self.material_ref = reference;
        self.rebind_component_material(ctx);
    }

    #[must_use]
    pub fn material_ref(&self) -> Option<&AssetRef> {
        self.material_ref.as_ref()
    }

    /// The resolved component material override, if any.
    #[must_use]
    pub fn material(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    /// The component material with the default as fallback — what a
    /// primitive instance renders with.
    pub(crate) fn component_material(&self, ctx: &BindContext<'_>) -> Arc<Material> {
        self.material
            .clone()
            .unwrap_or_else(|| Arc::clone(ctx.default_material))
    }

    /// Tears down the material slot and resolves the stored reference from
    /// scratch. Also the uniform reaction to every material-slot event:
    /// re-resolving is idempotent and lands in the right state whether the
    /// entry was just registered, loaded, changed or removed.
    pub(crate) fn rebind_component_material(&mut self, ctx: &mut BindContext<'_>) {
        self.ledger.unsubscribe_all(BindingSlot::Material);

        let Some(reference) = self.material_ref.clone() else {
            self.apply_component_material(None, ctx);
            return;
        };

        match reference {
            AssetRef::Id(id) => match self.lookup_material(id, ctx) {
                None => {
                    // Component-level references honor late registration
                    self.ledger
                        .subscribe(BindingSlot::Material, Watch::AddedById(id));
                    self.apply_component_material(None, ctx);
                }
                Some(target) => self.bind_component_material(target, ctx),
            },
            AssetRef::Path(path) => {
                let full = AssetRef::resolve_path(&path, None);
                let target = ctx
                    .catalog
                    .get_by_path(&full)
                    .map(|entry| entry.id())
                    .and_then(|id| self.lookup_material(id, ctx));
                match target {
                    None => {
                        self.ledger
                            .subscribe(BindingSlot::Material, Watch::AddedByPath(full));
                        self.apply_component_material(None, ctx);
                    }
                    Some(target) => self.bind_component_material(target, ctx),
                }
            }
        }
    }

    fn bind_component_material(&mut self, target: MaterialTarget, ctx: &mut BindContext<'_>) {
        let MaterialTarget { id, loaded, payload } = target;
        self.ledger.subscribe(
            BindingSlot::Material,
            Watch::Entry {
                id,
                kind: AssetEventKind::Changed,
            },
        );
        self.ledger.subscribe(
            BindingSlot::Material,
            Watch::Entry {
                id,
                kind: AssetEventKind::Removed,
            },
        );

        if loaded {
            if payload.is_none() {
                log::warn!("Material reference {id} resolved to a non-material payload");
            }
            self.apply_component_material(payload, ctx);
        } else {
            self.ledger.subscribe(
                BindingSlot::Material,
                Watch::Entry {
                    id,
                    kind: AssetEventKind::Loaded,
                },
            );
            self.apply_component_material(None, ctx);
            if let Err(err) = ctx.catalog.load(id) {
                log::warn!("Material load request failed: {err}");
            }
        }
    }

    /// Stores the resolved override and, for primitive models, pushes it
    /// onto every mesh. Asset-backed models are governed by the mapping
    /// table instead.
    fn apply_component_material(
        &mut self,
        material: Option<Arc<Material>>,
        ctx: &mut BindContext<'_>,
    ) {
        self.material = material;
        if self.kind().is_primitive() {
            let resolved = self.component_material(ctx);
            if let Some(model) = &mut self.model {
                for mesh in &mut model.meshes {
                    mesh.material = Arc::clone(&resolved);
                }
            }
        }
    }

    pub(crate) fn on_material_slot_event(&mut self, _event: &AssetEvent, ctx: &mut BindContext<'_>) {
        self.rebind_component_material(ctx);
    }

    // ========================================================================
    // Per-mesh mapping
    // ========================================================================

    /// Sets an explicit mapping entry for a mesh index. `None` forces the
    /// process-wide default material for that index.
    pub fn set_mesh_material(
        &mut self,
        index: usize,
        reference: Option<AssetRef>,
        ctx: &mut BindContext<'_>,
    ) {
        self.mapping.insert(index, reference);
        if self.kind() == ModelKind::Asset && self.model.is_some() {
            self.resolve_mesh_material(index, ctx);
        }
    }

    /// Removes the mapping entry for a mesh index, reverting it to the
    /// template's catalog-declared default.
    pub fn clear_mesh_material(&mut self, index: usize, ctx: &mut BindContext<'_>) {
        self.mapping.remove(&index);
        if self.kind() == ModelKind::Asset && self.model.is_some() {
            self.resolve_mesh_material(index, ctx);
        }
    }

    /// Replaces the whole mapping table.
    pub fn set_mapping(
        &mut self,
        mapping: BTreeMap<usize, Option<AssetRef>>,
        ctx: &mut BindContext<'_>,
    ) {
        self.mapping = mapping;
        if self.kind() == ModelKind::Asset && self.model.is_some() {
            self.resolve_all_mesh_materials(ctx);
        }
    }

    #[must_use]
    pub fn mapping(&self) -> &BTreeMap<usize, Option<AssetRef>> {
        &self.mapping
    }

    /// Re-runs resolution for every mesh index of the active instance.
    pub(crate) fn resolve_all_mesh_materials(&mut self, ctx: &mut BindContext<'_>) {
        let count = self.model.as_ref().map_or(0, ModelInstance::mesh_count);
        for index in 0..count {
            self.resolve_mesh_material(index, ctx);
        }
    }

    pub(crate) fn resolve_mesh_material(&mut self, index: usize, ctx: &mut BindContext<'_>) {
        let slot = BindingSlot::MeshMaterial(index);
        self.ledger.unsubscribe_all(slot);
        if self.model.is_none() {
            return;
        }

        // 1. Explicit override
        match self.mapping.get(&index).cloned() {
            Some(Some(reference)) => {
                if self.try_resolve_mesh_reference(index, &reference, ctx) {
                    return;
                }
                // Unresolved id: no override, fall through
            }
            Some(None) => {
                self.apply_mesh_material(index, Arc::clone(ctx.default_material));
                return;
            }
            None => {}
        }

        // 2. Catalog-declared default mapping of the bound template
        let declared = self
            .bound
            .as_ref()
            .and_then(|bound| bound.template.default_mapping(index).cloned());
        if let Some(reference) = declared
            && self.try_resolve_mesh_reference(index, &reference, ctx)
        {
            return;
        }

        // 3. Process-wide default, immediately, with no pending state
        self.apply_mesh_material(index, Arc::clone(ctx.default_material));
    }

    /// Attempts to bind one reference to one mesh slot. Returns true when
    /// the reference claimed the slot (bound, loading, or deferred on a
    /// path); false when an unresolved id should fall through.
    fn try_resolve_mesh_reference(
        &mut self,
        index: usize,
        reference: &AssetRef,
        ctx: &mut BindContext<'_>,
    ) -> bool {
        let slot = BindingSlot::MeshMaterial(index);
        let target = match reference {
            AssetRef::Id(id) => match self.lookup_material(*id, ctx) {
                Some(target) => target,
                None => return false,
            },
            AssetRef::Path(path) => {
                let base = self
                    .bound
                    .as_ref()
                    .and_then(|bound| bound.base_path.as_deref());
                let full = AssetRef::resolve_path(path, base);
                let id = ctx.catalog.get_by_path(&full).map(|entry| entry.id());
                match id.and_then(|id| self.lookup_material(id, ctx)) {
                    Some(target) => target,
                    None => {
                        // Defer until an entry appears at this path
                        self.apply_mesh_material(index, Arc::clone(ctx.default_material));
                        self.ledger.subscribe(slot, Watch::AddedByPath(full));
                        return true;
                    }
                }
            }
        };

        let MaterialTarget { id, loaded, payload } = target;
        self.ledger.subscribe(
            slot,
            Watch::Entry {
                id,
                kind: AssetEventKind::Removed,
            },
        );

        if loaded {
            match payload {
                Some(material) => self.apply_mesh_material(index, material),
                None => {
                    log::warn!("Mesh {index} mapping {id} resolved to a non-material payload");
                    self.apply_mesh_material(index, Arc::clone(ctx.default_material));
                }
            }
        } else {
            self.apply_mesh_material(index, Arc::clone(ctx.default_material));
            self.ledger.subscribe(
                slot,
                Watch::Entry {
                    id,
                    kind: AssetEventKind::Loaded,
                },
            );
            if let Err(err) = ctx.catalog.load(id) {
                log::warn!("Material load request failed: {err}");
            }
        }
        true
    }

    fn apply_mesh_material(&mut self, index: usize, material: Arc<Material>) {
        if let Some(model) = &mut self.model
            && let Some(mesh) = model.meshes.get_mut(index)
        {
            mesh.material = material;
        }
    }

    pub(crate) fn on_mesh_slot_event(
        &mut self,
        index: usize,
        event: &AssetEvent,
        ctx: &mut BindContext<'_>,
    ) {
        match event.kind {
            // A deferred path matched, or a pending load completed; either
            // way a fresh resolution lands in the right state.
            AssetEventKind::Added | AssetEventKind::Loaded => {
                self.resolve_mesh_material(index, ctx);
            }
            // Invalidation degrades to the process-wide default
            AssetEventKind::Removed => {
                self.ledger.unsubscribe_all(BindingSlot::MeshMaterial(index));
                self.apply_mesh_material(index, Arc::clone(ctx.default_material));
            }
            // Mesh slots do not watch payload swaps
            AssetEventKind::Changed => {}
        }
    }

    fn lookup_material(&self, id: AssetId, ctx: &BindContext<'_>) -> Option<MaterialTarget> {
        let entry = ctx.catalog.get(id)?;
        Some(MaterialTarget {
            id: entry.id(),
            loaded: entry.is_loaded(),
            payload: entry
                .resource()
                .and_then(|payload| payload.as_material().cloned()),
        })
    }
}

struct MaterialTarget {
    id: AssetId,
    loaded: bool,
    payload: Option<Arc<Material>>,
}
