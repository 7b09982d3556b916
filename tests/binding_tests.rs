//! Model Binding Tests
//!
//! Tests for:
//! - Deferred binding: loads triggered on reference set, scene membership
//!   deferred until the model resolves
//! - Idempotent rebinding: same-id sets are strict no-ops
//! - Late registration, removal, and payload-swap lifecycles
//! - Clone ownership: private clones destroyed, shared hierarchies detached
//! - Primitive switching and the whole-component material

mod common;

use common::{Fixture, mesh_material_name, shared_box_geometry, simple_template};

use totem::assets::{AssetId, AssetRef, BindingSlot, LoadState};
use totem::model::{MeshInstance, ModelInstance, ModelKind, RenderFlags};
use totem::scene::AnimationLink;

// ============================================================================
// Asynchronous Binding
// ============================================================================

#[test]
fn binding_defers_until_model_loads() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    fx.add_model(42, Some("models/robot.model"), simple_template("robot", 2));
    fx.catalog.drain_events();

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(Some(AssetId(42)), &mut ctx);
    }

    // Interim: a load is in flight, nothing is in the scene yet
    assert!(component.model().is_none());
    assert_eq!(
        fx.catalog.get(AssetId(42)).unwrap().state(),
        LoadState::Loading
    );
    assert!(component.is_slot_pending(BindingSlot::Model));
    assert_eq!(fx.scene.model_count(), 0);

    fx.turn(&mut component);

    let model = component.model().expect("model bound after load");
    assert_eq!(model.mesh_count(), 2);
    assert_eq!(model.source(), Some(AssetId(42)));
    assert!(fx.scene.contains_model(model.id()));
    assert!(fx.scene.contains_shadow_caster(model.id()));
    assert!(!component.is_slot_pending(BindingSlot::Model));
    // No mapping anywhere: the default material, immediately
    assert_eq!(mesh_material_name(&component, 0), "Default Material");
    assert_eq!(mesh_material_name(&component, 1), "Default Material");
}

#[test]
fn binding_loaded_entry_is_immediate() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    let id = fx.add_loaded_model(42, None, simple_template("robot", 3));

    let mut ctx = fx.ctx();
    component.set_model_asset(Some(id), &mut ctx);

    assert_eq!(component.model().unwrap().mesh_count(), 3);
}

#[test]
fn setting_same_reference_is_a_strict_noop() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    let id = fx.add_loaded_model(42, None, simple_template("robot", 1));

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(Some(id), &mut ctx);
    }
    let instance_id = component.model().unwrap().id();

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(Some(id), &mut ctx);
    }

    let model = component.model().unwrap();
    assert_eq!(model.id(), instance_id, "instance must not be re-created");
    assert!(fx.scene.contains_model(instance_id));
    assert!(
        !fx.catalog.has_pending_loads(),
        "no load may be re-triggered"
    );
}

#[test]
fn late_registration_is_honored() {
    let mut fx = Fixture::new();
    let mut component = fx.component();

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(Some(AssetId(7)), &mut ctx);
    }
    assert!(component.model().is_none());
    assert!(component.is_slot_pending(BindingSlot::Model));

    // The entry arrives later; the watch fires exactly once
    fx.add_model(7, None, simple_template("late", 1));
    fx.pump(&mut component);
    assert_eq!(
        fx.catalog.get(AssetId(7)).unwrap().state(),
        LoadState::Loading
    );

    fx.turn(&mut component);
    assert_eq!(component.model().unwrap().source(), Some(AssetId(7)));
}

#[test]
fn removal_unbinds_and_reregistration_rebinds() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    let id = fx.add_loaded_model(42, None, simple_template("robot", 1));

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(Some(id), &mut ctx);
    }
    let instance_id = component.model().unwrap().id();

    fx.catalog.remove(id).unwrap();
    fx.pump(&mut component);

    assert!(component.model().is_none());
    assert!(!fx.scene.contains_model(instance_id));

    // Re-registration under the same id binds again
    fx.add_model(42, None, simple_template("robot", 1));
    fx.pump(&mut component);
    fx.turn(&mut component);
    assert!(component.model().is_some());
}

#[test]
fn payload_swap_reinstantiates() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    let id = fx.add_loaded_model(42, None, simple_template("robot", 2));

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(Some(id), &mut ctx);
    }
    let old = component.model().unwrap();
    let (old_instance, old_root) = (old.id(), old.root());

    fx.catalog
        .replace(
            id,
            totem::assets::AssetPayload::Model(std::sync::Arc::new(simple_template("robot_v2", 3))),
        )
        .unwrap();
    fx.pump(&mut component);

    let model = component.model().unwrap();
    assert_eq!(model.mesh_count(), 3);
    assert_ne!(model.id(), old_instance);
    assert!(!fx.graph.contains(old_root), "old clone destroyed");
    assert!(!fx.scene.contains_model(old_instance));
    assert!(fx.scene.contains_model(model.id()));
}

// ============================================================================
// Ownership on Replacement
// ============================================================================

#[test]
fn nulling_the_reference_destroys_the_private_clone() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    let id = fx.add_loaded_model(42, None, simple_template("robot", 2));

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(Some(id), &mut ctx);
    }
    let model = component.model().unwrap();
    let (instance_id, root) = (model.id(), model.root());
    assert!(model.is_owned());

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(None, &mut ctx);
    }

    assert!(component.model().is_none());
    assert!(!fx.graph.contains(root), "clone subtree destroyed");
    assert!(!fx.scene.contains_model(instance_id));
    let entity = fx.graph.get_node(component.entity()).unwrap();
    assert!(entity.children().is_empty(), "entity no longer parents the root");
}

#[test]
fn shared_instance_is_detached_never_destroyed() {
    let mut fx = Fixture::new();
    let mut component = fx.component();

    let root = fx.graph.create_node_with_name("external");
    let mesh = MeshInstance {
        node: root,
        geometry: shared_box_geometry(),
        material: fx.default_material.clone(),
        flags: RenderFlags::default(),
    };
    let instance = ModelInstance::shared(root, vec![mesh]);
    let instance_id = instance.id();
    assert!(!instance.is_owned());

    {
        let mut ctx = fx.ctx();
        component.set_model(Some(instance), &mut ctx);
    }
    assert!(fx.scene.contains_model(instance_id));
    assert_eq!(fx.graph.get_node(root).unwrap().parent(), Some(component.entity()));

    {
        let mut ctx = fx.ctx();
        component.set_model(None, &mut ctx);
    }

    assert!(fx.graph.contains(root), "catalog-owned hierarchy survives");
    assert!(fx.graph.get_node(root).unwrap().parent().is_none());
    assert!(!fx.scene.contains_model(instance_id));
}

#[test]
fn manual_set_model_releases_declarative_binding() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    let id = fx.add_loaded_model(42, None, simple_template("robot", 1));

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(Some(id), &mut ctx);
    }

    let root = fx.graph.create_node_with_name("manual");
    let mesh = MeshInstance {
        node: root,
        geometry: shared_box_geometry(),
        material: fx.default_material.clone(),
        flags: RenderFlags::default(),
    };
    {
        let mut ctx = fx.ctx();
        component.set_model(Some(ModelInstance::shared(root, vec![mesh])), &mut ctx);
    }
    assert_eq!(component.model_asset(), None);

    // Catalog churn on the former reference no longer reaches the component
    let manual_id = component.model().unwrap().id();
    fx.catalog.remove(id).unwrap();
    fx.pump(&mut component);
    assert_eq!(component.model().unwrap().id(), manual_id);
}

// ============================================================================
// Primitive Types
// ============================================================================

#[test]
fn switching_to_primitive_discards_pending_asset_state() {
    let mut fx = Fixture::new();
    let mut component = fx.component();

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(Some(AssetId(99)), &mut ctx);
    }
    assert!(component.is_slot_pending(BindingSlot::Model));

    {
        let mut ctx = fx.ctx();
        component.set_type(ModelKind::Box, &mut ctx);
    }
    assert!(!component.is_slot_pending(BindingSlot::Model));
    let primitive_id = component.model().unwrap().id();

    // The late registration must not rebind a discarded slot
    fx.add_model(99, None, simple_template("late", 1));
    fx.turn(&mut component);
    assert_eq!(component.kind(), ModelKind::Box);
    assert_eq!(component.model().unwrap().id(), primitive_id);
}

#[test]
fn primitive_uses_component_material() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    let material_id = fx.add_loaded_material(5, None, "chrome");

    {
        let mut ctx = fx.ctx();
        component.set_material_ref(Some(AssetRef::Id(material_id)), &mut ctx);
        component.set_type(ModelKind::Sphere, &mut ctx);
    }

    assert_eq!(component.model().unwrap().mesh_count(), 1);
    assert_eq!(mesh_material_name(&component, 0), "chrome");
}

#[test]
fn switching_back_to_asset_resolves_stored_reference() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    let id = fx.add_loaded_model(42, None, simple_template("robot", 2));

    {
        let mut ctx = fx.ctx();
        component.set_type(ModelKind::Box, &mut ctx);
        component.set_model_asset(Some(id), &mut ctx);
    }
    assert_eq!(component.kind(), ModelKind::Box);
    assert_eq!(component.model().unwrap().mesh_count(), 1);

    {
        let mut ctx = fx.ctx();
        component.set_type(ModelKind::Asset, &mut ctx);
    }
    assert_eq!(component.model().unwrap().mesh_count(), 2);
    assert_eq!(component.model().unwrap().source(), Some(id));
}

// ============================================================================
// Flags, Animation, Degenerate Payloads
// ============================================================================

#[test]
fn render_flags_are_mirrored_onto_new_instances() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    let id = fx.add_loaded_model(42, None, simple_template("robot", 2));

    component.set_static(true);
    {
        let mut ctx = fx.ctx();
        component.set_cast_shadows(false, &mut ctx);
        component.set_model_asset(Some(id), &mut ctx);
    }

    let model = component.model().unwrap();
    for mesh in &model.meshes {
        assert!(mesh.flags.contains(RenderFlags::STATIC));
        assert!(!mesh.flags.contains(RenderFlags::CAST_SHADOW));
        assert!(mesh.flags.contains(RenderFlags::RECEIVE_SHADOW));
    }
    assert!(fx.scene.contains_model(model.id()));
    assert!(
        !fx.scene.contains_shadow_caster(model.id()),
        "cast-shadow disabled before binding"
    );
}

#[test]
fn animation_link_follows_the_bound_model() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    fx.graph.get_node_mut(component.entity()).unwrap().animation = Some(AnimationLink::default());
    let id = fx.add_loaded_model(42, None, simple_template("robot", 2));

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(Some(id), &mut ctx);
    }
    let instance_id = component.model().unwrap().id();
    let link = fx
        .graph
        .get_node(component.entity())
        .unwrap()
        .animation
        .clone()
        .unwrap();
    assert_eq!(link.model(), Some(instance_id));
    assert_eq!(link.mesh_count(), 2);

    {
        let mut ctx = fx.ctx();
        component.set_model_asset(None, &mut ctx);
    }
    let link = fx
        .graph
        .get_node(component.entity())
        .unwrap()
        .animation
        .clone()
        .unwrap();
    assert_eq!(link.model(), None);
}

#[test]
fn non_model_payload_degrades_to_no_model() {
    let mut fx = Fixture::new();
    let mut component = fx.component();
    let material_id = fx.add_loaded_material(8, None, "not-a-model");

    let mut ctx = fx.ctx();
    component.set_model_asset(Some(material_id), &mut ctx);

    assert!(component.model().is_none());
}
