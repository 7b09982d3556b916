//! Model component subsystem.
//!
//! The model component binds an entity to externally-loaded resources: a
//! model template from the asset catalog (or a generated primitive shape)
//! and, per sub-mesh, a material. The pieces:
//!
//! - [`instance`]: the privately-owned render instance and its mesh list
//! - [`component`]: the binding manager (reference resolution, hot swap,
//!   flag mirroring, event routing)
//! - [`materials`]: the material mapping resolver
//! - [`membership`]: the scene membership controller
//! - [`data`]: the serialized configuration surface

pub mod component;
pub mod data;
pub mod instance;
pub mod materials;
pub mod membership;

pub use component::ModelComponent;
pub use data::{MappingValue, ModelComponentData};
pub use instance::{MeshInstance, ModelInstance, RenderFlags};

use std::str::FromStr;
use std::sync::Arc;

use crate::assets::AssetCatalog;
use crate::errors::TotemError;
use crate::resources::Material;
use crate::resources::geometry::Geometry;
use crate::resources::primitives::{
    CapsuleOptions, ConeOptions, CylinderOptions, PlaneOptions, SphereOptions, create_box,
    create_capsule, create_cone, create_cylinder, create_plane, create_sphere,
};
use crate::scene::{RenderScene, SceneGraph};

/// Everything a binding operation needs from its collaborators.
///
/// The default material is the explicitly injected process-wide fallback
/// resource; it is owned by the rendering subsystem and shared here.
pub struct BindContext<'a> {
    pub catalog: &'a mut AssetCatalog,
    pub graph: &'a mut SceneGraph,
    pub scene: &'a mut RenderScene,
    pub default_material: &'a Arc<Material>,
}

/// What the component renders: a catalog-backed model or a generated
/// primitive shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Asset,
    Box,
    Capsule,
    Cone,
    Cylinder,
    Sphere,
    Plane,
}

impl ModelKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Box => "box",
            Self::Capsule => "capsule",
            Self::Cone => "cone",
            Self::Cylinder => "cylinder",
            Self::Sphere => "sphere",
            Self::Plane => "plane",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_primitive(self) -> bool {
        self != Self::Asset
    }

    /// Generates the primitive geometry for this kind; `None` for `Asset`.
    #[must_use]
    pub fn generate_geometry(self) -> Option<Geometry> {
        let geometry = match self {
            Self::Asset => return None,
            Self::Box => create_box(1.0, 1.0, 1.0),
            Self::Capsule => create_capsule(CapsuleOptions {
                radius: 0.3,
                height: 1.0,
                ..CapsuleOptions::default()
            }),
            Self::Cone => create_cone(ConeOptions {
                radius: 0.5,
                height: 1.0,
                ..ConeOptions::default()
            }),
            Self::Cylinder => create_cylinder(CylinderOptions {
                radius: 0.5,
                height: 1.0,
                ..CylinderOptions::default()
            }),
            Self::Sphere => create_sphere(SphereOptions {
                radius: 0.5,
                ..SphereOptions::default()
            }),
            Self::Plane => create_plane(PlaneOptions::default()),
        };
        Some(geometry)
    }
}

impl FromStr for ModelKind {
    type Err = TotemError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asset" => Ok(Self::Asset),
            "box" => Ok(Self::Box),
            "capsule" => Ok(Self::Capsule),
            "cone" => Ok(Self::Cone),
            "cylinder" => Ok(Self::Cylinder),
            "sphere" => Ok(Self::Sphere),
            "plane" => Ok(Self::Plane),
            other => Err(TotemError::InvalidPrimitiveType(other.to_string())),
        }
    }
}
