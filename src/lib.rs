#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod assets;
pub mod errors;
pub mod model;
pub mod resources;
pub mod scene;

pub use assets::{
    AssetCatalog, AssetEntry, AssetEvent, AssetEventKind, AssetId, AssetPayload, AssetRef,
    BindingSlot, LoadState, SubscriptionLedger,
};
pub use errors::{Result, TotemError};
pub use model::{
    BindContext, MeshInstance, ModelComponent, ModelComponentData, ModelInstance, ModelKind,
    RenderFlags,
};
pub use resources::primitives::*;
pub use resources::{Geometry, Material, ModelTemplate};
pub use scene::{AnimationLink, ModelInstanceId, Node, NodeHandle, RenderScene, SceneGraph, Transform};
