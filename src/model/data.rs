//! The serialized configuration surface of the model component.
//!
//! [`ModelComponentData`] is the flat, editor-friendly form of a component:
//! plain ids, path strings and booleans. [`ModelComponent::apply_data`]
//! pushes a record through the ordinary setters, so applying data follows
//! exactly the same binding paths as imperative mutation.
//!
//! An unrecognized `type` string is a broken configuration contract and is
//! rejected before any state changes — the only hard failure in the
//! component.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assets::reference::{AssetId, AssetRef};
use crate::errors::Result;
use crate::model::component::ModelComponent;
use crate::model::{BindContext, ModelKind};

/// A mapping value as it appears in serialized data: a numeric id or a
/// path-like string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingValue {
    Id(u64),
    Path(String),
}

impl From<&MappingValue> for AssetRef {
    fn from(value: &MappingValue) -> Self {
        match value {
            MappingValue::Id(raw) => AssetRef::Id(AssetId(*raw)),
            MappingValue::Path(path) => AssetRef::Path(path.clone()),
        }
    }
}

/// Recognized options of the model component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelComponentData {
    /// One of `asset`, `box`, `capsule`, `cone`, `cylinder`, `sphere`,
    /// `plane`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Model catalog id for `type == "asset"`.
    pub asset: Option<u64>,
    pub material_asset: Option<MappingValue>,
    /// Mesh index → id | path | null (null forces the default material).
    pub mapping: BTreeMap<usize, Option<MappingValue>>,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
    pub is_static: bool,
    pub lightmapped: bool,
    pub lightmap_size_multiplier: f32,
    /// Batch group id; −1 = none.
    pub batch_group_id: i32,
}

impl Default for ModelComponentData {
    fn default() -> Self {
        Self {
            kind: "asset".to_string(),
            asset: None,
            material_asset: None,
            mapping: BTreeMap::new(),
            cast_shadows: true,
            receive_shadows: true,
            is_static: false,
            lightmapped: false,
            lightmap_size_multiplier: 1.0,
            batch_group_id: -1,
        }
    }
}

impl ModelComponentData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ModelComponent {
    /// Applies a full configuration record through the ordinary setters.
    ///
    /// The `type` string is validated first; an unknown value returns
    /// [`TotemError::InvalidPrimitiveType`](crate::errors::TotemError::InvalidPrimitiveType)
    /// with the component untouched.
    pub fn apply_data(
        &mut self,
        data: &ModelComponentData,
        ctx: &mut BindContext<'_>,
    ) -> Result<()> {
        let kind: ModelKind = data.kind.parse()?;

        self.set_cast_shadows(data.cast_shadows, ctx);
        self.set_receive_shadows(data.receive_shadows);
        self.set_static(data.is_static);
        self.set_lightmapped(data.lightmapped);
        self.set_lightmap_size_multiplier(data.lightmap_size_multiplier);
        self.set_batch_group(data.batch_group_id, ctx);

        self.set_type(kind, ctx);
        self.set_material_ref(data.material_asset.as_ref().map(AssetRef::from), ctx);

        let mapping: BTreeMap<usize, Option<AssetRef>> = data
            .mapping
            .iter()
            .map(|(index, value)| (*index, value.as_ref().map(AssetRef::from)))
            .collect();
        self.set_mapping(mapping, ctx);

        self.set_model_asset(data.asset.map(AssetId), ctx);
        Ok(())
    }
}
