//! Opaque material payloads.
//!
//! The binding engine treats materials as resolved render resources: it
//! assigns them to mesh instances and falls back to the process-wide default
//! when nothing else resolves, but it never interprets their parameters.
//!
//! Materials carry a process-unique id so scene code can compare identities
//! without comparing parameter blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec4;

static NEXT_MATERIAL_ID: AtomicU64 = AtomicU64::new(1);

/// A standard surface material, shared immutably between owners.
#[derive(Debug)]
pub struct Material {
    id: u64,
    pub name: String,
    pub base_color: Vec4,
    pub metalness: f32,
    pub roughness: f32,
    pub double_sided: bool,
}

impl Material {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            base_color: Vec4::ONE,
            metalness: 0.0,
            roughness: 1.0,
            double_sided: false,
        }
    }

    #[must_use]
    pub fn with_color(name: &str, color: Vec4) -> Self {
        let mut material = Self::new(name);
        material.base_color = color;
        material
    }

    /// The process-wide default material. The rendering subsystem constructs
    /// this once and injects the shared handle into binding contexts; it is
    /// applied whenever no material can be resolved.
    #[must_use]
    pub fn standard_default() -> Arc<Self> {
        Arc::new(Self::with_color(
            "Default Material",
            Vec4::new(0.7, 0.7, 0.7, 1.0),
        ))
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}
