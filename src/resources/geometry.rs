//! CPU-side geometry data.
//!
//! Geometry here is pure data: vertex attributes and indices, plus a cached
//! bounding volume. GPU upload is somebody else's concern; the binding
//! engine only ever needs mesh counts and bounds.

use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn from_points(points: &[[f32; 3]]) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            let p = Vec3::from_array(*p);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// Indexed triangle geometry with planar attributes.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,

    /// Cached bounds, filled by [`Self::compute_bounding_volume`].
    pub bounding_box: Option<BoundingBox>,
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_indices(&mut self, indices: &[u32]) {
        self.indices = indices.to_vec();
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recomputes the cached bounding box from positions.
    pub fn compute_bounding_volume(&mut self) {
        if self.positions.is_empty() {
            self.bounding_box = None;
            return;
        }
        self.bounding_box = Some(BoundingBox::from_points(&self.positions));
    }
}
