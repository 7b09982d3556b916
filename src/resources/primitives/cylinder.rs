//! Lathed primitives: cylinder, cone and capsule share a ring-grid builder.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::resources::geometry::Geometry;

pub struct CylinderOptions {
    pub radius: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
}

impl Default for CylinderOptions {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 1.0,
            radial_segments: 20,
            height_segments: 1,
        }
    }
}

pub struct ConeOptions {
    pub radius: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
}

impl Default for ConeOptions {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 1.0,
            radial_segments: 20,
            height_segments: 1,
        }
    }
}

pub struct CapsuleOptions {
    /// Radius of the hemispherical caps and the cylindrical side.
    pub radius: f32,
    /// Total height, caps included.
    pub height: f32,
    pub radial_segments: u32,
    pub cap_segments: u32,
}

impl Default for CapsuleOptions {
    fn default() -> Self {
        Self {
            radius: 0.3,
            height: 1.0,
            radial_segments: 20,
            cap_segments: 6,
        }
    }
}

#[must_use]
pub fn create_cylinder(options: CylinderOptions) -> Geometry {
    build_lathe_body(
        options.radius,
        options.radius,
        options.height,
        options.radial_segments,
        options.height_segments,
    )
}

#[must_use]
pub fn create_cone(options: ConeOptions) -> Geometry {
    build_lathe_body(
        options.radius,
        0.0,
        options.height,
        options.radial_segments,
        options.height_segments,
    )
}

/// Torso grid between two radii plus flat end caps where the radius is
/// non-zero. Y-up, centered on the origin.
fn build_lathe_body(
    radius_bottom: f32,
    radius_top: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> Geometry {
    let radial_segments = radial_segments.max(3);
    let height_segments = height_segments.max(1);
    let half_height = height / 2.0;

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // Side normal tilts with the slope of the profile
    let slope = (radius_bottom - radius_top) / height;
    let normal_scale = 1.0 / (1.0 + slope * slope).sqrt();

    for y in 0..=height_segments {
        let v_ratio = y as f32 / height_segments as f32;
        let py = v_ratio * height - half_height;
        let ring_radius = radius_bottom + (radius_top - radius_bottom) * v_ratio;

        for x in 0..=radial_segments {
            let u_ratio = x as f32 / radial_segments as f32;
            let phi = u_ratio * 2.0 * PI;
            let (sin_phi, cos_phi) = phi.sin_cos();

            positions.push([ring_radius * sin_phi, py, ring_radius * cos_phi]);
            normals.push([
                sin_phi * normal_scale,
                slope * normal_scale,
                cos_phi * normal_scale,
            ]);
            uvs.push([u_ratio, 1.0 - v_ratio]);
        }
    }

    let stride = radial_segments + 1;
    for y in 0..height_segments {
        for x in 0..radial_segments {
            let v0 = y * stride + x;
            let v1 = v0 + 1;
            let v2 = (y + 1) * stride + x;
            let v3 = v2 + 1;

            indices.extend_from_slice(&[v0, v2, v1, v1, v2, v3]);
        }
    }

    // End caps: triangle fan around a center vertex
    for (ring_radius, py, up) in [
        (radius_bottom, -half_height, false),
        (radius_top, half_height, true),
    ] {
        if ring_radius <= 0.0 {
            continue;
        }
        let normal_y = if up { 1.0 } else { -1.0 };
        let center = positions.len() as u32;
        positions.push([0.0, py, 0.0]);
        normals.push([0.0, normal_y, 0.0]);
        uvs.push([0.5, 0.5]);

        for x in 0..=radial_segments {
            let phi = x as f32 / radial_segments as f32 * 2.0 * PI;
            let (sin_phi, cos_phi) = phi.sin_cos();
            positions.push([ring_radius * sin_phi, py, ring_radius * cos_phi]);
            normals.push([0.0, normal_y, 0.0]);
            uvs.push([0.5 + sin_phi * 0.5, 0.5 + cos_phi * 0.5]);
        }

        for x in 0..radial_segments {
            let a = center + 1 + x;
            let b = center + 2 + x;
            if up {
                indices.extend_from_slice(&[center, a, b]);
            } else {
                indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    let mut geo = Geometry::new();
    geo.positions = positions;
    geo.normals = normals;
    geo.uvs = uvs;
    geo.set_indices(&indices);
    geo.compute_bounding_volume();

    geo
}

#[must_use]
pub fn create_capsule(options: CapsuleOptions) -> Geometry {
    let radius = options.radius;
    let radial_segments = options.radial_segments.max(3);
    let cap_segments = options.cap_segments.max(1);
    // The cylindrical side shrinks to nothing when height <= 2 * radius
    let side_half = (options.height / 2.0 - radius).max(0.0);

    // Profile rings from the bottom pole to the top pole; the equator ring
    // appears twice, once at the bottom of the side and once at the top.
    let mut rings: Vec<(f32, f32, f32)> = Vec::new(); // (ring_radius, y, normal_y_angle)
    for i in 0..=cap_segments {
        let angle = -FRAC_PI_2 + (i as f32 / cap_segments as f32) * FRAC_PI_2;
        rings.push((radius * angle.cos(), -side_half + radius * angle.sin(), angle));
    }
    for i in 0..=cap_segments {
        let angle = (i as f32 / cap_segments as f32) * FRAC_PI_2;
        rings.push((radius * angle.cos(), side_half + radius * angle.sin(), angle));
    }

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let total_height = 2.0 * (side_half + radius);
    for (ring_radius, py, angle) in &rings {
        let (normal_y, normal_xz) = (angle.sin(), angle.cos());
        for x in 0..=radial_segments {
            let u_ratio = x as f32 / radial_segments as f32;
            let phi = u_ratio * 2.0 * PI;
            let (sin_phi, cos_phi) = phi.sin_cos();

            positions.push([ring_radius * sin_phi, *py, ring_radius * cos_phi]);
            normals.push([sin_phi * normal_xz, normal_y, cos_phi * normal_xz]);
            uvs.push([u_ratio, 0.5 - py / total_height]);
        }
    }

    let stride = radial_segments + 1;
    for ring in 0..rings.len() as u32 - 1 {
        for x in 0..radial_segments {
            let v0 = ring * stride + x;
            let v1 = v0 + 1;
            let v2 = (ring + 1) * stride + x;
            let v3 = v2 + 1;

            indices.extend_from_slice(&[v0, v1, v2, v1, v3, v2]);
        }
    }

    let mut geo = Geometry::new();
    geo.positions = positions;
    geo.normals = normals;
    geo.uvs = uvs;
    geo.set_indices(&indices);
    geo.compute_bounding_volume();

    geo
}
