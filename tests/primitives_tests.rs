//! Primitive Generator Tests
//!
//! Shape-level sanity for the procedural generators: vertex/index counts,
//! bounds, index validity and unit normals.

use glam::Vec3;
use totem::resources::Geometry;
use totem::{
    CapsuleOptions, ConeOptions, CylinderOptions, PlaneOptions, SphereOptions, create_box,
    create_capsule, create_cone, create_cylinder, create_plane, create_sphere,
};

fn assert_well_formed(geo: &Geometry) {
    assert_eq!(geo.positions.len(), geo.normals.len());
    assert_eq!(geo.positions.len(), geo.uvs.len());
    assert_eq!(geo.indices.len() % 3, 0);
    let count = geo.vertex_count() as u32;
    assert!(
        geo.indices.iter().all(|&i| i < count),
        "indices must address existing vertices"
    );
    for normal in &geo.normals {
        let length = Vec3::from_array(*normal).length();
        assert!((length - 1.0).abs() < 1e-4, "normal length {length}");
    }
}

#[test]
fn box_counts_and_bounds() {
    let geo = create_box(2.0, 4.0, 6.0);
    assert_well_formed(&geo);
    assert_eq!(geo.vertex_count(), 24);
    assert_eq!(geo.triangle_count(), 12);

    let bbox = geo.bounding_box.unwrap();
    assert!((bbox.min - Vec3::new(-1.0, -2.0, -3.0)).length() < 1e-5);
    assert!((bbox.max - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
}

#[test]
fn plane_grid_counts() {
    let geo = create_plane(PlaneOptions {
        width: 2.0,
        height: 2.0,
        width_segments: 2,
        height_segments: 3,
    });
    assert_well_formed(&geo);
    assert_eq!(geo.vertex_count(), 3 * 4);
    assert_eq!(geo.triangle_count(), 2 * 3 * 2);
}

#[test]
fn sphere_counts_and_bounds() {
    let geo = create_sphere(SphereOptions {
        radius: 2.0,
        width_segments: 8,
        height_segments: 6,
    });
    assert_well_formed(&geo);
    assert_eq!(geo.vertex_count(), 9 * 7);
    assert_eq!(geo.triangle_count(), 8 * 6 * 2);

    let bbox = geo.bounding_box.unwrap();
    assert!((bbox.half_extents() - Vec3::splat(2.0)).length() < 1e-4);
    assert!(bbox.center().length() < 1e-5);
}

#[test]
fn cylinder_bounds() {
    let geo = create_cylinder(CylinderOptions {
        radius: 0.5,
        height: 2.0,
        radial_segments: 8,
        height_segments: 1,
    });
    assert_well_formed(&geo);
    assert!(geo.triangle_count() > 0);

    let bbox = geo.bounding_box.unwrap();
    assert!((bbox.max.y - 1.0).abs() < 1e-5);
    assert!((bbox.min.y + 1.0).abs() < 1e-5);
    assert!((bbox.max.x - 0.5).abs() < 1e-5);
}

#[test]
fn cone_has_single_cap() {
    let cone = create_cone(ConeOptions {
        radius: 0.5,
        height: 1.0,
        radial_segments: 8,
        height_segments: 1,
    });
    let cylinder = create_cylinder(CylinderOptions {
        radius: 0.5,
        height: 1.0,
        radial_segments: 8,
        height_segments: 1,
    });
    assert_well_formed(&cone);
    // The apex has no cap ring, so the cone carries fewer vertices
    assert!(cone.vertex_count() < cylinder.vertex_count());

    let bbox = cone.bounding_box.unwrap();
    assert!((bbox.max.y - 0.5).abs() < 1e-5);
    assert!((bbox.min.y + 0.5).abs() < 1e-5);
}

#[test]
fn capsule_bounds_include_caps() {
    let geo = create_capsule(CapsuleOptions {
        radius: 0.3,
        height: 1.0,
        radial_segments: 8,
        cap_segments: 4,
    });
    assert_well_formed(&geo);

    let bbox = geo.bounding_box.unwrap();
    assert!((bbox.max.y - 0.5).abs() < 1e-4);
    assert!((bbox.min.y + 0.5).abs() < 1e-4);
    assert!((bbox.max.x - 0.3).abs() < 1e-4);
}

#[test]
fn degenerate_capsule_clamps_side_to_zero() {
    // height <= 2 * radius leaves only the hemispheres
    let geo = create_capsule(CapsuleOptions {
        radius: 0.5,
        height: 0.4,
        radial_segments: 8,
        cap_segments: 4,
    });
    assert_well_formed(&geo);

    let bbox = geo.bounding_box.unwrap();
    assert!((bbox.max.y - 0.5).abs() < 1e-4, "sphere-like when side is zero");
}
