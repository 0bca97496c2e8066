//! # Primitive Shape Generation
//!
//! Tessellation of the X3D primitive geometry nodes. Every shape is centred
//! at the origin in a Y-up frame with its dimensions baked into the
//! positions, outward normals and counter-clockwise winding seen from
//! outside.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};

use super::GeometryBuffer;

/// Which parts of a cylinder or cone to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidParts {
    pub top: bool,
    pub bottom: bool,
    pub side: bool,
}

impl Default for SolidParts {
    fn default() -> Self {
        Self {
            top: true,
            bottom: true,
            side: true,
        }
    }
}

/// Axis-aligned box with the given edge lengths
///
/// Four vertices per face so each face keeps its own normal and UV square.
pub fn generate_box(size: Vector3<f32>) -> GeometryBuffer {
    let half = size * 0.5;
    let x = Vector3::unit_x();
    let y = Vector3::unit_y();
    let z = Vector3::unit_z();
    // (normal, u, v) with u x v == normal
    let faces = [
        (x, -z, y),
        (-x, z, y),
        (y, x, -z),
        (-y, x, z),
        (z, x, y),
        (-z, -x, y),
    ];

    let mut data = GeometryBuffer::new();
    let mut normals = Vec::with_capacity(24);
    let mut tex_coords = Vec::with_capacity(24);

    for (n, u, v) in faces {
        let base = data.positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = n + u * su + v * sv;
            data.positions.push([corner.x * half.x, corner.y * half.y, corner.z * half.z]);
            normals.push(n.into());
            tex_coords.push([(su + 1.0) * 0.5, (sv + 1.0) * 0.5]);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    data.normals = Some(normals);
    data.tex_coords = Some(tex_coords);
    data
}

/// UV sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `segments` - Number of longitude slices (at least 3)
/// * `rings` - Number of latitude bands (at least 2)
pub fn generate_sphere(radius: f32, segments: u32, rings: u32) -> GeometryBuffer {
    let segs = segments.max(3);
    let rings = rings.max(2);

    let mut data = GeometryBuffer::new();
    let mut normals = Vec::new();
    let mut tex_coords = Vec::new();

    for lat in 0..=rings {
        let theta = lat as f32 * PI / rings as f32;
        for long in 0..=segs {
            let phi = long as f32 * TAU / segs as f32;
            let n = [theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()];
            data.positions.push([n[0] * radius, n[1] * radius, n[2] * radius]);
            normals.push(n);
            tex_coords.push([long as f32 / segs as f32, 1.0 - lat as f32 / rings as f32]);
        }
    }

    for lat in 0..rings {
        for long in 0..segs {
            let first = lat * (segs + 1) + long;
            let second = first + segs + 1;
            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    data.normals = Some(normals);
    data.tex_coords = Some(tex_coords);
    data
}

/// Cylinder along Y from `-height / 2` to `height / 2`
pub fn generate_cylinder(radius: f32, height: f32, segments: u32, parts: SolidParts) -> GeometryBuffer {
    let half = height * 0.5;
    let mut data = GeometryBuffer::new();
    let mut normals = Vec::new();
    let mut tex_coords = Vec::new();

    if parts.side {
        let segs = segments.max(3);
        let base = data.positions.len() as u32;
        for i in 0..=segs {
            let (sin, cos) = (i as f32 * TAU / segs as f32).sin_cos();
            let u = i as f32 / segs as f32;
            for (y, v) in [(-half, 0.0), (half, 1.0)] {
                data.positions.push([radius * cos, y, radius * sin]);
                normals.push([cos, 0.0, sin]);
                tex_coords.push([u, v]);
            }
        }
        for i in 0..segs {
            let b0 = base + i * 2;
            let t0 = b0 + 1;
            let b1 = b0 + 2;
            let t1 = b0 + 3;
            data.indices.extend_from_slice(&[b0, t0, b1, t0, t1, b1]);
        }
    }
    if parts.top {
        push_disc(&mut data, &mut normals, &mut tex_coords, radius, half, segments, true);
    }
    if parts.bottom {
        push_disc(&mut data, &mut normals, &mut tex_coords, radius, -half, segments, false);
    }

    data.normals = Some(normals);
    data.tex_coords = Some(tex_coords);
    data
}

/// Cone along Y with its base at `-height / 2` and apex at `height / 2`
pub fn generate_cone(bottom_radius: f32, height: f32, segments: u32, parts: SolidParts) -> GeometryBuffer {
    let half = height * 0.5;
    let segs = segments.max(3);
    let mut data = GeometryBuffer::new();
    let mut normals = Vec::new();
    let mut tex_coords = Vec::new();

    if parts.side {
        let base = data.positions.len() as u32;
        for i in 0..=segs {
            let (sin, cos) = (i as f32 * TAU / segs as f32).sin_cos();
            let slope = Vector3::new(cos * height, bottom_radius, sin * height);
            let n: [f32; 3] = if slope.magnitude2() > 0.0 {
                slope.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            };
            let u = i as f32 / segs as f32;

            data.positions.push([bottom_radius * cos, -half, bottom_radius * sin]);
            normals.push(n);
            tex_coords.push([u, 0.0]);

            // One apex per slice so each slice keeps its own normal
            data.positions.push([0.0, half, 0.0]);
            normals.push(n);
            tex_coords.push([u, 1.0]);
        }
        for i in 0..segs {
            let b0 = base + i * 2;
            data.indices.extend_from_slice(&[b0, b0 + 1, b0 + 2]);
        }
    }
    if parts.bottom {
        push_disc(&mut data, &mut normals, &mut tex_coords, bottom_radius, -half, segs, false);
    }

    data.normals = Some(normals);
    data.tex_coords = Some(tex_coords);
    data
}

/// Flat disc at height `y` facing +Y (`up`) or -Y
fn push_disc(
    data: &mut GeometryBuffer,
    normals: &mut Vec<[f32; 3]>,
    tex_coords: &mut Vec<[f32; 2]>,
    radius: f32,
    y: f32,
    segments: u32,
    up: bool,
) {
    let segs = segments.max(3);
    let n = if up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let center = data.positions.len() as u32;

    data.positions.push([0.0, y, 0.0]);
    normals.push(n);
    tex_coords.push([0.5, 0.5]);

    for i in 0..segs {
        let (sin, cos) = (i as f32 * TAU / segs as f32).sin_cos();
        data.positions.push([radius * cos, y, radius * sin]);
        normals.push(n);
        tex_coords.push([0.5 + cos * 0.5, 0.5 + sin * 0.5]);
    }

    for i in 0..segs {
        let current = center + 1 + i;
        let next = center + 1 + (i + 1) % segs;
        if up {
            data.indices.extend_from_slice(&[center, next, current]);
        } else {
            data.indices.extend_from_slice(&[center, current, next]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::normals::smooth_normals;

    /// Every stored normal agrees with the winding-derived one
    fn assert_winding_matches_normals(data: &GeometryBuffer) {
        let derived = smooth_normals(&data.positions, &data.indices);
        let stored = data.normals.as_ref().unwrap();
        for (i, (a, b)) in derived.iter().zip(stored).enumerate() {
            let dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2];
            assert!(dot > 0.0, "vertex {} winding disagrees with normal", i);
        }
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.bounds(), Some(([-1.0, -2.0, -3.0], [1.0, 2.0, 3.0])));
        assert_winding_matches_normals(&cube);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(2.0, 8, 6);
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
        for p in &sphere.positions {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r - 2.0).abs() < 1e-5);
        }
        assert!(sphere.validate().is_ok());
    }

    #[test]
    fn test_cylinder_parts() {
        let full = generate_cylinder(1.0, 2.0, 8, SolidParts::default());
        assert_eq!(full.triangle_count(), 8 * 2 + 8 * 2);
        assert_winding_matches_normals(&full);

        let tube = generate_cylinder(
            1.0,
            2.0,
            8,
            SolidParts {
                top: false,
                bottom: false,
                side: true,
            },
        );
        assert_eq!(tube.triangle_count(), 16);
    }

    #[test]
    fn test_cone_generation() {
        let cone = generate_cone(1.0, 2.0, 12, SolidParts::default());
        assert_eq!(cone.triangle_count(), 12 + 12);
        let (lo, hi) = cone.bounds().unwrap();
        assert!((lo[1] + 1.0).abs() < 1e-6 && (hi[1] - 1.0).abs() < 1e-6);
        assert_winding_matches_normals(&cone);
    }
}
