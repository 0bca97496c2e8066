//! Normal generation for meshes that do not supply their own

use cgmath::{InnerSpace, Vector3, Zero};

/// Area-weighted averaged vertex normals for an indexed triangle list
///
/// Vertices not referenced by any triangle get +Y.
pub fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vector3::<f32>::zero(); positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }
        let v0 = Vector3::from(positions[i0]);
        let edge1 = Vector3::from(positions[i1]) - v0;
        let edge2 = Vector3::from(positions[i2]) - v0;
        let face_normal = edge1.cross(edge2);

        for i in [i0, i1, i2] {
            sums[i] += face_normal;
        }
    }

    sums.into_iter().map(unit_or_up).collect()
}

/// Normal of a planar polygon by Newell's method
///
/// Robust for concave and slightly non-planar faces. The result follows the
/// counter-clockwise convention; degenerate faces yield zero.
pub fn polygon_normal(points: &[Vector3<f32>]) -> Vector3<f32> {
    let mut n = Vector3::zero();
    for (i, current) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        n.x += (current.y - next.y) * (current.z + next.z);
        n.y += (current.z - next.z) * (current.x + next.x);
        n.z += (current.x - next.x) * (current.y + next.y);
    }
    if n.magnitude2() > f32::EPSILON * f32::EPSILON {
        n.normalize()
    } else {
        Vector3::zero()
    }
}

/// Per-corner normals honouring a crease angle
///
/// `faces` holds the coordinate index of every polygon corner and
/// `face_normals` one unit normal per polygon. A corner's normal averages
/// the normals of all faces touching the same coordinate whose normal is
/// within `crease_angle` radians of its own face. A crease angle of zero
/// produces flat shading.
pub fn crease_normals(
    faces: &[Vec<usize>],
    face_normals: &[Vector3<f32>],
    coord_count: usize,
    crease_angle: f32,
) -> Vec<Vec<Vector3<f32>>> {
    if crease_angle <= 0.0 {
        return faces
            .iter()
            .zip(face_normals)
            .map(|(face, &n)| vec![n; face.len()])
            .collect();
    }

    // Faces touching each coordinate
    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); coord_count];
    for (f, face) in faces.iter().enumerate() {
        for &c in face {
            if c < coord_count && incident[c].last() != Some(&f) {
                incident[c].push(f);
            }
        }
    }

    let cos_crease = crease_angle.cos();
    faces
        .iter()
        .enumerate()
        .map(|(f, face)| {
            let own = face_normals[f];
            face.iter()
                .map(|&c| {
                    let sum = incident
                        .get(c)
                        .into_iter()
                        .flatten()
                        .map(|&g| face_normals[g])
                        .filter(|n| *n == own || n.dot(own) >= cos_crease)
                        .fold(Vector3::zero(), |acc, n| acc + n);
                    if sum.magnitude2() > f32::EPSILON {
                        sum.normalize()
                    } else {
                        own
                    }
                })
                .collect()
        })
        .collect()
}

fn unit_or_up(v: Vector3<f32>) -> [f32; 3] {
    if v.magnitude2() > f32::EPSILON * f32::EPSILON {
        v.normalize().into()
    } else {
        [0.0, 1.0, 0.0]
    }
}
