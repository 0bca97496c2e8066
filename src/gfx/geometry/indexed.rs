//! # Indexed Geometry
//!
//! Builders for the polygon and triangle family of X3D geometry nodes.
//!
//! [`IndexedFaceSet`] splits `coordIndex` into polygons at every `-1`, fan
//! triangulates each polygon from its first corner and emits one vertex per
//! polygon corner, so per-face attributes stay sharp. A polygon of `k`
//! corners always yields `k - 2` triangles.
//!
//! [`IndexedTriangles`] covers `IndexedTriangleSet`, `IndexedTriangleStripSet`,
//! `IndexedTriangleFanSet`, `IndexedQuadSet` and their non-indexed siblings.
//! Those nodes share vertices, so their buffers keep the input coordinates
//! as-is and only rewrite the index list.

use cgmath::{Vector2, Vector3};

use super::normals::{crease_normals, polygon_normal, smooth_normals};
use super::{vertex_budget, GeometryBuffer};
use crate::document::Rgb;
use crate::error::GeometryError;

const WHITE: Rgb = [1.0, 1.0, 1.0];

/// Decoded fields of an `IndexedFaceSet`
#[derive(Debug, Clone)]
pub struct IndexedFaceSet {
    pub coords: Vec<Vector3<f32>>,
    pub coord_index: Vec<i32>,
    pub normals: Vec<Vector3<f32>>,
    pub normal_index: Vec<i32>,
    pub normal_per_vertex: bool,
    pub colors: Vec<Rgb>,
    pub color_index: Vec<i32>,
    pub color_per_vertex: bool,
    pub tex_coords: Vec<Vector2<f32>>,
    pub tex_coord_index: Vec<i32>,
    pub ccw: bool,
    /// Radians; zero means faceted
    pub crease_angle: f32,
}

impl Default for IndexedFaceSet {
    fn default() -> Self {
        Self {
            coords: Vec::new(),
            coord_index: Vec::new(),
            normals: Vec::new(),
            normal_index: Vec::new(),
            normal_per_vertex: true,
            colors: Vec::new(),
            color_index: Vec::new(),
            color_per_vertex: true,
            tex_coords: Vec::new(),
            tex_coord_index: Vec::new(),
            ccw: true,
            crease_angle: 0.0,
        }
    }
}

/// One `-1` delimited polygon
#[derive(Debug)]
struct Face {
    /// Position among all delimited faces, including skipped degenerate ones
    ordinal: usize,
    /// Offset of the first corner inside `coordIndex`
    start: usize,
    corners: Vec<usize>,
}

impl IndexedFaceSet {
    pub fn build(&self) -> Result<GeometryBuffer, GeometryError> {
        if self.coords.is_empty() {
            return Err(GeometryError::MissingCoordinates);
        }
        if self.coord_index.is_empty() {
            return Err(GeometryError::MissingIndices);
        }
        // Every output vertex is one polygon corner
        vertex_budget(Some(self.coord_index.len()))?;

        let faces = self.faces()?;
        if faces.is_empty() {
            return Err(GeometryError::Empty);
        }

        let corner_normals = self.corner_normals(&faces);
        let mut buffer = GeometryBuffer::new();
        let mut normals = Vec::new();
        let mut colors = (!self.colors.is_empty()).then(Vec::new);
        let mut tex_coords = (!self.tex_coords.is_empty()).then(Vec::new);

        for (face, face_normals) in faces.iter().zip(&corner_normals) {
            let base = buffer.positions.len() as u32;

            for (j, &coord) in face.corners.iter().enumerate() {
                let position = face.start + j;
                buffer.positions.push(self.coords[coord].into());
                normals.push(face_normals[j].into());

                if let Some(colors) = colors.as_mut() {
                    let color = lookup(
                        &self.colors,
                        &self.color_index,
                        self.color_per_vertex,
                        &self.coord_index,
                        face.ordinal,
                        position,
                    );
                    colors.push(color.unwrap_or(WHITE));
                }
                if let Some(tex_coords) = tex_coords.as_mut() {
                    let uv = lookup(
                        &self.tex_coords,
                        &self.tex_coord_index,
                        true,
                        &self.coord_index,
                        face.ordinal,
                        position,
                    );
                    tex_coords.push(uv.map_or([0.0, 0.0], Into::into));
                }
            }

            for j in 1..face.corners.len() as u32 - 1 {
                if self.ccw {
                    buffer.indices.extend_from_slice(&[base, base + j, base + j + 1]);
                } else {
                    buffer.indices.extend_from_slice(&[base, base + j + 1, base + j]);
                }
            }
        }

        buffer.normals = Some(normals);
        buffer.colors = colors;
        buffer.tex_coords = tex_coords;
        Ok(buffer)
    }

    fn faces(&self) -> Result<Vec<Face>, GeometryError> {
        let mut faces = Vec::new();
        let mut start = 0;
        let mut ordinal = 0;

        // A trailing polygon without its closing -1 still counts
        for (i, &index) in self.coord_index.iter().chain(std::iter::once(&-1)).enumerate() {
            if index >= 0 {
                continue;
            }
            if i > start {
                let corners = self.coord_index[start..i]
                    .iter()
                    .map(|&c| self.checked(c))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() >= 3 {
                    faces.push(Face {
                        ordinal,
                        start,
                        corners,
                    });
                } else {
                    log::debug!("Skipping degenerate face {} with {} corners", ordinal, corners.len());
                }
                ordinal += 1;
            }
            start = i + 1;
        }
        Ok(faces)
    }

    fn checked(&self, index: i32) -> Result<usize, GeometryError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.coords.len())
            .ok_or(GeometryError::IndexOutOfRange {
                index,
                len: self.coords.len(),
            })
    }

    /// Supplied normals when usable, generated ones otherwise
    fn corner_normals(&self, faces: &[Face]) -> Vec<Vec<Vector3<f32>>> {
        if !self.normals.is_empty() && self.crease_angle <= 0.0 {
            let supplied: Option<Vec<Vec<_>>> = faces
                .iter()
                .map(|face| {
                    (0..face.corners.len())
                        .map(|j| {
                            lookup(
                                &self.normals,
                                &self.normal_index,
                                self.normal_per_vertex,
                                &self.coord_index,
                                face.ordinal,
                                face.start + j,
                            )
                        })
                        .collect()
                })
                .collect();
            match supplied {
                Some(normals) => return normals,
                None => log::debug!("Normal indices out of range, generating normals"),
            }
        }

        let corners: Vec<Vec<usize>> = faces.iter().map(|f| f.corners.clone()).collect();
        let face_normals: Vec<_> = corners
            .iter()
            .map(|corners| {
                let points: Vec<_> = corners.iter().map(|&c| self.coords[c]).collect();
                let n = polygon_normal(&points);
                if self.ccw {
                    n
                } else {
                    -n
                }
            })
            .collect();
        crease_normals(&corners, &face_normals, self.coords.len(), self.crease_angle)
    }
}

/// Resolves a per-vertex or per-face attribute for one polygon corner
///
/// Per-vertex attributes use their own index at the corner's position, or
/// the coordinate index when no separate index is given. Per-face attributes
/// use their own index at the face ordinal, or the ordinal itself.
fn lookup<T: Copy>(
    values: &[T],
    index: &[i32],
    per_vertex: bool,
    coord_index: &[i32],
    face: usize,
    position: usize,
) -> Option<T> {
    let i = match (per_vertex, index.is_empty()) {
        (true, true) => *coord_index.get(position)?,
        (true, false) => *index.get(position)?,
        (false, true) => face as i32,
        (false, false) => *index.get(face)?,
    };
    usize::try_from(i).ok().and_then(|i| values.get(i).copied())
}

/// How an index run expands into triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriangleTopology {
    /// Every three indices form a triangle
    #[default]
    List,
    /// Each index after the second forms a triangle with the previous two
    Strip,
    /// Each index after the second forms a triangle with the first and previous
    Fan,
    /// Every four indices form a quad split into two triangles
    Quads,
}

/// Decoded fields of the triangle family of nodes
#[derive(Debug, Clone)]
pub struct IndexedTriangles {
    pub topology: TriangleTopology,
    pub coords: Vec<Vector3<f32>>,
    /// `None` for the non-indexed sets, which walk the coordinates in order
    pub index: Option<Vec<i32>>,
    /// `stripCount` / `fanCount` of non-indexed strip and fan sets
    pub counts: Vec<i32>,
    pub normals: Vec<Vector3<f32>>,
    pub colors: Vec<Rgb>,
    pub tex_coords: Vec<Vector2<f32>>,
    pub ccw: bool,
}

impl Default for IndexedTriangles {
    fn default() -> Self {
        Self {
            topology: TriangleTopology::List,
            coords: Vec::new(),
            index: None,
            counts: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            tex_coords: Vec::new(),
            ccw: true,
        }
    }
}

impl IndexedTriangles {
    pub fn build(&self) -> Result<GeometryBuffer, GeometryError> {
        if self.coords.is_empty() {
            return Err(GeometryError::MissingCoordinates);
        }
        vertex_budget(Some(self.coords.len()))?;

        let mut indices = Vec::new();
        for run in self.runs()? {
            expand(self.topology, &run, &mut indices);
        }
        if indices.is_empty() {
            return Err(GeometryError::Empty);
        }
        if !self.ccw {
            for triangle in indices.chunks_exact_mut(3) {
                triangle.swap(1, 2);
            }
        }

        let n = self.coords.len();
        let positions: Vec<[f32; 3]> = self.coords.iter().map(|&c| c.into()).collect();
        let normals = match per_vertex(&self.normals, n, Vector3::new(0.0, 1.0, 0.0)) {
            Some(normals) => normals.into_iter().map(Into::into).collect(),
            None => smooth_normals(&positions, &indices),
        };

        Ok(GeometryBuffer {
            normals: Some(normals),
            colors: per_vertex(&self.colors, n, WHITE),
            tex_coords: per_vertex(&self.tex_coords, n, Vector2::new(0.0, 0.0))
                .map(|uvs| uvs.into_iter().map(Into::into).collect()),
            positions,
            indices,
        })
    }

    /// Splits the index stream into runs of validated vertex indices
    fn runs(&self) -> Result<Vec<Vec<u32>>, GeometryError> {
        let len = self.coords.len();
        match &self.index {
            Some(index) if index.is_empty() => Err(GeometryError::MissingIndices),
            Some(index) => index
                .split(|&i| i < 0)
                .filter(|run| !run.is_empty())
                .map(|run| {
                    run.iter()
                        .map(|&i| {
                            if (i as usize) < len {
                                Ok(i as u32)
                            } else {
                                Err(GeometryError::IndexOutOfRange { index: i, len })
                            }
                        })
                        .collect()
                })
                .collect(),
            None if self.counts.is_empty() => Ok(vec![(0..len as u32).collect()]),
            None => {
                let mut runs = Vec::new();
                let mut next = 0usize;
                for &count in &self.counts {
                    let count = count.max(0) as usize;
                    if next + count > len {
                        return Err(GeometryError::IndexOutOfRange {
                            index: (next + count - 1) as i32,
                            len,
                        });
                    }
                    runs.push((next as u32..(next + count) as u32).collect());
                    next += count;
                }
                Ok(runs)
            }
        }
    }
}

fn expand(topology: TriangleTopology, run: &[u32], out: &mut Vec<u32>) {
    match topology {
        TriangleTopology::List => {
            for t in run.chunks_exact(3) {
                out.extend_from_slice(t);
            }
        }
        TriangleTopology::Strip => {
            for i in 0..run.len().saturating_sub(2) {
                // Every other strip triangle flips to keep a consistent facing
                if i % 2 == 0 {
                    out.extend_from_slice(&[run[i], run[i + 1], run[i + 2]]);
                } else {
                    out.extend_from_slice(&[run[i + 1], run[i], run[i + 2]]);
                }
            }
        }
        TriangleTopology::Fan => {
            for i in 1..run.len().saturating_sub(1) {
                out.extend_from_slice(&[run[0], run[i], run[i + 1]]);
            }
        }
        TriangleTopology::Quads => {
            for q in run.chunks_exact(4) {
                out.extend_from_slice(&[q[0], q[1], q[2], q[0], q[2], q[3]]);
            }
        }
    }
}

/// Pads or truncates a per-vertex attribute to `n` entries; `None` when absent
fn per_vertex<T: Copy>(values: &[T], n: usize, fill: T) -> Option<Vec<T>> {
    if values.is_empty() {
        return None;
    }
    if values.len() != n {
        log::debug!("Per-vertex attribute has {} entries for {} vertices", values.len(), n);
    }
    Some((0..n).map(|i| values.get(i).copied().unwrap_or(fill)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn ring(k: usize) -> Vec<Vector3<f32>> {
        (0..k)
            .map(|i| {
                let a = i as f32 * std::f32::consts::TAU / k as f32;
                Vector3::new(a.cos(), a.sin(), 0.0)
            })
            .collect()
    }

    fn single_face(k: usize, ccw: bool) -> IndexedFaceSet {
        let mut coord_index: Vec<i32> = (0..k as i32).collect();
        coord_index.push(-1);
        IndexedFaceSet {
            coords: ring(k),
            coord_index,
            ccw,
            ..Default::default()
        }
    }

    /// Rotates a triangle so its smallest index comes first
    fn canonical(t: [u32; 3]) -> [u32; 3] {
        let m = (0..3).min_by_key(|&i| t[i]).unwrap_or(0);
        [t[m], t[(m + 1) % 3], t[(m + 2) % 3]]
    }

    #[test]
    fn test_fan_yields_k_minus_two_triangles() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let k = rng.random_range(3..40);
            let buffer = single_face(k, true).build().unwrap();
            assert_eq!(buffer.triangle_count(), k - 2);
            assert_eq!(buffer.vertex_count(), k);
        }
    }

    #[test]
    fn test_fan_order_from_first_vertex() {
        let buffer = single_face(5, true).build().unwrap();
        assert_eq!(buffer.indices, vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn test_clockwise_reverses_every_triangle() {
        let ccw = single_face(6, true).build().unwrap();
        let cw = single_face(6, false).build().unwrap();
        assert_eq!(ccw.triangle_count(), cw.triangle_count());

        for i in 0..ccw.triangle_count() {
            let [a, b, c] = ccw.triangle(i).unwrap();
            assert_eq!(canonical(cw.triangle(i).unwrap()), canonical([c, b, a]));
        }
        // Generated normals follow the winding
        assert!(ccw.normals.unwrap()[0][2] > 0.99);
        assert!(cw.normals.unwrap()[0][2] < -0.99);
    }

    #[test]
    fn test_multiple_faces_and_missing_trailing_sentinel() {
        let set = IndexedFaceSet {
            coords: ring(4),
            coord_index: vec![0, 1, 2, -1, 0, 2, 3],
            ..Default::default()
        };
        let buffer = set.build().unwrap();
        assert_eq!(buffer.triangle_count(), 2);
        assert_eq!(buffer.vertex_count(), 6);
    }

    #[test]
    fn test_degenerate_faces_are_skipped() {
        let set = IndexedFaceSet {
            coords: ring(4),
            coord_index: vec![0, 1, -1, -1, 0, 1, 2, 3, -1],
            ..Default::default()
        };
        assert_eq!(set.build().unwrap().triangle_count(), 2);
    }

    #[test]
    fn test_out_of_range_index() {
        let set = IndexedFaceSet {
            coords: ring(3),
            coord_index: vec![0, 1, 5, -1],
            ..Default::default()
        };
        assert_eq!(
            set.build(),
            Err(GeometryError::IndexOutOfRange { index: 5, len: 3 })
        );
    }

    #[test]
    fn test_missing_data() {
        let no_coords = IndexedFaceSet {
            coord_index: vec![0, 1, 2],
            ..Default::default()
        };
        assert_eq!(no_coords.build(), Err(GeometryError::MissingCoordinates));

        let no_index = IndexedFaceSet {
            coords: ring(3),
            ..Default::default()
        };
        assert_eq!(no_index.build(), Err(GeometryError::MissingIndices));
    }

    #[test]
    fn test_per_face_colors() {
        let set = IndexedFaceSet {
            coords: ring(4),
            coord_index: vec![0, 1, 2, -1, 0, 2, 3, -1],
            colors: vec![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            color_per_vertex: false,
            ..Default::default()
        };
        let colors = set.build().unwrap().colors.unwrap();
        assert_eq!(&colors[0..3], &[[1.0, 0.0, 0.0]; 3]);
        assert_eq!(&colors[3..6], &[[0.0, 0.0, 1.0]; 3]);
    }

    #[test]
    fn test_supplied_normals_with_separate_index() {
        let set = IndexedFaceSet {
            coords: ring(3),
            coord_index: vec![0, 1, 2, -1],
            normals: vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0)],
            normal_index: vec![1, 1, 0, -1],
            ..Default::default()
        };
        let normals = set.build().unwrap().normals.unwrap();
        assert_eq!(normals, vec![[0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_crease_angle_overrides_supplied_normals() {
        let set = IndexedFaceSet {
            coords: ring(3),
            coord_index: vec![0, 1, 2, -1],
            normals: vec![Vector3::new(1.0, 0.0, 0.0); 3],
            crease_angle: 1.0,
            ..Default::default()
        };
        let normals = set.build().unwrap().normals.unwrap();
        assert!((normals[0][2] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_list_winding() {
        let mut set = IndexedTriangles {
            coords: ring(4),
            index: Some(vec![0, 1, 2, 0, 2, 3]),
            ..Default::default()
        };
        assert_eq!(set.build().unwrap().indices, vec![0, 1, 2, 0, 2, 3]);

        set.ccw = false;
        assert_eq!(set.build().unwrap().indices, vec![0, 2, 1, 0, 3, 2]);
    }

    #[test]
    fn test_strip_alternates() {
        let set = IndexedTriangles {
            topology: TriangleTopology::Strip,
            coords: ring(5),
            index: Some(vec![0, 1, 2, 3, 4]),
            ..Default::default()
        };
        assert_eq!(set.build().unwrap().indices, vec![0, 1, 2, 2, 1, 3, 2, 3, 4]);
    }

    #[test]
    fn test_indexed_fans_split_on_sentinel() {
        let set = IndexedTriangles {
            topology: TriangleTopology::Fan,
            coords: ring(6),
            index: Some(vec![0, 1, 2, 3, -1, 3, 4, 5]),
            ..Default::default()
        };
        assert_eq!(set.build().unwrap().indices, vec![0, 1, 2, 0, 2, 3, 3, 4, 5]);
    }

    #[test]
    fn test_non_indexed_strip_counts() {
        let set = IndexedTriangles {
            topology: TriangleTopology::Strip,
            coords: ring(7),
            counts: vec![4, 3],
            ..Default::default()
        };
        let buffer = set.build().unwrap();
        assert_eq!(buffer.indices, vec![0, 1, 2, 2, 1, 3, 4, 5, 6]);
    }

    #[test]
    fn test_quads_and_implicit_triangles() {
        let quads = IndexedTriangles {
            topology: TriangleTopology::Quads,
            coords: ring(4),
            ..Default::default()
        };
        assert_eq!(quads.build().unwrap().indices, vec![0, 1, 2, 0, 2, 3]);

        let triangles = IndexedTriangles {
            coords: ring(7),
            ..Default::default()
        };
        // Trailing partial triangle is dropped
        assert_eq!(triangles.build().unwrap().triangle_count(), 2);
    }

    #[test]
    fn test_triangle_set_index_out_of_range() {
        let set = IndexedTriangles {
            coords: ring(3),
            index: Some(vec![0, 1, 3]),
            ..Default::default()
        };
        assert_eq!(
            set.build(),
            Err(GeometryError::IndexOutOfRange { index: 3, len: 3 })
        );
    }
}
