//! # Procedural Geometry Generation
//!
//! Pure builders that turn X3D geometry fields into a [`GeometryBuffer`].
//! Every builder is deterministic and free of side effects, so each can be
//! exercised without a document or a world.
//!
//! ## Builders
//!
//! - [`IndexedFaceSet`]: `-1` delimited polygons, fan triangulated
//! - [`IndexedTriangles`]: triangle lists, strips and fans, indexed or not,
//!   plus quad lists
//! - [`ElevationGrid`]: height field on a regular lattice
//! - [`Extrusion`]: a cross-section swept along a spine
//! - [`primitives`]: Box, Sphere, Cylinder and Cone tessellation
//!
//! ## Usage
//!
//! ```rust
//! use x3d_builder::gfx::geometry::ElevationGrid;
//!
//! let grid = ElevationGrid {
//!     x_dimension: 2,
//!     z_dimension: 2,
//!     x_spacing: 1.0,
//!     z_spacing: 1.0,
//!     heights: vec![0.0, 0.0, 0.0, 1.0],
//!     ..Default::default()
//! };
//! let buffer = grid.build().unwrap();
//! assert_eq!(buffer.triangle_count(), 2);
//! ```

pub mod extrusion;
pub mod grid;
pub mod indexed;
pub mod normals;
pub mod primitives;

pub use extrusion::Extrusion;
pub use grid::ElevationGrid;
pub use indexed::{IndexedFaceSet, IndexedTriangles, TriangleTopology};
pub use primitives::*;

use super::vertex::Vertex3D;
use crate::error::GeometryError;

/// Largest vertex count one buffer may hold, well inside the `u32` index range
pub const MAX_VERTICES: usize = 1 << 24;

/// Accepts a vertex count computed with checked arithmetic
pub(crate) fn vertex_budget(count: Option<usize>) -> Result<usize, GeometryError> {
    count
        .filter(|&n| n <= MAX_VERTICES)
        .ok_or(GeometryError::TooManyVertices {
            limit: MAX_VERTICES,
        })
}

/// Flat mesh arrays produced by the geometry builders
///
/// Optional attributes, when present, have exactly one entry per position.
/// Indices come in triples, each triple one counter-clockwise triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffer {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub colors: Option<Vec<[f32; 3]>>,
    pub indices: Vec<u32>,
}

impl GeometryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex indices of triangle `i`
    pub fn triangle(&self, i: usize) -> Option<[u32; 3]> {
        let t = self.indices.get(i * 3..i * 3 + 3)?;
        Some([t[0], t[1], t[2]])
    }

    /// Checks the attribute-length and index-range invariants
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.positions.is_empty() {
            return Err(GeometryError::MissingCoordinates);
        }
        if self.indices.is_empty() {
            return Err(GeometryError::Empty);
        }
        let len = self.positions.len();
        let attributes = [
            ("normals", self.normals.as_ref().map(Vec::len)),
            ("texture coordinates", self.tex_coords.as_ref().map(Vec::len)),
            ("colors", self.colors.as_ref().map(Vec::len)),
        ];
        for (attribute, found) in attributes {
            if let Some(found) = found.filter(|&found| found != len) {
                return Err(GeometryError::AttributeMismatch {
                    attribute,
                    expected: len,
                    found,
                });
            }
        }
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::Empty);
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= len) {
            return Err(GeometryError::IndexOutOfRange {
                index: bad as i32,
                len,
            });
        }
        Ok(())
    }

    /// Fills in smooth normals when none were produced
    pub fn ensure_normals(&mut self) {
        if self.normals.is_none() {
            self.normals = Some(normals::smooth_normals(&self.positions, &self.indices));
        }
    }

    /// Interleaves the arrays into GPU-ready vertices
    ///
    /// Missing normals default to +Y, missing UVs to zero and missing colors to
    /// white.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.positions.len())
            .map(|i| Vertex3D {
                position: self.positions[i],
                normal: self
                    .normals
                    .as_ref()
                    .and_then(|n| n.get(i).copied())
                    .unwrap_or([0.0, 1.0, 0.0]),
                tex_coord: self
                    .tex_coords
                    .as_ref()
                    .and_then(|t| t.get(i).copied())
                    .unwrap_or([0.0, 0.0]),
                color: self
                    .colors
                    .as_ref()
                    .and_then(|c| c.get(i).copied())
                    .unwrap_or([1.0, 1.0, 1.0]),
            })
            .collect()
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut lo, mut hi), p| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(p[axis]);
                hi[axis] = hi[axis].max(p[axis]);
            }
            (lo, hi)
        }))
    }
}

/// Grid-style quad triangulation shared by elevation grids and extrusions
///
/// `bl`, `br`, `tl`, `tr` are the corners of one cell in lattice order.
pub(crate) fn push_quad(indices: &mut Vec<u32>, [bl, br, tl, tr]: [u32; 4], ccw: bool) {
    if ccw {
        indices.extend_from_slice(&[bl, tl, br, br, tl, tr]);
    } else {
        indices.extend_from_slice(&[bl, br, tl, br, tr, tl]);
    }
}
