//! Elevation grid: a height field sampled on a regular XZ lattice

use super::{normals::smooth_normals, push_quad, vertex_budget, GeometryBuffer};
use crate::document::Rgb;
use crate::error::GeometryError;

/// Decoded fields of an `ElevationGrid`
///
/// Heights are row-major: the value for column `x`, row `z` lives at
/// `z * x_dimension + x`. Missing heights read as zero.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    pub x_dimension: i32,
    pub z_dimension: i32,
    pub x_spacing: f32,
    pub z_spacing: f32,
    pub heights: Vec<f32>,
    pub colors: Vec<Rgb>,
    pub color_per_vertex: bool,
    pub ccw: bool,
}

impl Default for ElevationGrid {
    fn default() -> Self {
        Self {
            x_dimension: 0,
            z_dimension: 0,
            x_spacing: 1.0,
            z_spacing: 1.0,
            heights: Vec::new(),
            colors: Vec::new(),
            color_per_vertex: true,
            ccw: true,
        }
    }
}

impl ElevationGrid {
    pub fn build(&self) -> Result<GeometryBuffer, GeometryError> {
        if self.x_dimension < 2 || self.z_dimension < 2 {
            return Err(GeometryError::InvalidDimensions {
                x_dimension: self.x_dimension,
                z_dimension: self.z_dimension,
            });
        }
        let (nx, nz) = (self.x_dimension as usize, self.z_dimension as usize);
        let vertices = vertex_budget(nx.checked_mul(nz))?;
        if self.heights.len() < nx * nz {
            log::debug!(
                "ElevationGrid has {} heights for a {}x{} lattice",
                self.heights.len(),
                nx,
                nz
            );
        }

        let mut buffer = GeometryBuffer::new();
        let mut tex_coords = Vec::with_capacity(vertices);
        for z in 0..nz {
            for x in 0..nx {
                let height = self.heights.get(z * nx + x).copied().unwrap_or(0.0);
                buffer.positions.push([
                    x as f32 * self.x_spacing,
                    height,
                    z as f32 * self.z_spacing,
                ]);
                tex_coords.push([
                    x as f32 / (nx - 1) as f32,
                    z as f32 / (nz - 1) as f32,
                ]);
            }
        }

        for z in 0..nz - 1 {
            for x in 0..nx - 1 {
                let bl = (z * nx + x) as u32;
                let br = bl + 1;
                let tl = bl + nx as u32;
                let tr = tl + 1;
                push_quad(&mut buffer.indices, [bl, br, tl, tr], self.ccw);
            }
        }

        buffer.normals = Some(smooth_normals(&buffer.positions, &buffer.indices));
        buffer.tex_coords = Some(tex_coords);
        buffer.colors = self.vertex_colors(nx, nz);
        Ok(buffer)
    }

    /// Per-vertex colors; per-quad colors are spread onto each quad's lower-left vertex
    fn vertex_colors(&self, nx: usize, nz: usize) -> Option<Vec<Rgb>> {
        if self.colors.is_empty() {
            return None;
        }
        let white = [1.0, 1.0, 1.0];
        let colors = (0..nz)
            .flat_map(|z| (0..nx).map(move |x| (x, z)))
            .map(|(x, z)| {
                let i = if self.color_per_vertex {
                    z * nx + x
                } else {
                    z.min(nz - 2) * (nx - 1) + x.min(nx - 2)
                };
                self.colors.get(i).copied().unwrap_or(white)
            })
            .collect();
        Some(colors)
    }
}
