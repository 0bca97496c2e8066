//! # Extrusion
//!
//! Sweeps a 2D cross-section along a 3D spine. Each spine point gets one ring
//! of cross-section vertices, scaled by that point's `scale`, turned so the
//! cross-section plane's up axis follows the local spine tangent and then by
//! the point's `orientation`. Consecutive rings are stitched into quads.
//!
//! Short `scale` and `orientation` arrays repeat their last value. Optional
//! caps fan-triangulate the first and last rings with their own vertices so
//! the cap normals stay flat.

use cgmath::{InnerSpace, Quaternion, Vector2, Vector3, Zero};

use super::normals::{polygon_normal, smooth_normals};
use super::{push_quad, vertex_budget, GeometryBuffer};
use crate::error::GeometryError;

/// Decoded fields of an `Extrusion`
#[derive(Debug, Clone)]
pub struct Extrusion {
    pub cross_section: Vec<Vector2<f32>>,
    pub spine: Vec<Vector3<f32>>,
    pub scale: Vec<Vector2<f32>>,
    pub orientation: Vec<Quaternion<f32>>,
    pub begin_cap: bool,
    pub end_cap: bool,
    pub ccw: bool,
}

impl Default for Extrusion {
    fn default() -> Self {
        Self {
            cross_section: vec![
                Vector2::new(1.0, 1.0),
                Vector2::new(1.0, -1.0),
                Vector2::new(-1.0, -1.0),
                Vector2::new(-1.0, 1.0),
                Vector2::new(1.0, 1.0),
            ],
            spine: vec![Vector3::zero(), Vector3::unit_y()],
            scale: vec![Vector2::new(1.0, 1.0)],
            orientation: Vec::new(),
            begin_cap: true,
            end_cap: true,
            ccw: true,
        }
    }
}

impl Extrusion {
    pub fn build(&self) -> Result<GeometryBuffer, GeometryError> {
        let cs = self.cross_section.len();
        let sp = self.spine.len();
        if cs < 2 || sp < 2 {
            return Err(GeometryError::DegenerateExtrusion);
        }
        // One ring per spine point plus up to two cap rings
        let vertices = vertex_budget(sp.checked_add(2).and_then(|rings| rings.checked_mul(cs)))?;

        let frames = self.frames();
        let mut buffer = GeometryBuffer::new();
        let mut tex_coords = Vec::with_capacity(vertices);

        for (s, (&rotation, &spine_point)) in frames.iter().zip(&self.spine).enumerate() {
            let scale = repeat_last(&self.scale, s).unwrap_or(Vector2::new(1.0, 1.0));
            for (c, point) in self.cross_section.iter().enumerate() {
                let local = Vector3::new(point.x * scale.x, 0.0, point.y * scale.y);
                buffer.positions.push((rotation * local + spine_point).into());
                tex_coords.push([
                    c as f32 / (cs - 1) as f32,
                    s as f32 / (sp - 1) as f32,
                ]);
            }
        }

        for s in 0..sp - 1 {
            for c in 0..cs - 1 {
                let bl = (s * cs + c) as u32;
                let br = bl + 1;
                let tl = bl + cs as u32;
                let tr = tl + 1;
                // Cross-section runs opposite to the grid lattice, so the cell winding flips
                push_quad(&mut buffer.indices, [bl, br, tl, tr], !self.ccw);
            }
        }

        if self.begin_cap {
            let outward = -tangent(&self.spine, 0);
            self.push_cap(&mut buffer, &mut tex_coords, 0, outward);
        }
        if self.end_cap {
            let outward = tangent(&self.spine, sp - 1);
            self.push_cap(&mut buffer, &mut tex_coords, sp - 1, outward);
        }

        buffer.normals = Some(smooth_normals(&buffer.positions, &buffer.indices));
        buffer.tex_coords = Some(tex_coords);
        Ok(buffer)
    }

    /// Rotation of each ring: tangent alignment, then the per-point orientation
    fn frames(&self) -> Vec<Quaternion<f32>> {
        let identity = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        let mut previous = identity;

        (0..self.spine.len())
            .map(|s| {
                let dir = tangent(&self.spine, s);
                let align = if dir.magnitude2() > f32::EPSILON {
                    Quaternion::from_arc(Vector3::unit_y(), dir.normalize(), None)
                } else {
                    // Coincident spine points keep the previous frame
                    previous
                };
                previous = align;
                align * repeat_last(&self.orientation, s).unwrap_or(identity)
            })
            .collect()
    }

    fn push_cap(
        &self,
        buffer: &mut GeometryBuffer,
        tex_coords: &mut Vec<[f32; 2]>,
        ring: usize,
        outward: Vector3<f32>,
    ) {
        let cs = self.cross_section.len();
        // A closed cross-section repeats its first point; the cap needs it once
        let closed = cs > 2 && self.cross_section[0] == self.cross_section[cs - 1];
        let count = if closed { cs - 1 } else { cs };
        if count < 3 {
            return;
        }

        let ring_start = ring * cs;
        let points: Vec<Vector3<f32>> = (0..count)
            .map(|c| Vector3::from(buffer.positions[ring_start + c]))
            .collect();
        let (lo, hi) = self.cross_section_bounds();
        let base = buffer.positions.len() as u32;

        for (c, point) in points.iter().enumerate() {
            buffer.positions.push((*point).into());
            let p = self.cross_section[c];
            tex_coords.push([
                ratio(p.x, lo.x, hi.x),
                ratio(p.y, lo.y, hi.y),
            ]);
        }

        let mut flip = polygon_normal(&points).dot(outward) < 0.0;
        if !self.ccw {
            flip = !flip;
        }
        for i in 1..count as u32 - 1 {
            if flip {
                buffer.indices.extend_from_slice(&[base, base + i + 1, base + i]);
            } else {
                buffer.indices.extend_from_slice(&[base, base + i, base + i + 1]);
            }
        }
    }

    fn cross_section_bounds(&self) -> (Vector2<f32>, Vector2<f32>) {
        self.cross_section.iter().fold(
            (self.cross_section[0], self.cross_section[0]),
            |(lo, hi), p| {
                (
                    Vector2::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Vector2::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        )
    }
}

/// Spine direction at point `s`: forward difference, backward at the end
fn tangent(spine: &[Vector3<f32>], s: usize) -> Vector3<f32> {
    if s + 1 < spine.len() {
        spine[s + 1] - spine[s]
    } else {
        spine[s] - spine[s - 1]
    }
}

fn repeat_last<T: Copy>(values: &[T], i: usize) -> Option<T> {
    values.get(i).or(values.last()).copied()
}

fn ratio(v: f32, lo: f32, hi: f32) -> f32 {
    if hi - lo > f32::EPSILON {
        (v - lo) / (hi - lo)
    } else {
        0.0
    }
}
