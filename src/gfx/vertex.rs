//! # Vertex Data Structures
//!
//! Interleaved, GPU-compatible vertex layout for handing a
//! [`GeometryBuffer`](super::geometry::GeometryBuffer) to a renderer.

/// A 3D vertex with position, normal, texture coordinate and color.
///
/// # Memory Layout
///
/// `#[repr(C)]` with only `f32` arrays, so a `&[Vertex3D]` can be viewed as
/// raw bytes through [`bytemuck`] without copying:
///
/// | offset | field       | format     |
/// |--------|-------------|------------|
/// | 0      | `position`  | `f32 x 3`  |
/// | 12     | `normal`    | `f32 x 3`  |
/// | 24     | `tex_coord` | `f32 x 2`  |
/// | 32     | `color`     | `f32 x 3`  |
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex3D {
    /// Size of one vertex in bytes
    pub const STRIDE: usize = std::mem::size_of::<Vertex3D>();
}

/// Views a vertex slice as bytes for buffer upload
pub fn vertex_bytes(vertices: &[Vertex3D]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Views an index slice as bytes for buffer upload
pub fn index_bytes(indices: &[u32]) -> &[u8] {
    bytemuck::cast_slice(indices)
}
