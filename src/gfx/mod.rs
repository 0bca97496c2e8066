//! # Graphics Data
//!
//! Engine-agnostic mesh and surface data produced while building a scene.
//!
//! - **Geometry** ([`geometry`]) - builders that synthesize [`GeometryBuffer`]s
//! - **Vertices** ([`vertex`]) - interleaved `bytemuck` vertex export
//! - **Materials** ([`material`]) - decoded `Appearance` data
//!
//! Nothing here touches a GPU. Turning buffers and materials into renderable
//! objects belongs to the [`WorldAdapter`](crate::world::WorldAdapter).

pub mod geometry;
pub mod material;
pub mod vertex;

pub use geometry::GeometryBuffer;
pub use material::{MaterialDesc, TextureDesc};
pub use vertex::Vertex3D;
