//! # Prelude
//!
//! ```rust
//! use x3d_builder::prelude::*;
//! ```

pub use crate::animation::{AnimatedValue, Interpolator, Route, TimeSensor};
pub use crate::builder::{
    BuildOptions, BuildPass, BuildReport, Diagnostic, HandlerRegistry, SceneBuilder, Severity,
};
pub use crate::document::{parse_file, parse_str, SceneNode};
pub use crate::error::{Error, GeometryError, ParseError, Result};
pub use crate::geo::{geo_to_local, GeoCoord};
pub use crate::gfx::{GeometryBuffer, MaterialDesc, TextureDesc, Vertex3D};
pub use crate::world::{
    AdapterCall, BackgroundSettings, EntityHandle, FogSettings, LightSpec, LightType, Placement,
    RecordingAdapter, WorldAdapter,
};
pub use crate::{load_file, load_str};
