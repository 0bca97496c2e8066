// src/lib.rs
//! X3D Scene Builder
//!
//! Parses X3D documents into a generic node tree and builds them into any
//! engine through the [`WorldAdapter`](world::WorldAdapter) trait.
//!
//! ```rust
//! use x3d_builder::prelude::*;
//!
//! let mut world = RecordingAdapter::new();
//! let report = x3d_builder::load_str(
//!     r#"<X3D version="3.3"><Scene>
//!          <Shape><Box size="1 1 1"/></Shape>
//!        </Scene></X3D>"#,
//!     &mut world,
//! )?;
//!
//! assert_eq!(report.entity_count, 1);
//! assert_eq!(report.version.as_deref(), Some("3.3"));
//! # Ok::<(), x3d_builder::Error>(())
//! ```

pub mod animation;
pub mod builder;
pub mod document;
pub mod error;
pub mod geo;
pub mod gfx;
pub mod prelude;
pub mod world;

use std::path::Path;

pub use builder::{BuildReport, SceneBuilder};
pub use document::{parse_file, parse_str, SceneNode};
pub use error::{Error, Result};
pub use world::WorldAdapter;

/// Parses `text` and builds it into `adapter` with the default builder
pub fn load_str(text: &str, adapter: &mut dyn WorldAdapter) -> Result<BuildReport> {
    let root = parse_str(text)?;
    Ok(SceneBuilder::new().build(&root, adapter))
}

/// Reads, parses and builds the document at `path` with the default builder
pub fn load_file(path: impl AsRef<Path>, adapter: &mut dyn WorldAdapter) -> Result<BuildReport> {
    let root = parse_file(path)?;
    Ok(SceneBuilder::new().build(&root, adapter))
}
