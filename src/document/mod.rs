//! X3D document model
//!
//! Parsing produces an untyped [`SceneNode`] tree; [`fields`] decodes
//! attribute strings into typed values when the builder asks for them.

pub mod fields;
pub mod node;
pub mod parser;

pub use fields::{FieldValue, Rgb};
pub use node::SceneNode;
pub use parser::{parse_file, parse_str};
