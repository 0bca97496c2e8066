//! Tag-to-handler dispatch tables
//!
//! Node handling is data-driven: the builder looks up each element tag in a
//! [`HandlerRegistry`] instead of matching on tag strings. Callers can add
//! support for new tags, or override the defaults, before building.

use std::collections::HashMap;

use super::{handlers, BuildPass};
use crate::document::SceneNode;
use crate::error::GeometryError;
use crate::gfx::GeometryBuffer;
use crate::world::EntityHandle;

/// Processes one node under `parent`, returning the entity it created
///
/// A handler that wants its children built calls
/// [`BuildPass::visit_children`] itself.
pub type NodeHandler =
    for<'a, 't> fn(&mut BuildPass<'a, 't>, &'t SceneNode, Option<EntityHandle>) -> Option<EntityHandle>;

/// Synthesizes a mesh from a geometry node found inside a `Shape`
pub type GeometryHandler =
    for<'a, 't> fn(&mut BuildPass<'a, 't>, &'t SceneNode) -> Result<GeometryBuffer, GeometryError>;

/// Node and geometry handlers keyed by element tag
#[derive(Clone)]
pub struct HandlerRegistry {
    nodes: HashMap<String, NodeHandler>,
    geometry: HashMap<String, GeometryHandler>,
}

impl HandlerRegistry {
    /// A registry that recognises nothing
    pub fn empty() -> Self {
        Self {
            nodes: HashMap::new(),
            geometry: HashMap::new(),
        }
    }

    /// A registry with handlers for every supported X3D tag
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        handlers::register_defaults(&mut registry);
        registry
    }

    /// Adds or replaces the handler for `tag`, returning the previous one
    pub fn register(&mut self, tag: impl Into<String>, handler: NodeHandler) -> Option<NodeHandler> {
        self.nodes.insert(tag.into(), handler)
    }

    /// Adds or replaces the geometry handler for `tag`
    pub fn register_geometry(
        &mut self,
        tag: impl Into<String>,
        handler: GeometryHandler,
    ) -> Option<GeometryHandler> {
        self.geometry.insert(tag.into(), handler)
    }

    pub fn unregister(&mut self, tag: &str) -> Option<NodeHandler> {
        self.nodes.remove(tag)
    }

    pub fn handler(&self, tag: &str) -> Option<NodeHandler> {
        self.nodes.get(tag).copied()
    }

    pub fn geometry(&self, tag: &str) -> Option<GeometryHandler> {
        self.geometry.get(tag).copied()
    }

    pub fn is_geometry(&self, tag: &str) -> bool {
        self.geometry.contains_key(tag)
    }

    /// All tags with a node handler, in no particular order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("nodes", &self.nodes.len())
            .field("geometry", &self.geometry.len())
            .finish()
    }
}
