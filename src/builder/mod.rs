//! # Scene Builder
//!
//! Walks a [`SceneNode`] tree depth-first and turns it into
//! [`WorldAdapter`] calls.
//!
//! ## Traversal
//!
//! Each node's tag selects a handler from the [`HandlerRegistry`]. The
//! handler receives the current parent entity and decides whether to create
//! an entity and whether to descend into the node's children.
//!
//! ## DEF / USE
//!
//! A node carrying `DEF` is recorded in the [`AliasTable`] after it has been
//! processed. A node carrying `USE` re-processes the declaring node at the
//! current position, so every use builds fresh entities under the new
//! parent. The table is filled in a single pass: a `USE` that appears before
//! its `DEF` does not resolve.
//!
//! ## Failure model
//!
//! Building never fails. Missing or malformed data, unknown tags and
//! unresolved references become [`Diagnostic`]s in the returned
//! [`BuildReport`] and traversal carries on.
//!
//! ```rust
//! use x3d_builder::prelude::*;
//!
//! let root = parse_str(r#"<X3D><Scene><Transform translation="0 1 0"/></Scene></X3D>"#).unwrap();
//! let mut world = RecordingAdapter::new();
//! let report = SceneBuilder::new().build(&root, &mut world);
//!
//! assert_eq!(report.entity_count, 1);
//! assert!(report.diagnostics.is_empty());
//! ```

pub mod alias;
pub mod dispatch;
pub mod handlers;
pub mod options;
pub mod report;

pub use alias::{Alias, AliasTable};
pub use dispatch::{GeometryHandler, HandlerRegistry, NodeHandler};
pub use options::BuildOptions;
pub use report::{BuildReport, Diagnostic, NavigationInfo, Severity, WorldInfo};

use crate::animation::Route;
use crate::document::SceneNode;
use crate::gfx::{GeometryBuffer, MaterialDesc};
use crate::world::{EntityHandle, LightSpec, Placement, WorldAdapter};

/// Configured scene builder; reusable across documents
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    registry: HandlerRegistry,
    options: BuildOptions,
}

impl SceneBuilder {
    /// Builder with the default handlers and options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            registry: HandlerRegistry::with_defaults(),
            options,
        }
    }

    /// Builder pattern: replace the handler table
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Builds `root` into `adapter`
    ///
    /// Every run starts with an empty alias table, so the same builder can
    /// be used for several documents or adapters.
    pub fn build(&self, root: &SceneNode, adapter: &mut dyn WorldAdapter) -> BuildReport {
        let mut pass = BuildPass::new(adapter, &self.registry, &self.options);
        pass.visit(root, None);
        pass.finish(root)
    }
}

/// State of one build run, handed to every node handler
pub struct BuildPass<'a, 't> {
    adapter: &'a mut dyn WorldAdapter,
    registry: &'a HandlerRegistry,
    options: &'a BuildOptions,
    aliases: AliasTable<'t>,
    // Names whose declaring nodes are being re-processed right now
    use_stack: Vec<String>,
    report: BuildReport,
}

impl<'a, 't> BuildPass<'a, 't> {
    fn new(
        adapter: &'a mut dyn WorldAdapter,
        registry: &'a HandlerRegistry,
        options: &'a BuildOptions,
    ) -> Self {
        Self {
            adapter,
            registry,
            options,
            aliases: AliasTable::new(),
            use_stack: Vec::new(),
            report: BuildReport::default(),
        }
    }

    /// Processes `node` and its subtree under `parent`
    pub fn visit(&mut self, node: &'t SceneNode, parent: Option<EntityHandle>) -> Option<EntityHandle> {
        if let Some(name) = node.use_name() {
            return self.visit_use(node, name, parent);
        }

        let entity = match self.registry.handler(node.name()) {
            Some(handler) => {
                log::debug!("Processing <{}>", node.name());
                handler(self, node, parent)
            }
            None => {
                self.warn(node, "unsupported node type, skipped");
                if self.options.traverse_unknown_children {
                    self.visit_children(node, parent);
                }
                None
            }
        };

        if let Some(def) = node.def_name() {
            self.aliases.define(def, node, entity);
        }
        entity
    }

    /// Processes every child of `node` under `parent`
    pub fn visit_children(&mut self, node: &'t SceneNode, parent: Option<EntityHandle>) {
        for child in node.children() {
            self.visit(child, parent);
        }
    }

    fn visit_use(
        &mut self,
        node: &'t SceneNode,
        name: &str,
        parent: Option<EntityHandle>,
    ) -> Option<EntityHandle> {
        let Some(alias) = self.aliases.get(name) else {
            self.warn(node, format!("USE '{}' has no earlier DEF, skipped", name));
            return None;
        };
        if self.use_stack.iter().any(|active| active == name) {
            self.warn(node, format!("USE '{}' refers to itself, skipped", name));
            return None;
        }
        if self.use_stack.len() >= self.options.max_use_depth {
            self.warn(
                node,
                format!("USE '{}' nested deeper than {}, skipped", name, self.options.max_use_depth),
            );
            return None;
        }

        log::debug!("USE '{}' re-processing <{}>", name, alias.node.name());
        self.use_stack.push(name.to_string());
        let entity = self.visit(alias.node, parent);
        self.use_stack.pop();
        entity
    }

    /// Resolves a node consumed by its parent handler rather than visited
    ///
    /// Used for `Appearance`, `Coordinate` and friends inside a `Shape`: a
    /// `USE` returns the declaring node, a `DEF` is recorded without an
    /// entity. Unresolved references are reported and yield `None`.
    pub fn resolve(&mut self, node: &'t SceneNode) -> Option<&'t SceneNode> {
        match node.use_name() {
            Some(name) => match self.aliases.get(name) {
                Some(alias) => Some(alias.node),
                None => {
                    self.warn(node, format!("USE '{}' has no earlier DEF, ignored", name));
                    None
                }
            },
            None => {
                if let Some(def) = node.def_name() {
                    self.aliases.define(def, node, None);
                }
                Some(node)
            }
        }
    }

    /// First child of `node` tagged with one of `tags`, passed through [`resolve`](Self::resolve)
    pub fn resolved_child(&mut self, node: &'t SceneNode, tags: &[&str]) -> Option<&'t SceneNode> {
        let child = node
            .children()
            .iter()
            .find(|c| tags.iter().any(|t| *t == c.name()))?;
        self.resolve(child)
    }

    pub fn create_container(
        &mut self,
        parent: Option<EntityHandle>,
        placement: &Placement,
        node: &SceneNode,
    ) -> EntityHandle {
        self.report.entity_count += 1;
        self.adapter
            .create_container_entity(parent, placement, node.def_name())
    }

    pub fn create_mesh(
        &mut self,
        parent: Option<EntityHandle>,
        geometry: &GeometryBuffer,
        material: &MaterialDesc,
        placement: &Placement,
        node: &SceneNode,
    ) -> EntityHandle {
        self.report.entity_count += 1;
        self.adapter
            .create_mesh_entity(parent, geometry, material, placement, node.def_name())
    }

    pub fn create_light(
        &mut self,
        parent: Option<EntityHandle>,
        light: &LightSpec,
        node: &SceneNode,
    ) -> EntityHandle {
        self.report.entity_count += 1;
        self.adapter.create_light_entity(parent, light, node.def_name())
    }

    /// Direct access for environment setters
    pub fn adapter(&mut self) -> &mut (dyn WorldAdapter + 'a) {
        &mut *self.adapter
    }

    pub fn options(&self) -> &BuildOptions {
        self.options
    }

    pub fn registry(&self) -> &'a HandlerRegistry {
        self.registry
    }

    pub fn aliases(&self) -> &AliasTable<'t> {
        &self.aliases
    }

    pub fn report_mut(&mut self) -> &mut BuildReport {
        &mut self.report
    }

    /// Records and logs a warning about `node`
    pub fn warn(&mut self, node: &SceneNode, message: impl Into<String>) {
        self.diagnose(Severity::Warning, node, message.into());
    }

    /// Records and logs an informational note about `node`
    pub fn note(&mut self, node: &SceneNode, message: impl Into<String>) {
        self.diagnose(Severity::Info, node, message.into());
    }

    fn diagnose(&mut self, severity: Severity, node: &SceneNode, message: String) {
        let diagnostic = Diagnostic {
            severity,
            node: node.name().to_string(),
            def: node.def_name().map(str::to_string),
            message,
        };
        match severity {
            Severity::Warning => log::warn!("{}", diagnostic),
            Severity::Info => log::info!("{}", diagnostic),
        }
        self.report.diagnostics.push(diagnostic);
    }

    /// Collects routes after traversal and hands back the report
    fn finish(mut self, root: &SceneNode) -> BuildReport {
        for node in root.walk().filter(|n| n.name() == "ROUTE") {
            if let Some(route) = Route::from_node(node) {
                log::info!("ROUTE: {}", route);
                self.report.routes.push(route);
            }
        }
        log::debug!(
            "Build finished: {} entities, {} aliases, {} diagnostics",
            self.report.entity_count,
            self.aliases.len(),
            self.report.diagnostics.len()
        );
        self.report
    }
}

#[cfg(test)]
mod tests;
