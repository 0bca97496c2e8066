//! `DEF` / `USE` alias table
//!
//! Filled during the single traversal pass, so a `USE` only resolves
//! against names declared earlier in document order.

use std::collections::HashMap;

use crate::document::SceneNode;
use crate::world::EntityHandle;

/// What a `DEF` name points at
#[derive(Debug, Clone, Copy)]
pub struct Alias<'t> {
    /// The declaring node, re-processed on every `USE`
    pub node: &'t SceneNode,
    /// Entity built the last time the node was processed, if any
    pub entity: Option<EntityHandle>,
}

#[derive(Debug, Default)]
pub struct AliasTable<'t> {
    entries: HashMap<String, Alias<'t>>,
}

impl<'t> AliasTable<'t> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Records `name`, replacing any earlier declaration
    pub fn define(&mut self, name: &str, node: &'t SceneNode, entity: Option<EntityHandle>) {
        if self.entries.contains_key(name) {
            log::debug!("DEF '{}' redeclared", name);
        }
        self.entries.insert(name.to_string(), Alias { node, entity });
    }

    pub fn get(&self, name: &str) -> Option<Alias<'t>> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
