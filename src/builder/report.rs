//! What a build produced besides adapter calls

use std::fmt;

use crate::animation::{AnimationInventory, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

/// A non-fatal problem found while building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Element tag of the offending node
    pub node: String,
    /// `DEF` name of the offending node, if any
    pub def: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.def {
            Some(def) => write!(f, "<{} DEF='{}'>: {}", self.node, def, self.message),
            None => write!(f, "<{}>: {}", self.node, self.message),
        }
    }
}

/// Decoded `NavigationInfo`
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationInfo {
    pub speed: f32,
    pub kinds: Vec<String>,
    pub headlight: bool,
    pub avatar_size: Vec<f32>,
}

impl Default for NavigationInfo {
    fn default() -> Self {
        Self {
            speed: 1.0,
            kinds: vec!["EXAMINE".to_string()],
            headlight: true,
            avatar_size: vec![0.25, 1.6, 0.75],
        }
    }
}

/// Decoded `WorldInfo`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldInfo {
    pub title: String,
    pub info: Vec<String>,
}

/// Outcome of [`SceneBuilder::build`](super::SceneBuilder::build)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub diagnostics: Vec<Diagnostic>,
    pub routes: Vec<Route>,
    pub animation: AnimationInventory,
    pub navigation: Option<NavigationInfo>,
    pub world_info: Option<WorldInfo>,
    /// `version` attribute of the root `X3D` element
    pub version: Option<String>,
    /// `profile` attribute of the root `X3D` element
    pub profile: Option<String>,
    /// Entities created through the adapter
    pub entity_count: usize,
}

impl BuildReport {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}
