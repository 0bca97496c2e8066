//! Build-time configuration

/// Knobs for a [`SceneBuilder`](super::SceneBuilder) run
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Visit children of unrecognised tags under the unchanged parent
    /// instead of treating the tag as an opaque leaf
    pub traverse_unknown_children: bool,
    /// Slices around Sphere, Cylinder and Cone
    pub primitive_segments: u32,
    /// Latitude bands of a Sphere
    pub sphere_rings: u32,
    /// Honour `beginCap` / `endCap` on extrusions
    pub extrusion_caps: bool,
    /// Deepest chain of nested `USE` re-processing before giving up
    pub max_use_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            traverse_unknown_children: false,
            primitive_segments: 32,
            sphere_rings: 16,
            extrusion_caps: true,
            max_use_depth: 64,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: traverse into unknown nodes
    pub fn with_traverse_unknown_children(mut self, traverse: bool) -> Self {
        self.traverse_unknown_children = traverse;
        self
    }

    /// Builder pattern: primitive tessellation
    pub fn with_tessellation(mut self, segments: u32, rings: u32) -> Self {
        self.primitive_segments = segments.max(3);
        self.sphere_rings = rings.max(2);
        self
    }

    /// Builder pattern: enable or disable extrusion caps
    pub fn with_extrusion_caps(mut self, caps: bool) -> Self {
        self.extrusion_caps = caps;
        self
    }

    /// Builder pattern: limit nested `USE` depth
    pub fn with_max_use_depth(mut self, depth: usize) -> Self {
        self.max_use_depth = depth;
        self
    }
}
