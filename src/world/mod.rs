//! # World Adapter
//!
//! The boundary between scene building and whatever engine materializes the
//! result. The builder never touches engine state directly: every entity,
//! light and environment setting goes through one [`WorldAdapter`] call.
//!
//! The value records here ([`Placement`], [`LightSpec`],
//! [`BackgroundSettings`], [`FogSettings`]) are built once per node, passed
//! by reference and then dropped.
//!
//! [`RecordingAdapter`] implements the trait by logging every call, which is
//! what the tests and the inspector demo use.

pub mod recording;

pub use recording::{AdapterCall, RecordingAdapter};

use cgmath::{One, Quaternion, Vector3, Zero};

use crate::document::Rgb;
use crate::gfx::{GeometryBuffer, MaterialDesc};

/// Opaque identifier assigned by the adapter to each created entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub u64);

/// Local transform of an entity relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Builder pattern: set position
    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: set rotation
    pub fn with_rotation(mut self, rotation: Quaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    Directional,
    Point,
    Spot,
}

/// Decoded light node
#[derive(Debug, Clone, PartialEq)]
pub struct LightSpec {
    pub light_type: LightType,
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vector3<f32>,
    /// Turns the engine's forward axis (-Z) onto the light direction
    pub rotation: Quaternion<f32>,
    /// Zero for directional lights
    pub range: f32,
    /// Full cone angle, spot lights only
    pub spot_angle_degrees: Option<f32>,
}

/// Six skybox face URL lists, verbatim from the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkyboxUrls {
    pub front: Vec<String>,
    pub back: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub top: Vec<String>,
    pub bottom: Vec<String>,
}

impl SkyboxUrls {
    pub fn is_empty(&self) -> bool {
        [
            &self.front,
            &self.back,
            &self.left,
            &self.right,
            &self.top,
            &self.bottom,
        ]
        .iter()
        .all(|urls| urls.is_empty())
    }
}

/// Sky and ground color ramps plus optional skybox
///
/// `sky_angle` has one entry fewer than `sky_color` when well formed; the
/// same holds for the ground ramp. No repair is attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSettings {
    pub sky_color: Vec<Rgb>,
    pub sky_angle: Vec<f32>,
    pub ground_color: Vec<Rgb>,
    pub ground_angle: Vec<f32>,
    pub skybox: SkyboxUrls,
    pub transparency: f32,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            sky_color: vec![[0.0, 0.0, 0.0]],
            sky_angle: Vec::new(),
            ground_color: vec![[0.0, 0.0, 0.0]],
            ground_angle: Vec::new(),
            skybox: SkyboxUrls::default(),
            transparency: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FogType {
    #[default]
    Linear,
    Exponential,
}

impl FogType {
    /// Parses `fogType`; anything unrecognised is linear
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("EXPONENTIAL") {
            FogType::Exponential
        } else {
            FogType::Linear
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FogSettings {
    pub enabled: bool,
    pub color: Rgb,
    pub visibility_range: f32,
    pub fog_type: FogType,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color: [1.0, 1.0, 1.0],
            visibility_range: 1000.0,
            fog_type: FogType::Linear,
        }
    }
}

/// Engine side of scene construction
///
/// `parent` is `None` for entities at the document root. Creation methods
/// return the handle that later calls pass back as `parent`. `tag` is the
/// node's `DEF` name, if it has one.
///
/// Environment setters may be called several times per build; the last
/// call wins.
pub trait WorldAdapter {
    fn create_container_entity(
        &mut self,
        parent: Option<EntityHandle>,
        placement: &Placement,
        tag: Option<&str>,
    ) -> EntityHandle;

    fn create_mesh_entity(
        &mut self,
        parent: Option<EntityHandle>,
        geometry: &GeometryBuffer,
        material: &MaterialDesc,
        placement: &Placement,
        tag: Option<&str>,
    ) -> EntityHandle;

    fn create_light_entity(
        &mut self,
        parent: Option<EntityHandle>,
        light: &LightSpec,
        tag: Option<&str>,
    ) -> EntityHandle;

    fn set_background(&mut self, settings: &BackgroundSettings);

    fn set_fog(&mut self, settings: &FogSettings);

    fn set_viewpoint(
        &mut self,
        position: Vector3<f32>,
        rotation: Quaternion<f32>,
        field_of_view: f32,
        description: &str,
    );
}
