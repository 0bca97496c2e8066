//! Default node handlers, grouped by node family
//!
//! | Family      | Tags |
//! |-------------|------|
//! | structural  | `X3D`, `Scene`, `head`, `component`, `meta`, `unit` |
//! | grouping    | `Transform`, `Group`, `StaticGroup`, `Anchor`, `Switch`, `LOD`, `Billboard`, `Collision`, `GeoLocation` |
//! | geometry    | `Shape` plus the geometry tags in [`geometry`] |
//! | lights      | `DirectionalLight`, `PointLight`, `SpotLight` |
//! | environment | `Background`, `TextureBackground`, `Fog`, `Viewpoint`, `GeoViewpoint`, `NavigationInfo`, `WorldInfo` |
//! | animation   | `TimeSensor`, the four interpolators, `ROUTE` |
//! | ignored     | `Inline` (reported), `GeoOrigin`, `Metadata*` |

pub mod animation;
pub mod environment;
pub mod geometry;
pub mod grouping;
pub mod lights;
pub mod shape;

use super::dispatch::{HandlerRegistry, NodeHandler};

/// Fills `registry` with every built-in handler
pub fn register_defaults(registry: &mut HandlerRegistry) {
    let table: &[(&str, NodeHandler)] = &[
        ("X3D", grouping::handle_document),
        ("Scene", grouping::handle_passthrough),
        ("head", grouping::handle_passthrough),
        ("component", grouping::handle_passthrough),
        ("meta", grouping::handle_passthrough),
        ("unit", grouping::handle_passthrough),
        ("Transform", grouping::handle_transform),
        ("Group", grouping::handle_group),
        ("StaticGroup", grouping::handle_group),
        ("Anchor", grouping::handle_group),
        ("Switch", grouping::handle_group),
        ("LOD", grouping::handle_group),
        ("Billboard", grouping::handle_group),
        ("Collision", grouping::handle_group),
        ("GeoLocation", grouping::handle_geo_location),
        ("GeoOrigin", grouping::handle_ignored),
        ("Inline", grouping::handle_inline),
        ("Shape", shape::handle_shape),
        ("DirectionalLight", lights::handle_directional_light),
        ("PointLight", lights::handle_point_light),
        ("SpotLight", lights::handle_spot_light),
        ("Background", environment::handle_background),
        ("TextureBackground", environment::handle_background),
        ("Fog", environment::handle_fog),
        ("Viewpoint", environment::handle_viewpoint),
        ("GeoViewpoint", environment::handle_geo_viewpoint),
        ("NavigationInfo", environment::handle_navigation_info),
        ("WorldInfo", environment::handle_world_info),
        ("TimeSensor", animation::handle_time_sensor),
        ("PositionInterpolator", animation::handle_interpolator),
        ("OrientationInterpolator", animation::handle_interpolator),
        ("ColorInterpolator", animation::handle_interpolator),
        ("ScalarInterpolator", animation::handle_interpolator),
        ("ROUTE", grouping::handle_ignored),
        ("MetadataBoolean", grouping::handle_ignored),
        ("MetadataDouble", grouping::handle_ignored),
        ("MetadataFloat", grouping::handle_ignored),
        ("MetadataInteger", grouping::handle_ignored),
        ("MetadataSet", grouping::handle_ignored),
        ("MetadataString", grouping::handle_ignored),
    ];
    for &(tag, handler) in table {
        registry.register(tag, handler);
    }

    geometry::register_defaults(registry);
}
