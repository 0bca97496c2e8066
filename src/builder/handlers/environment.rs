//! Environment nodes: no entities, one adapter setter or report entry each

use cgmath::{One, Quaternion, Vector3};

use super::grouping::geo_coords;
use crate::builder::{BuildPass, NavigationInfo, WorldInfo};
use crate::document::SceneNode;
use crate::geo::GeoCoord;
use crate::world::{BackgroundSettings, EntityHandle, FogSettings, FogType, SkyboxUrls};

const DEFAULT_FIELD_OF_VIEW: f32 = std::f32::consts::FRAC_PI_4;

pub fn background_settings(node: &SceneNode) -> BackgroundSettings {
    let defaults = BackgroundSettings::default();
    let urls = |key: &str| node.strings(key).unwrap_or_default();
    BackgroundSettings {
        sky_color: node.field_or("skyColor", defaults.sky_color),
        sky_angle: node.field_or("skyAngle", defaults.sky_angle),
        ground_color: node.field_or("groundColor", defaults.ground_color),
        ground_angle: node.field_or("groundAngle", defaults.ground_angle),
        skybox: SkyboxUrls {
            front: urls("frontUrl"),
            back: urls("backUrl"),
            left: urls("leftUrl"),
            right: urls("rightUrl"),
            top: urls("topUrl"),
            bottom: urls("bottomUrl"),
        },
        transparency: node.field_or("transparency", defaults.transparency),
    }
}

pub fn fog_settings(node: &SceneNode) -> FogSettings {
    let defaults = FogSettings::default();
    FogSettings {
        enabled: true,
        color: node.field_or("color", defaults.color),
        visibility_range: node.field_or("visibilityRange", defaults.visibility_range),
        fog_type: node.attr("fogType").map(FogType::parse).unwrap_or_default(),
    }
}

pub fn handle_background<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    _parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let settings = background_settings(node);
    log::debug!(
        "Background: {} sky colors, {} ground colors, skybox {}",
        settings.sky_color.len(),
        settings.ground_color.len(),
        !settings.skybox.is_empty()
    );
    pass.adapter().set_background(&settings);
    None
}

pub fn handle_fog<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    _parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    pass.adapter().set_fog(&fog_settings(node));
    None
}

fn emit_viewpoint(
    pass: &mut BuildPass<'_, '_>,
    node: &SceneNode,
    position: Vector3<f32>,
) -> Option<EntityHandle> {
    let orientation = node.field_or("orientation", Quaternion::one());
    let field_of_view = node.field_or("fieldOfView", DEFAULT_FIELD_OF_VIEW);
    let description = node.attr("description").unwrap_or_default();
    if !description.is_empty() {
        log::info!("Viewpoint: {}", description);
    }
    pass.adapter()
        .set_viewpoint(position, orientation, field_of_view, description);
    None
}

pub fn handle_viewpoint<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    _parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    emit_viewpoint(pass, node, node.vec3_or_zero("position"))
}

/// `position` is geodetic; it is converted before reaching the adapter
pub fn handle_geo_viewpoint<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    _parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let coord = match node.attr("position") {
        None => GeoCoord::new(0.0, 0.0, 100_000.0),
        Some(_) => match geo_coords(node, "position") {
            Some(coord) => coord,
            None => {
                pass.warn(node, "malformed geodetic position, using the default");
                GeoCoord::new(0.0, 0.0, 100_000.0)
            }
        },
    };
    let local = coord.to_local();
    let position = Vector3::new(local.x as f32, local.y as f32, local.z as f32);
    emit_viewpoint(pass, node, position)
}

pub fn handle_navigation_info<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    _parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let defaults = NavigationInfo::default();
    let navigation = NavigationInfo {
        speed: node.field_or("speed", defaults.speed),
        kinds: node.strings("type").unwrap_or(defaults.kinds),
        headlight: node.field_or("headlight", defaults.headlight),
        avatar_size: node.field_or("avatarSize", defaults.avatar_size),
    };
    log::debug!("NavigationInfo: {:?} at speed {}", navigation.kinds, navigation.speed);
    pass.report_mut().navigation = Some(navigation);
    None
}

pub fn handle_world_info<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    _parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let world_info = WorldInfo {
        title: node.attr("title").unwrap_or_default().to_string(),
        info: node.strings("info").unwrap_or_default(),
    };
    if !world_info.title.is_empty() {
        log::info!("World: {}", world_info.title);
    }
    pass.report_mut().world_info = Some(world_info);
    None
}
