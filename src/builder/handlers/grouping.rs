//! Structural and grouping nodes

use cgmath::{One, Quaternion, Vector3};

use crate::builder::BuildPass;
use crate::document::fields::tokens;
use crate::document::SceneNode;
use crate::geo::GeoCoord;
use crate::world::{EntityHandle, Placement};

/// Root `X3D` element: records version and profile, then builds the scene
pub fn handle_document<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let version = node.attr("version").map(str::to_string);
    let profile = node.attr("profile").map(str::to_string);
    log::info!(
        "X3D document version {} profile {}",
        version.as_deref().unwrap_or("?"),
        profile.as_deref().unwrap_or("?")
    );

    let report = pass.report_mut();
    report.version = version;
    report.profile = profile;

    pass.visit_children(node, parent);
    None
}

/// `Scene`, `head` and friends: no entity, children stay under `parent`
pub fn handle_passthrough<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    pass.visit_children(node, parent);
    None
}

/// Recognised nodes that carry nothing this builder uses
pub fn handle_ignored<'a, 't>(
    _pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    _parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    log::debug!("<{}> ignored", node.name());
    None
}

pub fn handle_inline<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    _parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let url = node.strings("url").unwrap_or_default();
    pass.warn(
        node,
        format!("external scenes are not loaded, skipped url {:?}", url),
    );
    None
}

/// Decodes `translation`, `rotation` and `scale`, each defaulting to identity
pub fn transform_placement(node: &SceneNode) -> Placement {
    Placement::new(
        node.vec3_or_zero("translation"),
        node.field_or("rotation", Quaternion::one()),
        node.field_or("scale", Vector3::new(1.0, 1.0, 1.0)),
    )
}

pub fn handle_transform<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let placement = transform_placement(node);
    let entity = pass.create_container(parent, &placement, node);
    pass.visit_children(node, Some(entity));
    Some(entity)
}

/// Any grouping node without its own transform
///
/// `Switch` and `LOD` build every child; choosing among them is left to the
/// host.
pub fn handle_group<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let entity = pass.create_container(parent, &Placement::identity(), node);
    pass.visit_children(node, Some(entity));
    Some(entity)
}

pub fn handle_geo_location<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let placement = match geo_coords(node, "geoCoords") {
        Some(coord) => {
            let local = coord.to_local();
            Placement::identity().with_position(Vector3::new(
                local.x as f32,
                local.y as f32,
                local.z as f32,
            ))
        }
        None => {
            pass.warn(node, "missing or malformed geoCoords, placed at origin");
            Placement::identity()
        }
    };
    let entity = pass.create_container(parent, &placement, node);
    pass.visit_children(node, Some(entity));
    Some(entity)
}

/// Reads a geodetic triple; the altitude may be omitted
///
/// `geoSystem` containing `longitude_first` swaps the first two values.
pub fn geo_coords(node: &SceneNode, key: &str) -> Option<GeoCoord> {
    let values = tokens(node.attr(key)?)
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    if values.len() < 2 {
        return None;
    }
    let triple = Vector3::new(values[0], values[1], values.get(2).copied().unwrap_or(0.0));
    let longitude_first = node
        .strings("geoSystem")
        .is_some_and(|system| system.iter().any(|s| s == "longitude_first"));
    Some(GeoCoord::from_triple(triple, longitude_first))
}
