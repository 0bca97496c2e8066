//! `Shape`: appearance plus geometry, turned into one mesh entity

use crate::builder::BuildPass;
use crate::document::SceneNode;
use crate::gfx::{MaterialDesc, TextureDesc};
use crate::world::{EntityHandle, Placement};

pub fn handle_shape<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let material = appearance(pass, node);

    let registry = pass.registry();
    let geometry_child = node
        .children()
        .iter()
        .find(|c| registry.is_geometry(c.name()));

    let built = match geometry_child {
        None => Err("no geometry node".to_string()),
        Some(child) => match pass.resolve(child) {
            None => Err(format!("geometry <{}> did not resolve", child.name())),
            Some(geometry) => match registry.geometry(geometry.name()) {
                Some(extract) => extract(pass, geometry)
                    .and_then(|buffer| buffer.validate().map(|()| buffer))
                    .map_err(|err| format!("<{}>: {}", geometry.name(), err)),
                None => Err(format!("<{}> is not a geometry node", geometry.name())),
            },
        },
    };

    let entity = match built {
        Ok(mut geometry) => {
            geometry.ensure_normals();
            log::debug!(
                "Shape mesh: {} vertices, {} triangles",
                geometry.vertex_count(),
                geometry.triangle_count()
            );
            pass.create_mesh(parent, &geometry, &material, &Placement::identity(), node)
        }
        Err(reason) => {
            pass.warn(node, format!("{}, building an empty container", reason));
            pass.create_container(parent, &Placement::identity(), node)
        }
    };

    for child in node.children() {
        let consumed = child.name() == "Appearance"
            || geometry_child.is_some_and(|g| std::ptr::eq(g, child));
        if !consumed {
            pass.visit(child, Some(entity));
        }
    }
    Some(entity)
}

/// Decodes the `Appearance` child, or the default material without one
fn appearance<'t>(pass: &mut BuildPass<'_, 't>, shape: &'t SceneNode) -> MaterialDesc {
    let Some(appearance) = pass.resolved_child(shape, &["Appearance"]) else {
        return MaterialDesc::default();
    };

    let mut material = pass
        .resolved_child(appearance, &["Material"])
        .map(MaterialDesc::from_node)
        .unwrap_or_default();
    if let Some(texture) = pass.resolved_child(appearance, &["ImageTexture"]) {
        material = material.with_texture(TextureDesc::from_node(texture));
    }
    material
}
