//! Geometry extractors used by `Shape`
//!
//! Each extractor decodes the attributes and data children (`Coordinate`,
//! `Normal`, `Color`, `TextureCoordinate`) of one geometry node and runs the
//! matching builder from [`crate::gfx::geometry`]. Data children go through
//! [`BuildPass::resolved_child`], so they may be `DEF`/`USE` shared.

use cgmath::{Vector2, Vector3};

use crate::builder::dispatch::{GeometryHandler, HandlerRegistry};
use crate::builder::BuildPass;
use crate::document::{Rgb, SceneNode};
use crate::error::GeometryError;
use crate::gfx::geometry::{
    generate_box, generate_cone, generate_cylinder, generate_sphere, ElevationGrid, Extrusion,
    IndexedFaceSet, IndexedTriangles, SolidParts, TriangleTopology,
};
use crate::gfx::GeometryBuffer;

type Extracted = Result<GeometryBuffer, GeometryError>;

pub fn register_defaults(registry: &mut HandlerRegistry) {
    let table: &[(&str, GeometryHandler)] = &[
        ("IndexedFaceSet", indexed_face_set),
        ("IndexedTriangleSet", indexed_triangle_set),
        ("IndexedTriangleStripSet", indexed_triangle_strip_set),
        ("IndexedTriangleFanSet", indexed_triangle_fan_set),
        ("IndexedQuadSet", indexed_quad_set),
        ("TriangleSet", triangle_set),
        ("TriangleStripSet", triangle_strip_set),
        ("TriangleFanSet", triangle_fan_set),
        ("QuadSet", quad_set),
        ("ElevationGrid", elevation_grid),
        ("Extrusion", extrusion),
        ("Box", box_shape),
        ("Sphere", sphere),
        ("Cylinder", cylinder),
        ("Cone", cone),
    ];
    for &(tag, handler) in table {
        registry.register_geometry(tag, handler);
    }
}

fn coords<'t>(pass: &mut BuildPass<'_, 't>, node: &'t SceneNode) -> Vec<Vector3<f32>> {
    pass.resolved_child(node, &["Coordinate", "CoordinateDouble"])
        .map(|c| c.field_or("point", Vec::new()))
        .unwrap_or_default()
}

fn normals<'t>(pass: &mut BuildPass<'_, 't>, node: &'t SceneNode) -> Vec<Vector3<f32>> {
    pass.resolved_child(node, &["Normal"])
        .map(|n| n.field_or("vector", Vec::new()))
        .unwrap_or_default()
}

fn colors<'t>(pass: &mut BuildPass<'_, 't>, node: &'t SceneNode) -> Vec<Rgb> {
    pass.resolved_child(node, &["Color"])
        .map(|c| c.field_or("color", Vec::new()))
        .unwrap_or_default()
}

fn tex_coords<'t>(pass: &mut BuildPass<'_, 't>, node: &'t SceneNode) -> Vec<Vector2<f32>> {
    pass.resolved_child(node, &["TextureCoordinate"])
        .map(|t| t.field_or("point", Vec::new()))
        .unwrap_or_default()
}

pub fn indexed_face_set<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    IndexedFaceSet {
        coords: coords(pass, node),
        coord_index: node.indices("coordIndex"),
        normals: normals(pass, node),
        normal_index: node.indices("normalIndex"),
        normal_per_vertex: node.field_or("normalPerVertex", true),
        colors: colors(pass, node),
        color_index: node.indices("colorIndex"),
        color_per_vertex: node.field_or("colorPerVertex", true),
        tex_coords: tex_coords(pass, node),
        tex_coord_index: node.indices("texCoordIndex"),
        ccw: node.field_or("ccw", true),
        crease_angle: node.field_or("creaseAngle", 0.0),
    }
    .build()
}

/// Shared decoding for the triangle and quad families
fn triangles<'t>(
    pass: &mut BuildPass<'_, 't>,
    node: &'t SceneNode,
    topology: TriangleTopology,
    index: Option<Vec<i32>>,
    counts: Vec<i32>,
) -> Extracted {
    IndexedTriangles {
        topology,
        coords: coords(pass, node),
        index,
        counts,
        normals: normals(pass, node),
        colors: colors(pass, node),
        tex_coords: tex_coords(pass, node),
        ccw: node.field_or("ccw", true),
    }
    .build()
}

pub fn indexed_triangle_set<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    let index = node.indices("index");
    triangles(pass, node, TriangleTopology::List, Some(index), Vec::new())
}

pub fn indexed_triangle_strip_set<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
) -> Extracted {
    let index = node.indices("index");
    triangles(pass, node, TriangleTopology::Strip, Some(index), Vec::new())
}

pub fn indexed_triangle_fan_set<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
) -> Extracted {
    let index = node.indices("index");
    triangles(pass, node, TriangleTopology::Fan, Some(index), Vec::new())
}

pub fn indexed_quad_set<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    let index = node.indices("index");
    triangles(pass, node, TriangleTopology::Quads, Some(index), Vec::new())
}

pub fn triangle_set<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    triangles(pass, node, TriangleTopology::List, None, Vec::new())
}

pub fn triangle_strip_set<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    let counts = node.indices("stripCount");
    triangles(pass, node, TriangleTopology::Strip, None, counts)
}

pub fn triangle_fan_set<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    let counts = node.indices("fanCount");
    triangles(pass, node, TriangleTopology::Fan, None, counts)
}

pub fn quad_set<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    triangles(pass, node, TriangleTopology::Quads, None, Vec::new())
}

pub fn elevation_grid<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    ElevationGrid {
        x_dimension: node.field_or("xDimension", 0),
        z_dimension: node.field_or("zDimension", 0),
        x_spacing: node.field_or("xSpacing", 1.0),
        z_spacing: node.field_or("zSpacing", 1.0),
        heights: node.field_or("height", Vec::new()),
        colors: colors(pass, node),
        color_per_vertex: node.field_or("colorPerVertex", true),
        ccw: node.field_or("ccw", true),
    }
    .build()
}

pub fn extrusion<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    let defaults = Extrusion::default();
    let caps = pass.options().extrusion_caps;
    Extrusion {
        cross_section: node.field_or("crossSection", defaults.cross_section),
        spine: node.field_or("spine", defaults.spine),
        scale: node.field_or("scale", defaults.scale),
        orientation: node.field_or("orientation", defaults.orientation),
        begin_cap: caps && node.field_or("beginCap", true),
        end_cap: caps && node.field_or("endCap", true),
        ccw: node.field_or("ccw", true),
    }
    .build()
}

pub fn box_shape<'a, 't>(_pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    Ok(generate_box(node.field_or("size", Vector3::new(2.0, 2.0, 2.0))))
}

pub fn sphere<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    let options = pass.options();
    Ok(generate_sphere(
        node.field_or("radius", 1.0),
        options.primitive_segments,
        options.sphere_rings,
    ))
}

pub fn cylinder<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    let parts = SolidParts {
        top: node.field_or("top", true),
        bottom: node.field_or("bottom", true),
        side: node.field_or("side", true),
    };
    Ok(generate_cylinder(
        node.field_or("radius", 1.0),
        node.field_or("height", 2.0),
        pass.options().primitive_segments,
        parts,
    ))
}

pub fn cone<'a, 't>(pass: &mut BuildPass<'a, 't>, node: &'t SceneNode) -> Extracted {
    let parts = SolidParts {
        top: false,
        bottom: node.field_or("bottom", true),
        side: node.field_or("side", true),
    };
    Ok(generate_cone(
        node.field_or("bottomRadius", 1.0),
        node.field_or("height", 2.0),
        pass.options().primitive_segments,
        parts,
    ))
}
