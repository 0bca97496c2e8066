use cgmath::Vector3;

use super::*;
use crate::document::parse_str;
use crate::world::{AdapterCall, LightType, RecordingAdapter};

fn build_with(builder: &SceneBuilder, xml: &str) -> (Vec<AdapterCall>, BuildReport) {
    let root = parse_str(xml).expect("test document should parse");
    let mut world = RecordingAdapter::new();
    let report = builder.build(&root, &mut world);
    (world.into_calls(), report)
}

fn build(xml: &str) -> (Vec<AdapterCall>, BuildReport) {
    build_with(&SceneBuilder::new(), xml)
}

fn meshes(calls: &[AdapterCall]) -> Vec<(&GeometryBuffer, &MaterialDesc)> {
    calls
        .iter()
        .filter_map(|c| match c {
            AdapterCall::CreateMesh {
                geometry, material, ..
            } => Some((geometry, material)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_use_matches_verbatim_copy() {
    let with_use = r#"<X3D><Scene>
        <Transform DEF="Post" translation="1 0 0">
          <Shape><Box size="0.2 2 0.2"/></Shape>
          <PointLight location="0 2 0"/>
        </Transform>
        <Group>
          <Transform USE="Post"/>
        </Group>
    </Scene></X3D>"#;
    let copied = r#"<X3D><Scene>
        <Transform DEF="Post" translation="1 0 0">
          <Shape><Box size="0.2 2 0.2"/></Shape>
          <PointLight location="0 2 0"/>
        </Transform>
        <Group>
          <Transform DEF="Post" translation="1 0 0">
            <Shape><Box size="0.2 2 0.2"/></Shape>
            <PointLight location="0 2 0"/>
          </Transform>
        </Group>
    </Scene></X3D>"#;

    let (use_calls, use_report) = build(with_use);
    let (copy_calls, copy_report) = build(copied);

    assert_eq!(use_calls, copy_calls);
    assert_eq!(use_report.entity_count, 7);
    assert!(use_report.diagnostics.is_empty());
    assert!(copy_report.diagnostics.is_empty());
}

#[test]
fn test_use_builds_fresh_entities_under_new_parent() {
    let (calls, _) = build(
        r#"<Scene>
            <Group DEF="Cell"><Transform/></Group>
            <Transform translation="5 0 0"><Group USE="Cell"/></Transform>
        </Scene>"#,
    );
    // Group(1) > Transform(2), Transform(3) > Group(4) > Transform(5)
    assert_eq!(calls.len(), 5);
    assert_eq!(calls[3].parent(), Some(EntityHandle(3)));
    assert_eq!(calls[3].tag(), Some("Cell"));
    assert_eq!(calls[4].parent(), Some(EntityHandle(4)));
}

#[test]
fn test_undeclared_use_is_skipped() {
    let (calls, report) = build(r#"<Scene><Transform USE="Nowhere"><Shape><Box/></Shape></Transform></Scene>"#);
    assert!(calls.is_empty());
    assert_eq!(report.entity_count, 0);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].severity, Severity::Warning);
    assert!(report.diagnostics[0].message.contains("Nowhere"));
}

#[test]
fn test_forward_use_does_not_resolve() {
    let (calls, report) = build(r#"<Scene><Group USE="Later"/><Group DEF="Later"/></Scene>"#);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tag(), Some("Later"));
    assert_eq!(report.warnings().count(), 1);
}

#[test]
fn test_self_referencing_use_is_cut() {
    let (calls, report) = build(
        r#"<Scene>
            <Group DEF="A"/>
            <Group DEF="A"><Group USE="A"/></Group>
            <Transform USE="A"/>
        </Scene>"#,
    );
    // Inner USE first resolves to the empty group, then to its own ancestor
    assert_eq!(calls.len(), 4);
    assert_eq!(report.warnings().count(), 1);
    assert!(report.diagnostics[0].message.contains("refers to itself"));
}

#[test]
fn test_use_depth_limit() {
    let builder = SceneBuilder::with_options(BuildOptions::new().with_max_use_depth(1));
    let (calls, report) = build_with(
        &builder,
        r#"<Scene>
            <Group DEF="Leaf"/>
            <Group DEF="Branch"><Group USE="Leaf"/></Group>
            <Group USE="Branch"/>
        </Scene>"#,
    );
    // Leaf, Branch, Branch's Leaf, the re-processed Branch; its nested Leaf is cut
    assert_eq!(calls.len(), 4);
    assert!(report.diagnostics[0].message.contains("deeper than 1"));
}

#[test]
fn test_transform_without_attributes_is_identity() {
    let (calls, _) = build("<Transform/>");
    assert_eq!(
        calls,
        vec![AdapterCall::CreateContainer {
            handle: EntityHandle(1),
            parent: None,
            placement: Placement::identity(),
            tag: None,
        }]
    );
}

#[test]
fn test_transform_fields_and_nesting() {
    let (calls, _) = build(
        r#"<Transform DEF="Outer" translation="0 1 0" scale="2 2 2">
             <Transform translation="3 0 0"/>
           </Transform>"#,
    );
    let AdapterCall::CreateContainer { placement, tag, .. } = &calls[0] else {
        panic!("expected a container");
    };
    assert_eq!(placement.position, Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(placement.scale, Vector3::new(2.0, 2.0, 2.0));
    assert_eq!(tag.as_deref(), Some("Outer"));
    assert_eq!(calls[1].parent(), Some(EntityHandle(1)));
}

#[test]
fn test_building_twice_is_identical() {
    let root = parse_str(
        r#"<X3D><Scene>
            <Background skyColor="0 0 1"/>
            <Transform DEF="T"><Shape><Sphere/></Shape></Transform>
            <Transform USE="T"/>
            <Mystery/>
        </Scene></X3D>"#,
    )
    .unwrap();
    let builder = SceneBuilder::new();

    let mut first = RecordingAdapter::new();
    let mut second = RecordingAdapter::new();
    let first_report = builder.build(&root, &mut first);
    let second_report = builder.build(&root, &mut second);

    assert_eq!(first.calls(), second.calls());
    assert_eq!(first_report, second_report);
}

#[test]
fn test_unknown_tag_is_opaque_by_default() {
    let xml = r#"<Scene><Mystery><Transform/></Mystery></Scene>"#;

    let (calls, report) = build(xml);
    assert!(calls.is_empty());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].node, "Mystery");

    let builder =
        SceneBuilder::with_options(BuildOptions::new().with_traverse_unknown_children(true));
    let (calls, report) = build_with(&builder, xml);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].parent(), None);
    assert_eq!(report.diagnostics.len(), 1);
}

#[test]
fn test_structural_nodes_keep_parent() {
    let (calls, report) = build(
        r#"<X3D version="4.0" profile="Interchange">
            <head><meta name="title" content="demo"/></head>
            <Scene><Group/></Scene>
        </X3D>"#,
    );
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].parent(), None);
    assert_eq!(report.version.as_deref(), Some("4.0"));
    assert_eq!(report.profile.as_deref(), Some("Interchange"));
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_shape_with_indexed_face_set() {
    let (calls, report) = build(
        r#"<Shape>
            <Appearance><Material diffuseColor="1 0 0"/></Appearance>
            <IndexedFaceSet coordIndex="0 1 2 3 -1">
              <Coordinate point="0 0 0, 1 0 0, 1 1 0, 0 1 0"/>
            </IndexedFaceSet>
        </Shape>"#,
    );
    assert!(report.diagnostics.is_empty());
    let meshes = meshes(&calls);
    assert_eq!(meshes.len(), 1);
    let (geometry, material) = meshes[0];
    assert_eq!(geometry.triangle_count(), 2);
    assert!(geometry.normals.is_some());
    assert_eq!(material.diffuse_color, [1.0, 0.0, 0.0]);
}

#[test]
fn test_shape_without_appearance_gets_default_material() {
    let (calls, _) = build(r#"<Shape><Cone/></Shape>"#);
    let meshes = meshes(&calls);
    assert_eq!(meshes[0].1, &MaterialDesc::default());
}

#[test]
fn test_shape_without_geometry_falls_back_to_container() {
    let (calls, report) = build(
        r#"<Transform>
            <Shape DEF="Empty"><Appearance><Material/></Appearance></Shape>
            <Shape><IndexedFaceSet coordIndex="0 1 2"/></Shape>
        </Transform>"#,
    );
    assert_eq!(calls.len(), 3);
    assert!(calls[1..]
        .iter()
        .all(|c| matches!(c, AdapterCall::CreateContainer { parent: Some(EntityHandle(1)), .. })));
    assert_eq!(calls[1].tag(), Some("Empty"));
    assert_eq!(report.warnings().count(), 2);
    assert!(report.diagnostics[1].message.contains("IndexedFaceSet"));
}

#[test]
fn test_shared_appearance_and_coordinates() {
    let (calls, report) = build(
        r#"<Scene>
            <Shape>
              <Appearance DEF="Red"><Material diffuseColor="1 0 0"/></Appearance>
              <IndexedTriangleSet index="0 1 2">
                <Coordinate DEF="Tri" point="0 0 0, 1 0 0, 0 1 0"/>
              </IndexedTriangleSet>
            </Shape>
            <Shape>
              <Appearance USE="Red"/>
              <TriangleSet><Coordinate USE="Tri"/></TriangleSet>
            </Shape>
        </Scene>"#,
    );
    assert!(report.diagnostics.is_empty());
    let meshes = meshes(&calls);
    assert_eq!(meshes.len(), 2);
    assert_eq!(meshes[0].1, meshes[1].1);
    assert_eq!(meshes[0].0.positions, meshes[1].0.positions);
}

#[test]
fn test_geometry_use() {
    let (calls, _) = build(
        r#"<Scene>
            <Shape><Box DEF="Crate" size="1 1 1"/></Shape>
            <Shape><Box USE="Crate"/></Shape>
        </Scene>"#,
    );
    let meshes = meshes(&calls);
    assert_eq!(meshes.len(), 2);
    assert_eq!(meshes[0].0, meshes[1].0);
}

#[test]
fn test_extrusion_caps_option() {
    let xml = r#"<Shape><Extrusion/></Shape>"#;
    let (capped, _) = build(xml);
    let builder = SceneBuilder::with_options(BuildOptions::new().with_extrusion_caps(false));
    let (open, _) = build_with(&builder, xml);

    let capped = meshes(&capped)[0].0.triangle_count();
    let open = meshes(&open)[0].0.triangle_count();
    assert_eq!(open, 8);
    assert!(capped > open);
}

#[test]
fn test_lights_attach_to_parent() {
    let (calls, _) = build(
        r#"<Transform>
            <DirectionalLight DEF="Sun" intensity="0.5"/>
            <SpotLight cutOffAngle="0.5"/>
        </Transform>"#,
    );
    let AdapterCall::CreateLight {
        parent, light, tag, ..
    } = &calls[1]
    else {
        panic!("expected a light");
    };
    assert_eq!(*parent, Some(EntityHandle(1)));
    assert_eq!(light.light_type, LightType::Directional);
    assert_eq!(light.intensity, 0.5);
    assert_eq!(tag.as_deref(), Some("Sun"));

    let AdapterCall::CreateLight { light, .. } = &calls[2] else {
        panic!("expected a light");
    };
    assert_eq!(light.light_type, LightType::Spot);
    assert!(light.spot_angle_degrees.is_some());
}

#[test]
fn test_environment_nodes_call_setters_in_order() {
    let (calls, report) = build(
        r#"<Scene>
            <Background skyColor="0 0 1"/>
            <Fog visibilityRange="50"/>
            <Viewpoint position="0 1.6 10" description="Entrance"/>
            <Background skyColor="1 0 0"/>
        </Scene>"#,
    );
    assert_eq!(report.entity_count, 0);
    assert_eq!(calls.len(), 4);

    let AdapterCall::SetFog(fog) = &calls[1] else {
        panic!("expected fog");
    };
    assert_eq!(fog.visibility_range, 50.0);

    let AdapterCall::SetViewpoint {
        position,
        description,
        field_of_view,
        ..
    } = &calls[2]
    else {
        panic!("expected a viewpoint");
    };
    assert_eq!(*position, Vector3::new(0.0, 1.6, 10.0));
    assert_eq!(description, "Entrance");
    assert!((field_of_view - std::f32::consts::FRAC_PI_4).abs() < 1e-6);

    // The adapter sees both backgrounds; the last one is in effect
    let last = calls
        .iter()
        .rev()
        .find_map(|c| match c {
            AdapterCall::SetBackground(settings) => Some(settings),
            _ => None,
        })
        .unwrap();
    assert_eq!(last.sky_color, vec![[1.0, 0.0, 0.0]]);
}

#[test]
fn test_navigation_and_world_info_are_reported() {
    let (calls, report) = build(
        r#"<Scene>
            <WorldInfo title="Harbour" info='"built for tests"'/>
            <NavigationInfo speed="2"/>
            <NavigationInfo type='"WALK" "ANY"' headlight="false"/>
        </Scene>"#,
    );
    assert!(calls.is_empty());
    let navigation = report.navigation.unwrap();
    assert_eq!(navigation.kinds, vec!["WALK".to_string(), "ANY".to_string()]);
    assert_eq!(navigation.speed, 1.0);
    assert!(!navigation.headlight);
    let world_info = report.world_info.unwrap();
    assert_eq!(world_info.title, "Harbour");
    assert_eq!(world_info.info, vec!["built for tests".to_string()]);
}

#[test]
fn test_geo_location_positions_container() {
    let (calls, report) = build(r#"<GeoLocation geoCoords="0 0 0"><Group/></GeoLocation>"#);
    assert!(report.diagnostics.is_empty());
    let AdapterCall::CreateContainer { placement, .. } = &calls[0] else {
        panic!("expected a container");
    };
    assert!((placement.position.x - crate::geo::WGS84_A as f32).abs() < 1.0);
    assert_eq!(calls[1].parent(), Some(EntityHandle(1)));
}

fn viewpoint_position(calls: &[AdapterCall]) -> Vector3<f32> {
    match calls {
        [AdapterCall::SetViewpoint { position, .. }] => *position,
        other => panic!("expected a single viewpoint, got {:?}", other),
    }
}

#[test]
fn test_geo_viewpoint_converts_position() {
    let (calls, report) = build(r#"<GeoViewpoint position="0 0 0" description="Null Island"/>"#);
    assert!(report.diagnostics.is_empty());
    let position = viewpoint_position(&calls);
    assert!((position.x - crate::geo::WGS84_A as f32).abs() < 1.0);
    assert!(position.y.abs() < 1.0 && position.z.abs() < 1.0);
}

#[test]
fn test_geo_viewpoint_defaults_to_high_altitude() {
    let (calls, _) = build(r#"<GeoViewpoint/>"#);
    let position = viewpoint_position(&calls);
    assert!((position.x - (crate::geo::WGS84_A + 100_000.0) as f32).abs() < 1.0);
}

#[test]
fn test_malformed_geo_viewpoint_warns_once() {
    let (calls, report) = build(r#"<GeoViewpoint position="north 0 0"/>"#);
    assert_eq!(report.warnings().count(), 1);
    assert!(report.diagnostics[0].message.contains("geodetic position"));
    let position = viewpoint_position(&calls);
    assert!((position.x - (crate::geo::WGS84_A + 100_000.0) as f32).abs() < 1.0);
}

#[test]
fn test_elevation_grid_fields_reach_the_mesh() {
    let (calls, report) = build(
        r#"<Shape><ElevationGrid xDimension="2" zDimension="2" xSpacing="2" height="0 1 2 3"/></Shape>"#,
    );
    assert!(report.diagnostics.is_empty());
    let meshes = meshes(&calls);
    assert_eq!(meshes.len(), 1);
    let geometry = meshes[0].0;
    assert_eq!(
        geometry.positions,
        vec![[0.0, 0.0, 0.0], [2.0, 1.0, 0.0], [0.0, 2.0, 1.0], [2.0, 3.0, 1.0]]
    );
    assert_eq!(geometry.triangle_count(), 2);
}

#[test]
fn test_oversized_elevation_grid_falls_back_to_container() {
    let (calls, report) =
        build(r#"<Shape><ElevationGrid xDimension="100000" zDimension="100000"/></Shape>"#);
    assert!(matches!(calls[..], [AdapterCall::CreateContainer { .. }]));
    assert_eq!(report.warnings().count(), 1);
    assert!(report.diagnostics[0].message.contains("ElevationGrid"));
}

#[test]
fn test_primitive_with_every_part_disabled_is_a_container() {
    let (calls, report) = build(
        r#"<Group>
            <Shape><Cylinder top="false" bottom="false" side="false"/></Shape>
            <Shape><Cone bottom="false" side="false"/></Shape>
            <Shape><Cylinder top="false" bottom="false"/></Shape>
        </Group>"#,
    );
    assert_eq!(calls.len(), 4);
    assert!(matches!(calls[1], AdapterCall::CreateContainer { .. }));
    assert!(matches!(calls[2], AdapterCall::CreateContainer { .. }));
    assert!(matches!(calls[3], AdapterCall::CreateMesh { .. }));
    assert_eq!(report.warnings().count(), 2);
    assert!(report.diagnostics[0].message.contains("Cylinder"));
    assert!(report.diagnostics[1].message.contains("Cone"));
}

#[test]
fn test_animation_inventory_and_routes() {
    let (calls, report) = build(
        r#"<Scene>
            <TimeSensor DEF="Clock" cycleInterval="4" loop="true"/>
            <PositionInterpolator DEF="Path" key="0 1" keyValue="0 0 0 0 5 0"/>
            <Transform DEF="Ball"/>
            <ROUTE fromNode="Clock" fromField="fraction_changed" toNode="Path" toField="set_fraction"/>
            <ROUTE fromNode="Path" fromField="value_changed" toNode="Ball" toField="set_translation"/>
            <ROUTE fromNode="Path" fromField="value_changed"/>
        </Scene>"#,
    );
    assert_eq!(calls.len(), 1);
    assert_eq!(report.animation.time_sensors.len(), 1);
    assert_eq!(report.animation.time_sensors[0].cycle_interval, 4.0);
    assert!(report.animation.interpolator("Path").is_some());
    assert_eq!(report.routes.len(), 2);
    assert_eq!(
        report.routes[1].to_string(),
        "Path.value_changed -> Ball.set_translation"
    );
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_inline_is_reported() {
    let (calls, report) = build(r#"<Scene><Inline url='"other.x3d"'/></Scene>"#);
    assert!(calls.is_empty());
    assert_eq!(report.warnings().count(), 1);
}

fn marker<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let placement = Placement::identity().with_position(node.vec3_or_zero("at"));
    Some(pass.create_container(parent, &placement, node))
}

#[test]
fn test_custom_handler() {
    let mut builder = SceneBuilder::new();
    builder.registry_mut().register("Marker", marker);

    let (calls, report) = build_with(&builder, r#"<Scene><Marker DEF="M" at="1 2 3"/><Transform USE="M"/></Scene>"#);
    assert!(report.diagnostics.is_empty());
    assert_eq!(calls.len(), 2);
    let AdapterCall::CreateContainer { placement, .. } = &calls[1] else {
        panic!("expected a container");
    };
    assert_eq!(placement.position, Vector3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_empty_registry_reports_everything() {
    let builder = SceneBuilder::new().with_registry(HandlerRegistry::empty());
    let (calls, report) = build_with(&builder, "<X3D><Scene/></X3D>");
    assert!(calls.is_empty());
    assert_eq!(report.diagnostics.len(), 1);
}
