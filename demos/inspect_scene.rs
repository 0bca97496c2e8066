//! Scene inspector
//!
//! Builds an X3D document into a recording adapter and prints every world
//! call, followed by the build report.
//!
//! ```text
//! cargo run --example inspect_scene -- path/to/scene.x3d
//! RUST_LOG=debug cargo run --example inspect_scene
//! ```

use anyhow::Context;
use x3d_builder::prelude::*;

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<X3D profile="Interchange" version="3.3">
  <head><meta name="title" content="Harbour"/></head>
  <Scene>
    <WorldInfo title="Harbour"/>
    <Background skyColor="0.2 0.4 0.8, 0.8 0.9 1" skyAngle="1.3"/>
    <Viewpoint position="0 3 18" description="Quay"/>
    <DirectionalLight direction="-1 -1 -0.5" intensity="0.8"/>
    <Transform DEF="Bollard" translation="-2 0.5 0">
      <Shape>
        <Appearance><Material diffuseColor="0.3 0.3 0.3"/></Appearance>
        <Cylinder radius="0.25" height="1"/>
      </Shape>
    </Transform>
    <Transform translation="2 0 0"><Transform USE="Bollard"/></Transform>
    <Shape>
      <Appearance><Material diffuseColor="0.4 0.6 0.3"/></Appearance>
      <ElevationGrid xDimension="3" zDimension="3" xSpacing="4" zSpacing="4"
                     height="0 0.5 0, 0.5 1 0.5, 0 0.5 0"/>
    </Shape>
    <TimeSensor DEF="Tide" cycleInterval="12" loop="true"/>
    <ScalarInterpolator DEF="Level" key="0 0.5 1" keyValue="0 0.4 0"/>
    <ROUTE fromNode="Tide" fromField="fraction_changed" toNode="Level" toField="set_fraction"/>
  </Scene>
</X3D>"#;

fn describe(call: &AdapterCall) -> String {
    match call {
        AdapterCall::CreateContainer {
            handle,
            parent,
            placement,
            tag,
        } => format!(
            "{:?} container under {:?} at {:?} {}",
            handle,
            parent,
            placement.position,
            tag.as_deref().unwrap_or("")
        ),
        AdapterCall::CreateMesh {
            handle,
            parent,
            geometry,
            material,
            tag,
            ..
        } => format!(
            "{:?} mesh under {:?}: {} vertices, {} triangles, color {:?} {}",
            handle,
            parent,
            geometry.vertex_count(),
            geometry.triangle_count(),
            material.diffuse_color,
            tag.as_deref().unwrap_or("")
        ),
        AdapterCall::CreateLight {
            handle,
            parent,
            light,
            ..
        } => format!(
            "{:?} {:?} light under {:?}, intensity {}",
            handle, light.light_type, parent, light.intensity
        ),
        AdapterCall::SetBackground(settings) => {
            format!("background with {} sky colors", settings.sky_color.len())
        }
        AdapterCall::SetFog(settings) => format!("fog to {}m", settings.visibility_range),
        AdapterCall::SetViewpoint {
            position,
            description,
            ..
        } => format!("viewpoint '{}' at {:?}", description, position),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let root = match std::env::args().nth(1) {
        Some(path) => parse_file(&path).with_context(|| format!("loading {}", path))?,
        None => parse_str(SAMPLE).context("parsing the built-in sample")?,
    };

    let mut world = RecordingAdapter::new();
    let report = SceneBuilder::new().build(&root, &mut world);

    println!("World calls:");
    for call in world.calls() {
        println!("  {}", describe(call));
    }

    println!(
        "\n{} entities, {} routes, {} time sensors, {} interpolators",
        report.entity_count,
        report.routes.len(),
        report.animation.time_sensors.len(),
        report.animation.interpolators.len()
    );
    for route in &report.routes {
        println!("  route {}", route);
    }
    if report.diagnostics.is_empty() {
        println!("No diagnostics");
    } else {
        println!("Diagnostics:");
        for diagnostic in &report.diagnostics {
            println!("  {:?} {}", diagnostic.severity, diagnostic);
        }
    }
    Ok(())
}
