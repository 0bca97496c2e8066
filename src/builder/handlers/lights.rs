//! Light nodes
//!
//! Light directions become rotations that turn the engine's forward axis
//! (-Z) onto the X3D `direction` vector.

use cgmath::{InnerSpace, One, Quaternion, Vector3};

use crate::builder::BuildPass;
use crate::document::SceneNode;
use crate::world::{EntityHandle, LightSpec, LightType};

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const DEFAULT_RADIUS: f32 = 10.0;
const DEFAULT_CUT_OFF: f32 = std::f32::consts::FRAC_PI_4;

/// Rotation aiming -Z along `direction`; identity for a zero vector
pub fn aim_rotation(direction: Vector3<f32>) -> Quaternion<f32> {
    if direction.magnitude2() <= f32::EPSILON {
        return Quaternion::one();
    }
    Quaternion::from_arc(-Vector3::unit_z(), direction.normalize(), None)
}

fn direction(node: &SceneNode) -> Vector3<f32> {
    node.field_or("direction", Vector3::new(0.0, -1.0, 0.0))
}

pub fn directional_light(node: &SceneNode) -> LightSpec {
    LightSpec {
        light_type: LightType::Directional,
        color: node.field_or("color", WHITE),
        intensity: node.field_or("intensity", 1.0),
        position: Vector3::new(0.0, 0.0, 0.0),
        rotation: aim_rotation(direction(node)),
        range: 0.0,
        spot_angle_degrees: None,
    }
}

pub fn point_light(node: &SceneNode) -> LightSpec {
    LightSpec {
        light_type: LightType::Point,
        color: node.field_or("color", WHITE),
        intensity: node.field_or("intensity", 1.0),
        position: node.vec3_or_zero("location"),
        rotation: Quaternion::one(),
        range: node.field_or("radius", DEFAULT_RADIUS),
        spot_angle_degrees: None,
    }
}

/// `cutOffAngle` is a half angle in radians; the record holds the full cone
/// in degrees
pub fn spot_light(node: &SceneNode) -> LightSpec {
    let cut_off: f32 = node.field_or("cutOffAngle", DEFAULT_CUT_OFF);
    LightSpec {
        light_type: LightType::Spot,
        color: node.field_or("color", WHITE),
        intensity: node.field_or("intensity", 1.0),
        position: node.vec3_or_zero("location"),
        rotation: aim_rotation(direction(node)),
        range: node.field_or("radius", DEFAULT_RADIUS),
        spot_angle_degrees: Some(cut_off.to_degrees() * 2.0),
    }
}

fn emit<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
    light: LightSpec,
) -> Option<EntityHandle> {
    log::debug!("{:?} light, intensity {}", light.light_type, light.intensity);
    Some(pass.create_light(parent, &light, node))
}

pub fn handle_directional_light<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    emit(pass, node, parent, directional_light(node))
}

pub fn handle_point_light<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    emit(pass, node, parent, point_light(node))
}

pub fn handle_spot_light<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    emit(pass, node, parent, spot_light(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Rotation;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn test_aim_rotation_points_forward_axis() {
        let dir = Vector3::new(1.0, -1.0, 0.0);
        let q = aim_rotation(dir);
        assert!(close(q.rotate_vector(-Vector3::unit_z()), dir.normalize()));
        assert_eq!(aim_rotation(Vector3::new(0.0, 0.0, 0.0)), Quaternion::one());
    }

    #[test]
    fn test_directional_defaults() {
        let light = directional_light(&SceneNode::new("DirectionalLight"));
        assert_eq!(light.color, WHITE);
        assert_eq!(light.intensity, 1.0);
        assert_eq!(light.range, 0.0);
        assert!(close(
            light.rotation.rotate_vector(-Vector3::unit_z()),
            Vector3::new(0.0, -1.0, 0.0)
        ));
    }

    #[test]
    fn test_point_light_fields() {
        let node = SceneNode::new("PointLight")
            .with_attr("location", "0 5 0")
            .with_attr("radius", "25")
            .with_attr("color", "1 0 0");
        let light = point_light(&node);
        assert_eq!(light.light_type, LightType::Point);
        assert_eq!(light.position, Vector3::new(0.0, 5.0, 0.0));
        assert_eq!(light.range, 25.0);
        assert_eq!(light.color, [1.0, 0.0, 0.0]);
        assert_eq!(light.spot_angle_degrees, None);
    }

    #[test]
    fn test_spot_angle_is_full_cone_in_degrees() {
        let light = spot_light(&SceneNode::new("SpotLight"));
        assert!((light.spot_angle_degrees.unwrap() - 90.0).abs() < 1e-3);
        assert_eq!(light.range, DEFAULT_RADIUS);

        let narrow = spot_light(&SceneNode::new("SpotLight").with_attr("cutOffAngle", "0.2617994"));
        assert!((narrow.spot_angle_degrees.unwrap() - 30.0).abs() < 1e-3);
    }
}
