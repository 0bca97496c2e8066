//! # Animation Inventory
//!
//! Typed records for the animation nodes of a document: time sensors,
//! interpolators and routes. The builder collects them so a host can wire
//! them into its own update loop; nothing here runs on its own.
//!
//! Interpolators can be evaluated with [`Interpolator::sample`], which
//! clamps outside the key range and blends linearly inside it (spherical
//! linear for orientations).

use cgmath::{Quaternion, Vector3, VectorSpace};

use crate::document::{Rgb, SceneNode};

/// Decoded `TimeSensor`
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSensor {
    pub name: Option<String>,
    /// Seconds per cycle
    pub cycle_interval: f64,
    pub looping: bool,
    pub enabled: bool,
    pub start_time: f64,
    pub stop_time: f64,
}

impl TimeSensor {
    pub fn from_node(node: &SceneNode) -> Self {
        Self {
            name: node.def_name().map(str::to_string),
            cycle_interval: node.field_or("cycleInterval", 1.0),
            looping: node.field_or("loop", false),
            enabled: node.field_or("enabled", true),
            start_time: node.field_or("startTime", 0.0),
            stop_time: node.field_or("stopTime", 0.0),
        }
    }

    /// Fraction of the current cycle at `time` seconds, `None` when inactive
    pub fn fraction_at(&self, time: f64) -> Option<f64> {
        if !self.enabled || self.cycle_interval <= 0.0 || time < self.start_time {
            return None;
        }
        let elapsed = (time - self.start_time) / self.cycle_interval;
        if self.looping {
            Some(elapsed.fract())
        } else if elapsed >= 1.0 {
            Some(1.0)
        } else {
            Some(elapsed)
        }
    }
}

/// Key values of an interpolator, by kind
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValues {
    Position(Vec<Vector3<f32>>),
    Orientation(Vec<Quaternion<f32>>),
    Color(Vec<Rgb>),
    Scalar(Vec<f32>),
}

impl KeyValues {
    pub fn len(&self) -> usize {
        match self {
            KeyValues::Position(v) => v.len(),
            KeyValues::Orientation(v) => v.len(),
            KeyValues::Color(v) => v.len(),
            KeyValues::Scalar(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single interpolated output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatedValue {
    Position(Vector3<f32>),
    Orientation(Quaternion<f32>),
    Color(Rgb),
    Scalar(f32),
}

/// Decoded `PositionInterpolator`, `OrientationInterpolator`,
/// `ColorInterpolator` or `ScalarInterpolator`
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator {
    pub name: Option<String>,
    pub key: Vec<f32>,
    pub values: KeyValues,
}

impl Interpolator {
    /// Returns `None` for tags that are not interpolators
    pub fn from_node(node: &SceneNode) -> Option<Self> {
        let values = match node.name() {
            "PositionInterpolator" => KeyValues::Position(node.field_or("keyValue", Vec::new())),
            "OrientationInterpolator" => {
                KeyValues::Orientation(node.field_or("keyValue", Vec::new()))
            }
            "ColorInterpolator" => KeyValues::Color(node.field_or("keyValue", Vec::new())),
            "ScalarInterpolator" => KeyValues::Scalar(node.field_or("keyValue", Vec::new())),
            _ => return None,
        };
        let key: Vec<f32> = node.field_or("key", Vec::new());
        if key.len() != values.len() {
            log::debug!(
                "<{}> has {} keys and {} key values",
                node.name(),
                key.len(),
                values.len()
            );
        }
        Some(Self {
            name: node.def_name().map(str::to_string),
            key,
            values,
        })
    }

    /// Evaluates the interpolator at `fraction`
    ///
    /// Only the first `min(key, keyValue)` pairs are used. `None` when there
    /// are none.
    pub fn sample(&self, fraction: f32) -> Option<AnimatedValue> {
        let n = self.key.len().min(self.values.len());
        if n == 0 {
            return None;
        }
        let (i, t) = segment(&self.key[..n], fraction);
        let j = (i + 1).min(n - 1);

        Some(match &self.values {
            KeyValues::Position(v) => AnimatedValue::Position(v[i].lerp(v[j], t)),
            KeyValues::Orientation(v) => AnimatedValue::Orientation(if i == j {
                v[i]
            } else {
                v[i].slerp(v[j], t)
            }),
            KeyValues::Color(v) => {
                let (a, b) = (v[i], v[j]);
                AnimatedValue::Color([
                    a[0] + (b[0] - a[0]) * t,
                    a[1] + (b[1] - a[1]) * t,
                    a[2] + (b[2] - a[2]) * t,
                ])
            }
            KeyValues::Scalar(v) => AnimatedValue::Scalar(v[i] + (v[j] - v[i]) * t),
        })
    }
}

/// Index of the key segment containing `fraction` and the blend inside it
fn segment(key: &[f32], fraction: f32) -> (usize, f32) {
    let last = key.len() - 1;
    if fraction <= key[0] {
        return (0, 0.0);
    }
    if fraction >= key[last] {
        return (last, 0.0);
    }
    let i = key
        .windows(2)
        .position(|w| fraction >= w[0] && fraction < w[1])
        .unwrap_or(last);
    let span = key[(i + 1).min(last)] - key[i];
    let t = if span > 0.0 { (fraction - key[i]) / span } else { 1.0 };
    (i, t)
}

/// A `ROUTE` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub from_node: String,
    pub from_field: String,
    pub to_node: String,
    pub to_field: String,
}

impl Route {
    /// `None` unless both `fromNode` and `toNode` are present
    pub fn from_node(node: &SceneNode) -> Option<Self> {
        let from_node = node.attr("fromNode").filter(|s| !s.is_empty())?;
        let to_node = node.attr("toNode").filter(|s| !s.is_empty())?;
        Some(Self {
            from_node: from_node.to_string(),
            from_field: node.attr("fromField").unwrap_or_default().to_string(),
            to_node: to_node.to_string(),
            to_field: node.attr("toField").unwrap_or_default().to_string(),
        })
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.from_node, self.from_field, self.to_node, self.to_field
        )
    }
}

/// Everything animation-related found during a build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationInventory {
    pub time_sensors: Vec<TimeSensor>,
    pub interpolators: Vec<Interpolator>,
}

impl AnimationInventory {
    pub fn is_empty(&self) -> bool {
        self.time_sensors.is_empty() && self.interpolators.is_empty()
    }

    pub fn interpolator(&self, name: &str) -> Option<&Interpolator> {
        self.interpolators
            .iter()
            .find(|i| i.name.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Rotation3, Rad};

    #[test]
    fn test_position_interpolation_and_clamping() {
        let node = SceneNode::new("PositionInterpolator")
            .with_attr("DEF", "Mover")
            .with_attr("key", "0 0.5 1")
            .with_attr("keyValue", "0 0 0, 2 0 0, 2 4 0");
        let interp = Interpolator::from_node(&node).unwrap();

        assert_eq!(interp.name.as_deref(), Some("Mover"));
        assert_eq!(
            interp.sample(0.25),
            Some(AnimatedValue::Position(Vector3::new(1.0, 0.0, 0.0)))
        );
        assert_eq!(
            interp.sample(0.75),
            Some(AnimatedValue::Position(Vector3::new(2.0, 2.0, 0.0)))
        );
        assert_eq!(
            interp.sample(-1.0),
            Some(AnimatedValue::Position(Vector3::new(0.0, 0.0, 0.0)))
        );
        assert_eq!(
            interp.sample(7.0),
            Some(AnimatedValue::Position(Vector3::new(2.0, 4.0, 0.0)))
        );
    }

    #[test]
    fn test_orientation_slerp_midpoint() {
        let node = SceneNode::new("OrientationInterpolator")
            .with_attr("key", "0 1")
            .with_attr("keyValue", "0 1 0 0, 0 1 0 1.5707963");
        let interp = Interpolator::from_node(&node).unwrap();

        let Some(AnimatedValue::Orientation(q)) = interp.sample(0.5) else {
            panic!("expected an orientation");
        };
        let expected = Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_4));
        assert!((q.s - expected.s).abs() < 1e-4);
        assert!((q.v - expected.v).magnitude() < 1e-4);
    }

    #[test]
    fn test_scalar_and_color() {
        let scalar = Interpolator::from_node(
            &SceneNode::new("ScalarInterpolator")
                .with_attr("key", "0 1")
                .with_attr("keyValue", "10 20"),
        )
        .unwrap();
        assert_eq!(scalar.sample(0.5), Some(AnimatedValue::Scalar(15.0)));

        let color = Interpolator::from_node(
            &SceneNode::new("ColorInterpolator")
                .with_attr("key", "0 1")
                .with_attr("keyValue", "1 0 0 0 0 1"),
        )
        .unwrap();
        assert_eq!(color.sample(0.5), Some(AnimatedValue::Color([0.5, 0.0, 0.5])));
    }

    #[test]
    fn test_empty_and_unknown() {
        let empty = Interpolator::from_node(&SceneNode::new("ScalarInterpolator")).unwrap();
        assert_eq!(empty.sample(0.5), None);
        assert!(Interpolator::from_node(&SceneNode::new("TimeSensor")).is_none());
    }

    #[test]
    fn test_time_sensor_fraction() {
        let sensor = TimeSensor::from_node(
            &SceneNode::new("TimeSensor")
                .with_attr("cycleInterval", "4")
                .with_attr("loop", "true"),
        );
        assert_eq!(sensor.fraction_at(1.0), Some(0.25));
        assert_eq!(sensor.fraction_at(5.0), Some(0.25));

        let once = TimeSensor::from_node(&SceneNode::new("TimeSensor"));
        assert_eq!(once.fraction_at(3.0), Some(1.0));
        assert_eq!(once.cycle_interval, 1.0);
    }

    #[test]
    fn test_route_requires_both_ends() {
        let route = Route::from_node(
            &SceneNode::new("ROUTE")
                .with_attr("fromNode", "Clock")
                .with_attr("fromField", "fraction_changed")
                .with_attr("toNode", "Mover")
                .with_attr("toField", "set_fraction"),
        )
        .unwrap();
        assert_eq!(route.to_string(), "Clock.fraction_changed -> Mover.set_fraction");

        assert!(Route::from_node(&SceneNode::new("ROUTE").with_attr("fromNode", "Clock")).is_none());
    }
}
