//! Animation nodes are inventoried, never wired

use crate::animation::{Interpolator, TimeSensor};
use crate::builder::BuildPass;
use crate::document::SceneNode;
use crate::world::EntityHandle;

pub fn handle_time_sensor<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    _parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    let sensor = TimeSensor::from_node(node);
    log::debug!(
        "TimeSensor {:?}: {}s, loop {}",
        sensor.name,
        sensor.cycle_interval,
        sensor.looping
    );
    pass.report_mut().animation.time_sensors.push(sensor);
    None
}

pub fn handle_interpolator<'a, 't>(
    pass: &mut BuildPass<'a, 't>,
    node: &'t SceneNode,
    _parent: Option<EntityHandle>,
) -> Option<EntityHandle> {
    match Interpolator::from_node(node) {
        Some(interpolator) => {
            if interpolator.key.is_empty() {
                pass.note(node, "interpolator has no keys");
            }
            pass.report_mut().animation.interpolators.push(interpolator);
        }
        None => pass.warn(node, "not an interpolator"),
    }
    None
}
