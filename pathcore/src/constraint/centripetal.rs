use uom::si::f32::{Acceleration, Velocity};

use super::{unconstrained_velocity, AccelerationBounds, VelocityConstraint};
use crate::{
    pose::Pose,
    utils::{velocity_from_squared, Curvature},
};

/// Limits the lateral acceleration `v^2 * |curvature|` in turns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CentripetalAccelerationConstraint {
    max_centripetal_acceleration: Acceleration,
}

impl CentripetalAccelerationConstraint {
    pub fn new(max_centripetal_acceleration: Acceleration) -> Self {
        Self {
            max_centripetal_acceleration,
        }
    }
}

impl VelocityConstraint for CentripetalAccelerationConstraint {
    fn max_velocity(&self, _pose: &Pose, curvature: Curvature, _velocity: Velocity) -> Velocity {
        let curvature = curvature.abs();
        if curvature.value == 0.0 {
            return unconstrained_velocity();
        }
        velocity_from_squared(self.max_centripetal_acceleration / curvature)
    }

    fn min_max_acceleration(
        &self,
        _pose: &Pose,
        _curvature: Curvature,
        _velocity: Velocity,
    ) -> AccelerationBounds {
        AccelerationBounds::unbounded()
    }
}
