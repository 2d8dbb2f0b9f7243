use uom::si::{f32::Velocity, velocity::meter_per_second};

use super::{AccelerationBounds, ConstraintError, VelocityConstraint};
use crate::{pose::Pose, utils::Curvature};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaxVelocityConstraint {
    max_velocity: Velocity,
}

impl MaxVelocityConstraint {
    pub fn new(max_velocity: Velocity) -> Result<Self, ConstraintError> {
        let value = max_velocity.get::<meter_per_second>();
        if value >= 0.0 && value.is_finite() {
            Ok(Self { max_velocity })
        } else {
            log::warn!("rejected velocity cap {} m/s", value);
            Err(ConstraintError::InvalidArgument {
                name: "max_velocity",
                value,
            })
        }
    }
}

impl VelocityConstraint for MaxVelocityConstraint {
    fn max_velocity(&self, _pose: &Pose, _curvature: Curvature, _velocity: Velocity) -> Velocity {
        self.max_velocity
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

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use uom::si::{f32::Length, length::meter};

    use super::*;
    use crate::{orientation::Orientation, pose::Position, utils::curvature};

    #[test]
    fn test_invalid_cap() {
        let test_cases = vec![-0.5, f32::NAN, f32::INFINITY, f32::NEG_INFINITY];
        for value in test_cases {
            match MaxVelocityConstraint::new(Velocity::new::<meter_per_second>(value)) {
                Err(ConstraintError::InvalidArgument { name, .. }) => {
                    assert_eq!(name, "max_velocity")
                }
                other => panic!("{:?} accepted as {:?}", value, other),
            }
        }
        assert!(MaxVelocityConstraint::new(Velocity::new::<meter_per_second>(0.0)).is_ok());
    }

    proptest! {
        #[test]
        fn test_cap_ignores_state(
            x in -100.0f32..100.0,
            y in -100.0f32..100.0,
            theta in -180.0f32..180.0,
            k in -10.0f32..10.0,
            v in 0.0f32..10.0,
        ) {
            let constraint =
                MaxVelocityConstraint::new(Velocity::new::<meter_per_second>(2.0)).unwrap();
            let pose = Pose::new(
                Position::new(Length::new::<meter>(x), Length::new::<meter>(y)),
                Orientation::from_degrees(theta),
            );
            let velocity = Velocity::new::<meter_per_second>(v);
            prop_assert_eq!(
                constraint
                    .max_velocity(&pose, curvature(k), velocity)
                    .get::<meter_per_second>(),
                2.0
            );
            prop_assert_eq!(
                constraint.min_max_acceleration(&pose, curvature(k), velocity),
                AccelerationBounds::unbounded()
            );
        }
    }
}
