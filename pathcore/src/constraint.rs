//! Velocity and acceleration limits evaluated per trajectory sample.
//!
//! A generator asks every registered constraint for the highest velocity it
//! allows at a sample and for the acceleration range it allows at that
//! velocity, then applies the lowest cap and the intersection of the ranges.

pub mod centripetal;
pub mod max_velocity;
pub mod region;

use core::fmt;

use heapless::Vec;
use uom::si::{
    acceleration::meter_per_second_squared,
    f32::{Acceleration, Velocity},
    velocity::meter_per_second,
};

use crate::{pose::Pose, utils::Curvature};

pub trait VelocityConstraint {
    /// The highest velocity allowed at the given state, `+inf` when this
    /// constraint does not restrict it.
    fn max_velocity(&self, pose: &Pose, curvature: Curvature, velocity: Velocity) -> Velocity;

    /// The acceleration range allowed at the given state,
    /// [`AccelerationBounds::unbounded`] when this constraint does not
    /// restrict it.
    fn min_max_acceleration(
        &self,
        pose: &Pose,
        curvature: Curvature,
        velocity: Velocity,
    ) -> AccelerationBounds;
}

impl<T> VelocityConstraint for &T
where
    T: VelocityConstraint + ?Sized,
{
    fn max_velocity(&self, pose: &Pose, curvature: Curvature, velocity: Velocity) -> Velocity {
        (**self).max_velocity(pose, curvature, velocity)
    }

    fn min_max_acceleration(
        &self,
        pose: &Pose,
        curvature: Curvature,
        velocity: Velocity,
    ) -> AccelerationBounds {
        (**self).min_max_acceleration(pose, curvature, velocity)
    }
}

pub(crate) fn unconstrained_velocity() -> Velocity {
    Velocity::new::<meter_per_second>(f32::INFINITY)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccelerationBounds {
    pub min: Acceleration,
    pub max: Acceleration,
}

impl AccelerationBounds {
    pub fn new(min: Acceleration, max: Acceleration) -> Self {
        Self { min, max }
    }

    /// The widest representable range.
    pub fn unbounded() -> Self {
        Self {
            min: Acceleration::new::<meter_per_second_squared>(-f32::MAX),
            max: Acceleration::new::<meter_per_second_squared>(f32::MAX),
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min: if other.min > self.min {
                other.min
            } else {
                self.min
            },
            max: if other.max < self.max {
                other.max
            } else {
                self.max
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, acceleration: Acceleration) -> bool {
        self.min <= acceleration && acceleration <= self.max
    }
}

impl Default for AccelerationBounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstraintError {
    InvalidArgument { name: &'static str, value: f32 },
    CapacityExceeded { capacity: usize },
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintError::InvalidArgument { name, value } => {
                write!(f, "invalid argument `{}`: {}", name, value)
            }
            ConstraintError::CapacityExceeded { capacity } => {
                write!(f, "constraint set is full (capacity {})", capacity)
            }
        }
    }
}

/// An ordered, fixed-capacity list of constraints consulted together.
///
/// The set is filled once while configuring a trajectory and only read
/// afterwards, so it can be shared between worker threads.
pub struct ConstraintSet<'a, const N: usize> {
    constraints: Vec<&'a (dyn VelocityConstraint + Sync), N>,
}

impl<'a, const N: usize> Default for ConstraintSet<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> ConstraintSet<'a, N> {
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        constraint: &'a (dyn VelocityConstraint + Sync),
    ) -> Result<(), ConstraintError> {
        self.constraints.push(constraint).map_err(|_| {
            log::warn!("constraint set is full, capacity: {}", N);
            ConstraintError::CapacityExceeded { capacity: N }
        })?;
        log::debug!("registered constraint #{}", self.constraints.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a (dyn VelocityConstraint + Sync)> + '_ {
        self.constraints.iter().copied()
    }
}

impl<'a, const N: usize> VelocityConstraint for ConstraintSet<'a, N> {
    fn max_velocity(&self, pose: &Pose, curvature: Curvature, velocity: Velocity) -> Velocity {
        self.iter()
            .map(|constraint| constraint.max_velocity(pose, curvature, velocity))
            .fold(unconstrained_velocity(), |acc, v| if v < acc { v } else { acc })
    }

    fn min_max_acceleration(
        &self,
        pose: &Pose,
        curvature: Curvature,
        velocity: Velocity,
    ) -> AccelerationBounds {
        self.iter()
            .map(|constraint| constraint.min_max_acceleration(pose, curvature, velocity))
            .fold(AccelerationBounds::unbounded(), |acc, bounds| {
                acc.intersect(&bounds)
            })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{f32::Length, length::meter};

    use super::max_velocity::MaxVelocityConstraint;
    use super::*;
    use crate::{orientation::Orientation, pose::Position, utils::curvature};

    struct FixedAcceleration(f32, f32);

    impl VelocityConstraint for FixedAcceleration {
        fn max_velocity(&self, _: &Pose, _: Curvature, _: Velocity) -> Velocity {
            unconstrained_velocity()
        }

        fn min_max_acceleration(&self, _: &Pose, _: Curvature, _: Velocity) -> AccelerationBounds {
            AccelerationBounds::new(
                Acceleration::new::<meter_per_second_squared>(self.0),
                Acceleration::new::<meter_per_second_squared>(self.1),
            )
        }
    }

    fn pose() -> Pose {
        Pose::new(
            Position::new(Length::new::<meter>(1.0), Length::new::<meter>(2.0)),
            Orientation::identity(),
        )
    }

    fn mps(value: f32) -> Velocity {
        Velocity::new::<meter_per_second>(value)
    }

    fn mpss(value: f32) -> Acceleration {
        Acceleration::new::<meter_per_second_squared>(value)
    }

    #[test]
    fn test_empty_set_is_unconstrained() {
        let set = ConstraintSet::<4>::new();
        assert!(set.is_empty());
        let v = set.max_velocity(&pose(), curvature(0.0), mps(1.0));
        assert_eq!(v.get::<meter_per_second>(), f32::INFINITY);
        assert_eq!(
            set.min_max_acceleration(&pose(), curvature(0.0), mps(1.0)),
            AccelerationBounds::unbounded()
        );
    }

    #[test]
    fn test_set_takes_tightest_limits() {
        let slow = MaxVelocityConstraint::new(mps(1.5)).unwrap();
        let fast = MaxVelocityConstraint::new(mps(3.0)).unwrap();
        let narrow = FixedAcceleration(-1.0, 4.0);
        let wide = FixedAcceleration(-3.0, 2.0);

        let mut set = ConstraintSet::<4>::new();
        set.push(&fast).unwrap();
        set.push(&slow).unwrap();
        set.push(&narrow).unwrap();
        set.push(&wide).unwrap();
        assert_eq!(set.len(), 4);

        let v = set.max_velocity(&pose(), curvature(0.2), mps(2.0));
        assert_relative_eq!(v.get::<meter_per_second>(), 1.5);

        let bounds = set.min_max_acceleration(&pose(), curvature(0.2), mps(2.0));
        assert_relative_eq!(bounds.min.get::<meter_per_second_squared>(), -1.0);
        assert_relative_eq!(bounds.max.get::<meter_per_second_squared>(), 2.0);
        assert!(!bounds.is_empty());
    }

    #[test]
    fn test_set_capacity() {
        let cap = MaxVelocityConstraint::new(mps(1.0)).unwrap();
        let mut set = ConstraintSet::<1>::new();
        assert_eq!(set.push(&cap), Ok(()));
        assert_eq!(
            set.push(&cap),
            Err(ConstraintError::CapacityExceeded { capacity: 1 })
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_bounds() {
        let a = AccelerationBounds::new(mpss(-2.0), mpss(1.0));
        let b = AccelerationBounds::new(mpss(1.5), mpss(3.0));
        assert!(a.contains(mpss(0.0)));
        assert!(a.contains(mpss(1.0)));
        assert!(!a.contains(mpss(1.5)));
        assert!(a.intersect(&b).is_empty());
        assert_eq!(a.intersect(&AccelerationBounds::default()), a);
    }

    #[test]
    fn test_error_display() {
        let error = ConstraintError::InvalidArgument {
            name: "x_width",
            value: -1.0,
        };
        assert_eq!(error.to_string(), "invalid argument `x_width`: -1");
    }
}
