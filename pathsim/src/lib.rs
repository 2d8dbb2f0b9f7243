#![cfg_attr(not(test), no_std)]

pub mod path;

use core::fmt;

use heapless::Vec;
#[allow(unused_imports)]
use num_traits::Float;
use pathcore::{
    constraint::{AccelerationBounds, VelocityConstraint},
    pose::Pose,
    utils::{velocity_from_squared, Curvature},
};
use typed_builder::TypedBuilder;
use uom::si::{
    acceleration::meter_per_second_squared,
    f32::{Acceleration, Length, Time, Velocity},
    length::meter,
    time::second,
    velocity::meter_per_second,
};

use crate::path::PathSample;

const EPSILON: f32 = 1e-6;
// relative to the compared acceleration; f32 rounding of v^2 differences
// over centimeter steps is around 1e-4
const ACCELERATION_TOLERANCE: f32 = 1e-3;

#[derive(Clone, Debug, TypedBuilder)]
pub struct TrajectoryConfig {
    max_velocity: Velocity,
    max_acceleration: Acceleration,
    #[builder(default)]
    start_velocity: Velocity,
    #[builder(default)]
    end_velocity: Velocity,
}

impl TrajectoryConfig {
    fn acceleration_bounds(&self) -> AccelerationBounds {
        AccelerationBounds::new(-self.max_acceleration, self.max_acceleration)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryState {
    pub time: Time,
    pub pose: Pose,
    pub curvature: Curvature,
    pub distance: Length,
    pub velocity: Velocity,
    pub acceleration: Acceleration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterizeError {
    TooManySamples { capacity: usize },
    InfeasibleAcceleration { index: usize },
    Stalled { index: usize },
}

impl fmt::Display for ParameterizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterizeError::TooManySamples { capacity } => {
                write!(f, "more samples than the capacity {}", capacity)
            }
            ParameterizeError::InfeasibleAcceleration { index } => {
                write!(f, "no feasible acceleration at sample {}", index)
            }
            ParameterizeError::Stalled { index } => {
                write!(f, "the robot cannot move at sample {}", index)
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ConstrainedState {
    pose: Pose,
    curvature: Curvature,
    distance: Length,
    max_velocity: Velocity,
    bounds: AccelerationBounds,
}

/// Assigns a velocity and a timestamp to every sample of a path.
///
/// The forward pass limits each sample to what is reachable from the previous
/// one with the allowed acceleration and to what `constraint` allows there;
/// the backward pass does the same for deceleration towards the end.
pub fn parameterize<C, const N: usize>(
    samples: &[PathSample],
    config: &TrajectoryConfig,
    constraint: &C,
) -> Result<Vec<TrajectoryState, N>, ParameterizeError>
where
    C: VelocityConstraint + ?Sized,
{
    if samples.len() > N {
        log::warn!("{} samples exceed the capacity {}", samples.len(), N);
        return Err(ParameterizeError::TooManySamples { capacity: N });
    }
    let first = match samples.first() {
        Some(first) => first,
        None => return Ok(Vec::new()),
    };

    let default_bounds = config.acceleration_bounds();

    let mut states: Vec<ConstrainedState, N> = Vec::new();
    let mut predecessor = ConstrainedState {
        pose: first.pose,
        curvature: first.curvature,
        distance: Default::default(),
        max_velocity: config.start_velocity,
        bounds: default_bounds,
    };

    for (index, sample) in samples.iter().enumerate() {
        let ds = predecessor
            .pose
            .translation()
            .distance(&sample.pose.translation());
        let mut state = ConstrainedState {
            pose: sample.pose,
            curvature: sample.curvature,
            distance: predecessor.distance + ds,
            max_velocity: Default::default(),
            bounds: default_bounds,
        };

        loop {
            let reachable =
                reachable_velocity(predecessor.max_velocity, predecessor.bounds.max, ds);
            state.max_velocity = min_velocity(config.max_velocity, reachable);
            state.bounds = default_bounds;
            state.max_velocity = min_velocity(
                state.max_velocity,
                constraint.max_velocity(&state.pose, state.curvature, state.max_velocity),
            );
            enforce_acceleration_limits(constraint, &mut state, index)?;

            if ds.get::<meter>() < EPSILON {
                break;
            }

            let actual: Acceleration = (state.max_velocity * state.max_velocity
                - predecessor.max_velocity * predecessor.max_velocity)
                / (2.0 * ds);
            let tolerance = acceleration_tolerance(actual);
            if state.bounds.max < actual - tolerance {
                // the predecessor accelerated harder than this sample allows
                if state.bounds.max >= predecessor.bounds.max {
                    break;
                }
                predecessor.bounds.max = state.bounds.max;
            } else {
                if actual > predecessor.bounds.min + tolerance {
                    predecessor.bounds.max = actual;
                }
                break;
            }
        }

        states
            .push(state)
            .map_err(|_| ParameterizeError::TooManySamples { capacity: N })?;
        predecessor = state;
    }

    let last = states[states.len() - 1];
    let mut successor = ConstrainedState {
        max_velocity: config.end_velocity,
        bounds: default_bounds,
        ..last
    };

    for index in (0..states.len()).rev() {
        let state = &mut states[index];
        let ds = state.distance - successor.distance;

        loop {
            let reachable = reachable_velocity(successor.max_velocity, successor.bounds.min, ds);
            if reachable >= state.max_velocity {
                break;
            }
            state.max_velocity = reachable;
            enforce_acceleration_limits(constraint, state, index)?;

            if ds.get::<meter>().abs() < EPSILON {
                break;
            }

            let actual: Acceleration = (state.max_velocity * state.max_velocity
                - successor.max_velocity * successor.max_velocity)
                / (2.0 * ds);
            if state.bounds.min > actual + acceleration_tolerance(actual) {
                if state.bounds.min <= successor.bounds.min {
                    break;
                }
                successor.bounds.min = state.bounds.min;
            } else {
                successor.bounds.min = actual;
                break;
            }
        }

        successor = *state;
    }

    let trajectory = integrate(&states)?;
    log::debug!(
        "parameterized {} samples over {} m in {} s",
        trajectory.len(),
        last.distance.get::<meter>(),
        trajectory[trajectory.len() - 1].time.get::<second>()
    );
    Ok(trajectory)
}

fn integrate<const N: usize>(
    states: &[ConstrainedState],
) -> Result<Vec<TrajectoryState, N>, ParameterizeError> {
    let accel_eps = Acceleration::new::<meter_per_second_squared>(EPSILON);
    let velocity_eps = Velocity::new::<meter_per_second>(EPSILON);

    let mut trajectory: Vec<TrajectoryState, N> = Vec::new();
    let mut time = Time::default();
    let mut distance = Length::default();
    let mut velocity = Velocity::default();

    for (index, state) in states.iter().enumerate() {
        let ds = state.distance - distance;
        let mut dt = Time::default();

        if index > 0 {
            let acceleration: Acceleration = if ds.get::<meter>() > 0.0 {
                (state.max_velocity * state.max_velocity - velocity * velocity) / (2.0 * ds)
            } else {
                Default::default()
            };
            if let Some(previous) = trajectory.last_mut() {
                previous.acceleration = acceleration;
            }

            dt = if acceleration.abs() > accel_eps {
                (state.max_velocity - velocity) / acceleration
            } else if velocity.abs() > velocity_eps {
                ds / velocity
            } else if ds.get::<meter>() < EPSILON {
                Default::default()
            } else {
                log::warn!("zero velocity and acceleration at sample {}", index);
                return Err(ParameterizeError::Stalled { index });
            };
        }

        velocity = state.max_velocity;
        distance = state.distance;
        time += dt;

        trajectory
            .push(TrajectoryState {
                time,
                pose: state.pose,
                curvature: state.curvature,
                distance,
                velocity,
                acceleration: Default::default(),
            })
            .map_err(|_| ParameterizeError::TooManySamples { capacity: N })?;
    }

    Ok(trajectory)
}

fn enforce_acceleration_limits<C>(
    constraint: &C,
    state: &mut ConstrainedState,
    index: usize,
) -> Result<(), ParameterizeError>
where
    C: VelocityConstraint + ?Sized,
{
    let bounds = constraint.min_max_acceleration(&state.pose, state.curvature, state.max_velocity);
    state.bounds = state.bounds.intersect(&bounds);
    if state.bounds.is_empty() {
        log::warn!(
            "empty acceleration range at sample {}: [{}, {}] m/s^2",
            index,
            state.bounds.min.get::<meter_per_second_squared>(),
            state.bounds.max.get::<meter_per_second_squared>()
        );
        Err(ParameterizeError::InfeasibleAcceleration { index })
    } else {
        Ok(())
    }
}

fn acceleration_tolerance(acceleration: Acceleration) -> Acceleration {
    let scale = acceleration.get::<meter_per_second_squared>().abs().max(1.0);
    Acceleration::new::<meter_per_second_squared>(ACCELERATION_TOLERANCE * scale)
}

fn reachable_velocity(velocity: Velocity, acceleration: Acceleration, ds: Length) -> Velocity {
    let squared = velocity * velocity + 2.0 * acceleration * ds;
    if squared.value > 0.0 {
        velocity_from_squared(squared)
    } else {
        Default::default()
    }
}

fn min_velocity(a: Velocity, b: Velocity) -> Velocity {
    if b < a {
        b
    } else {
        a
    }
}
