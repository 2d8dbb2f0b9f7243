//! Constraints that only apply while the robot is inside a zone.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uom::si::{
    angle::radian,
    f32::{Angle, Length, Velocity},
    length::meter,
    ratio::ratio,
};

use super::{unconstrained_velocity, AccelerationBounds, ConstraintError, VelocityConstraint};
use crate::{
    orientation::Orientation,
    pose::{Pose, Position},
    utils::Curvature,
};

pub trait Region {
    fn contains(&self, position: &Position) -> bool;
}

impl<T> Region for &T
where
    T: Region + ?Sized,
{
    fn contains(&self, position: &Position) -> bool {
        (**self).contains(position)
    }
}

/// An ellipse that may be tilted with respect to the world frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipticalRegion {
    center: Position,
    x_width: Length,
    y_width: Length,
    orientation: Orientation,
    // rotates world offsets into the ellipse frame
    inverse: Orientation,
}

impl EllipticalRegion {
    /// `x_width` and `y_width` are the full axis lengths along the ellipse's
    /// own x and y axes, which are tilted by `orientation`.
    pub fn new(
        center: Position,
        x_width: Length,
        y_width: Length,
        orientation: Orientation,
    ) -> Result<Self, ConstraintError> {
        validate_width("x_width", x_width)?;
        validate_width("y_width", y_width)?;
        log::debug!(
            "elliptical region: center = ({}, {}) m, widths = ({}, {}) m, rotation = {} rad",
            center.x().get::<meter>(),
            center.y().get::<meter>(),
            x_width.get::<meter>(),
            y_width.get::<meter>(),
            orientation.radians()
        );
        Ok(Self {
            center,
            x_width,
            y_width,
            orientation,
            inverse: orientation.inverse(),
        })
    }

    pub fn from_parameters(
        parameters: &EllipticalRegionParameters,
    ) -> Result<Self, ConstraintError> {
        Self::new(
            Position::new(parameters.center_x, parameters.center_y),
            parameters.x_width,
            parameters.y_width,
            Orientation::new(parameters.rotation),
        )
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn x_width(&self) -> Length {
        self.x_width
    }

    pub fn y_width(&self) -> Length {
        self.y_width
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

fn validate_width(name: &'static str, width: Length) -> Result<(), ConstraintError> {
    let value = width.get::<meter>();
    // also rejects NaN
    if value > 0.0 {
        Ok(())
    } else {
        log::warn!("rejected region: `{}` must be positive, got {} m", name, value);
        Err(ConstraintError::InvalidArgument { name, value })
    }
}

impl Region for EllipticalRegion {
    fn contains(&self, position: &Position) -> bool {
        let local = (*position - self.center).rotate_by(&self.inverse);
        let lx = (local.x() / (self.x_width / 2.0)).get::<ratio>();
        let ly = (local.y() / (self.y_width / 2.0)).get::<ratio>();
        lx * lx + ly * ly <= 1.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct EllipticalRegionParameters {
    pub center_x: Length,
    pub center_y: Length,
    pub x_width: Length,
    pub y_width: Length,
    #[builder(default = Angle::new::<radian>(0.0))]
    #[serde(default)]
    pub rotation: Angle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectangularRegion {
    bottom_left: Position,
    top_right: Position,
}

impl RectangularRegion {
    pub fn new(bottom_left: Position, top_right: Position) -> Result<Self, ConstraintError> {
        if !ordered(bottom_left.x(), top_right.x()) {
            log::warn!("rejected region: inverted x range");
            return Err(ConstraintError::InvalidArgument {
                name: "top_right.x",
                value: top_right.x().get::<meter>(),
            });
        }
        if !ordered(bottom_left.y(), top_right.y()) {
            log::warn!("rejected region: inverted y range");
            return Err(ConstraintError::InvalidArgument {
                name: "top_right.y",
                value: top_right.y().get::<meter>(),
            });
        }
        Ok(Self {
            bottom_left,
            top_right,
        })
    }
}

// false for NaN corners
fn ordered(low: Length, high: Length) -> bool {
    low <= high
}

impl Region for RectangularRegion {
    fn contains(&self, position: &Position) -> bool {
        self.bottom_left.x() <= position.x()
            && position.x() <= self.top_right.x()
            && self.bottom_left.y() <= position.y()
            && position.y() <= self.top_right.y()
    }
}

/// Applies `inner` only while the pose lies inside `region`; elsewhere the
/// state is unconstrained.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionConstraint<R, C> {
    region: R,
    inner: C,
}

pub type EllipticalRegionConstraint<C> = RegionConstraint<EllipticalRegion, C>;

pub type RectangularRegionConstraint<C> = RegionConstraint<RectangularRegion, C>;

impl<R, C> RegionConstraint<R, C>
where
    R: Region,
    C: VelocityConstraint,
{
    pub fn new(region: R, inner: C) -> Self {
        Self { region, inner }
    }

    /// Boundary points count as inside.
    pub fn is_pose_in_region(&self, pose: &Pose) -> bool {
        self.region.contains(&pose.translation())
    }

    pub fn region(&self) -> &R {
        &self.region
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<R, C> VelocityConstraint for RegionConstraint<R, C>
where
    R: Region,
    C: VelocityConstraint,
{
    fn max_velocity(&self, pose: &Pose, curvature: Curvature, velocity: Velocity) -> Velocity {
        if self.is_pose_in_region(pose) {
            self.inner.max_velocity(pose, curvature, velocity)
        } else {
            unconstrained_velocity()
        }
    }

    fn min_max_acceleration(
        &self,
        pose: &Pose,
        curvature: Curvature,
        velocity: Velocity,
    ) -> AccelerationBounds {
        if self.is_pose_in_region(pose) {
            self.inner.min_max_acceleration(pose, curvature, velocity)
        } else {
            AccelerationBounds::unbounded()
        }
    }
}
