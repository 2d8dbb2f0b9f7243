//! Planar rotations kept on the unit circle.

use core::f32::consts::PI;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

#[allow(unused_imports)]
use num_traits::Float;
use uom::si::{angle::radian, f32::Angle};

/// A rotation in the plane, stored as its canonical angle in `(-pi, pi]`
/// together with the cosine and sine of that angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    value: f32,
    cos: f32,
    sin: f32,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Orientation {
    pub const fn identity() -> Self {
        Self {
            value: 0.0,
            cos: 1.0,
            sin: 0.0,
        }
    }

    /// Any angle is accepted; it is wrapped into `(-pi, pi]`.
    pub fn new(angle: Angle) -> Self {
        Self::from_radians(angle.get::<radian>())
    }

    pub fn from_radians(value: f32) -> Self {
        let (sin, cos) = value.sin_cos();
        Self {
            value: canonical_angle(sin, cos),
            cos,
            sin,
        }
    }

    pub fn from_degrees(degrees: f32) -> Self {
        Self::from_radians(degrees * PI / 180.0)
    }

    /// Builds the orientation pointing along `(x, y)`.
    ///
    /// The vector does not have to be normalized. A zero vector has no
    /// direction and maps to the identity instead of NaN.
    pub fn from_components(x: f32, y: f32) -> Self {
        // scaled so that hypot neither overflows nor underflows
        let scale = x.abs().max(y.abs());
        if !(scale > 0.0 && scale.is_finite()) {
            return Self::identity();
        }
        let (x, y) = (x / scale, y / scale);
        let magnitude = x.hypot(y);
        if magnitude > 0.0 {
            let cos = x / magnitude;
            let sin = y / magnitude;
            Self {
                value: canonical_angle(sin, cos),
                cos,
                sin,
            }
        } else {
            Self::identity()
        }
    }

    /// Rotates `self` by `other` using the rotation matrix of `other`.
    ///
    /// ```text
    /// [cos_new]   [other.cos, -other.sin][cos]
    /// [sin_new] = [other.sin,  other.cos][sin]
    /// ```
    pub fn rotate_by(&self, other: &Orientation) -> Self {
        Self::from_components(
            self.cos * other.cos - self.sin * other.sin,
            self.cos * other.sin + self.sin * other.cos,
        )
    }

    pub fn inverse(&self) -> Self {
        Self {
            value: canonical_angle(-self.sin, self.cos),
            cos: self.cos,
            sin: -self.sin,
        }
    }

    pub fn radians(&self) -> f32 {
        self.value
    }

    pub fn degrees(&self) -> f32 {
        self.value * 180.0 / PI
    }

    pub fn angle(&self) -> Angle {
        Angle::new::<radian>(self.value)
    }

    pub fn cos(&self) -> f32 {
        self.cos
    }

    pub fn sin(&self) -> f32 {
        self.sin
    }

    /// `sin / cos`; signed infinity when the cosine is exactly zero.
    pub fn tan(&self) -> f32 {
        self.sin / self.cos
    }
}

// atan2 lands in [-pi, pi]; fold -pi onto pi.
fn canonical_angle(sin: f32, cos: f32) -> f32 {
    let value = sin.atan2(cos);
    if value <= -PI {
        PI
    } else {
        value
    }
}

impl Add for Orientation {
    type Output = Orientation;

    fn add(self, rhs: Self) -> Self::Output {
        self.rotate_by(&rhs)
    }
}

impl Sub for Orientation {
    type Output = Orientation;

    fn sub(self, rhs: Self) -> Self::Output {
        self.rotate_by(&rhs.inverse())
    }
}

impl Neg for Orientation {
    type Output = Orientation;

    fn neg(self) -> Self::Output {
        self.inverse()
    }
}

impl From<Angle> for Orientation {
    fn from(angle: Angle) -> Self {
        Self::new(angle)
    }
}

/// Running composition of orientations owned by a single caller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationAccumulator {
    current: Orientation,
}

impl OrientationAccumulator {
    pub fn new(initial: Orientation) -> Self {
        Self { current: initial }
    }

    pub fn get(&self) -> Orientation {
        self.current
    }

    pub fn into_inner(self) -> Orientation {
        self.current
    }
}

impl AddAssign<Orientation> for OrientationAccumulator {
    fn add_assign(&mut self, rhs: Orientation) {
        self.current = self.current + rhs;
    }
}

impl SubAssign<Orientation> for OrientationAccumulator {
    fn sub_assign(&mut self, rhs: Orientation) {
        self.current = self.current - rhs;
    }
}
