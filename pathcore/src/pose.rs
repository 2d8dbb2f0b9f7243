use core::ops::{Add, Neg, Sub};

#[allow(unused_imports)]
use num_traits::Float;
use uom::si::{f32::Length, length::meter};

use crate::orientation::Orientation;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    x: Length,
    y: Length,
}

impl Position {
    pub fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> Length {
        self.x
    }

    pub fn y(&self) -> Length {
        self.y
    }

    pub fn rotate_by(&self, orientation: &Orientation) -> Self {
        let cos_th = orientation.cos();
        let sin_th = orientation.sin();
        Self {
            x: self.x * cos_th - self.y * sin_th,
            y: self.x * sin_th + self.y * cos_th,
        }
    }

    pub fn norm(&self) -> Length {
        Length::new::<meter>(self.x.get::<meter>().hypot(self.y.get::<meter>()))
    }

    pub fn distance(&self, other: &Position) -> Length {
        (*other - *self).norm()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Neg for Position {
    type Output = Position;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    position: Position,
    orientation: Orientation,
}

impl Pose {
    pub fn new(position: Position, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn translation(&self) -> Position {
        self.position
    }

    pub fn rotation(&self) -> Orientation {
        self.orientation
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn position(x: f32, y: f32) -> Position {
        Position::new(Length::new::<meter>(x), Length::new::<meter>(y))
    }

    #[test]
    fn test_rotate_by() {
        let test_cases = vec![
            ((1.0, 0.0), 90.0, (0.0, 1.0)),
            ((1.0, 1.0), 90.0, (-1.0, 1.0)),
            ((2.0, 0.0), 180.0, (-2.0, 0.0)),
            ((0.0, 3.0), -90.0, (3.0, 0.0)),
        ];

        for ((x, y), degrees, (ex, ey)) in test_cases {
            let rotated = position(x, y).rotate_by(&Orientation::from_degrees(degrees));
            assert_relative_eq!(rotated.x().get::<meter>(), ex, epsilon = 1e-5);
            assert_relative_eq!(rotated.y().get::<meter>(), ey, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_arithmetic() {
        let a = position(1.0, 2.0);
        let b = position(4.0, 6.0);
        assert_eq!(a + b, position(5.0, 8.0));
        assert_eq!(b - a, position(3.0, 4.0));
        assert_eq!(-a, position(-1.0, -2.0));
        assert_relative_eq!(a.distance(&b).get::<meter>(), 5.0);
    }

    #[test]
    fn test_pose_accessors() {
        let pose = Pose::new(position(1.0, 2.0), Orientation::from_degrees(30.0));
        assert_eq!(pose.translation(), position(1.0, 2.0));
        assert_relative_eq!(pose.rotation().degrees(), 30.0, epsilon = 1e-4);
        assert_eq!(Pose::default().rotation(), Orientation::identity());
    }
}
