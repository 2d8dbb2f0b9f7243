#[allow(unused_imports)]
use num_traits::Float;
use pathcore::{
    orientation::Orientation,
    pose::{Pose, Position},
    utils::Curvature,
};
use uom::si::{f32::Length, length::meter};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSample {
    pub pose: Pose,
    pub curvature: Curvature,
}

/// Samples a line (zero curvature) or a circular arc every `step` along its
/// length, both ends included.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantCurvaturePath {
    start: Pose,
    length: Length,
    curvature: Curvature,
    step: Length,
    count: usize,
    index: usize,
}

impl ConstantCurvaturePath {
    pub fn new(start: Pose, length: Length, curvature: Curvature, step: Length) -> Self {
        let ratio = (length / step).value;
        let count = if ratio.is_finite() && ratio > 0.0 {
            ratio.ceil() as usize
        } else {
            0
        };
        Self {
            start,
            length,
            curvature,
            step,
            count,
            index: 0,
        }
    }

    pub fn end_pose(&self) -> Pose {
        self.pose_at(self.length)
    }

    fn pose_at(&self, s: Length) -> Pose {
        let theta0 = self.start.rotation();
        let k = self.curvature.value;
        let s = s.get::<meter>();
        let (dx, dy) = if k.abs() < 1e-6 {
            (s * theta0.cos(), s * theta0.sin())
        } else {
            let theta = theta0.radians() + k * s;
            (
                (theta.sin() - theta0.sin()) / k,
                (theta0.cos() - theta.cos()) / k,
            )
        };
        let offset = Position::new(Length::new::<meter>(dx), Length::new::<meter>(dy));
        Pose::new(
            self.start.translation() + offset,
            theta0 + Orientation::from_radians(k * s),
        )
    }
}

impl Iterator for ConstantCurvaturePath {
    type Item = PathSample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index > self.count {
            return None;
        }
        let s = if self.index == self.count {
            self.length
        } else {
            self.step * self.index as f32
        };
        self.index += 1;
        Some(PathSample {
            pose: self.pose_at(s),
            curvature: self.curvature,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use core::f32::consts::PI;

    use super::*;
    use pathcore::utils::curvature as curvature_from;

    fn start() -> Pose {
        Pose::new(
            Position::new(Length::new::<meter>(1.0), Length::new::<meter>(0.0)),
            Orientation::identity(),
        )
    }

    #[test]
    fn test_straight_samples() {
        let path = ConstantCurvaturePath::new(
            start(),
            Length::new::<meter>(1.0),
            curvature_from(0.0),
            Length::new::<meter>(0.3),
        );
        let xs = path
            .map(|sample| sample.pose.translation().x().get::<meter>())
            .fold((0usize, 0.0f32), |(n, _), x| (n + 1, x));
        assert_eq!(xs.0, 5);
        assert_relative_eq!(xs.1, 2.0);
    }

    #[test]
    fn test_quarter_arc() {
        let path = ConstantCurvaturePath::new(
            start(),
            Length::new::<meter>(PI),
            curvature_from(0.5),
            Length::new::<meter>(0.1),
        );
        let end = path.end_pose();
        assert_relative_eq!(end.translation().x().get::<meter>(), 3.0, epsilon = 1e-4);
        assert_relative_eq!(end.translation().y().get::<meter>(), 2.0, epsilon = 1e-4);
        assert_relative_eq!(end.rotation().degrees(), 90.0, epsilon = 1e-3);
    }
}
