use core::marker::PhantomData;

#[allow(unused_imports)]
use num_traits::Float;
use typenum::consts::*;
use uom::si::{f32::Velocity, velocity::meter_per_second, Quantity, ISQ, SI};
use uom::Kind;

/// Path curvature in reciprocal meters.
pub type Curvature = Quantity<ISQ<N1, Z0, Z0, Z0, Z0, Z0, Z0, dyn Kind>, SI<f32>, f32>;

pub fn curvature(value: f32) -> Curvature {
    Curvature {
        value,
        dimension: PhantomData,
        units: PhantomData,
    }
}

pub type SquaredVelocity = Quantity<ISQ<P2, Z0, N2, Z0, Z0, Z0, Z0, dyn Kind>, SI<f32>, f32>;

/// Speed whose square is `squared`; NaN for negative input like `f32::sqrt`.
pub fn velocity_from_squared(squared: SquaredVelocity) -> Velocity {
    Velocity::new::<meter_per_second>(squared.value.sqrt())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{
        acceleration::meter_per_second_squared,
        f32::{Acceleration, Length},
        length::meter,
    };

    use super::*;

    #[test]
    fn test_velocity_from_distance() {
        let a = Acceleration::new::<meter_per_second_squared>(2.0);
        let d = Length::new::<meter>(8.0);
        let v = velocity_from_squared(a * d);
        assert_relative_eq!(v.get::<meter_per_second>(), 4.0);

        let v = Velocity::new::<meter_per_second>(3.0);
        assert_relative_eq!(velocity_from_squared(v * v).get::<meter_per_second>(), 3.0);
    }

    #[test]
    fn test_curvature_over_acceleration() {
        let k = curvature(0.5);
        let a = Acceleration::new::<meter_per_second_squared>(2.0);
        let v = velocity_from_squared(a / k);
        assert_relative_eq!(v.get::<meter_per_second>(), 2.0);
    }
}
