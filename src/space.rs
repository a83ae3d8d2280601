use nalgebra::Vector2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::states::{euclidean_distance, States, States1D, StatesPointMass};

/// Sampling, distance, and interpolation over a bounded configuration region.
///
/// Samplers own their random stream and are constructed from a seed so a
/// planning run can be replayed exactly.
pub trait StateSpace {
    type S: States;

    ///uniform sample over the configured bounding region
    fn sample(&mut self) -> Self::S;

    fn distance(&self, a: &Self::S, b: &Self::S) -> f64 {
        euclidean_distance(&a.get_vals(), &b.get_vals())
    }

    fn interpolate(&self, a: &Self::S, b: &Self::S, alpha: f64) -> Self::S {
        a.lincomb(b, alpha)
    }
}

//gen_range panics on an empty range, degenerate bounds collapse to lo
fn sample_range(rng: &mut SmallRng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo, hi)
    } else {
        lo
    }
}

pub struct IntervalSpace {
    lo: f64,
    hi: f64,
    rng: SmallRng,
}

impl IntervalSpace {
    pub fn new(lo: f64, hi: f64, seed: u64) -> Self {
        Self {
            lo,
            hi,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl StateSpace for IntervalSpace {
    type S = States1D;

    fn sample(&mut self) -> States1D {
        States1D(sample_range(&mut self.rng, self.lo, self.hi))
    }
}

///axis aligned box over planar position and velocity
pub struct PointMassSpace {
    position_lo: Vector2<f64>,
    position_hi: Vector2<f64>,
    velocity_lo: Vector2<f64>,
    velocity_hi: Vector2<f64>,
    rng: SmallRng,
}

impl PointMassSpace {
    pub fn new(
        position_lo: Vector2<f64>,
        position_hi: Vector2<f64>,
        velocity_lo: Vector2<f64>,
        velocity_hi: Vector2<f64>,
        seed: u64,
    ) -> Self {
        Self {
            position_lo,
            position_hi,
            velocity_lo,
            velocity_hi,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl StateSpace for PointMassSpace {
    type S = StatesPointMass;

    fn sample(&mut self) -> StatesPointMass {
        let position = Vector2::new(
            sample_range(&mut self.rng, self.position_lo.x, self.position_hi.x),
            sample_range(&mut self.rng, self.position_lo.y, self.position_hi.y),
        );
        let velocity = Vector2::new(
            sample_range(&mut self.rng, self.velocity_lo.x, self.velocity_hi.x),
            sample_range(&mut self.rng, self.velocity_lo.y, self.velocity_hi.y),
        );
        StatesPointMass::new(position, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::EPSILON;

    #[test]
    fn test_samples_stay_in_bounds() {
        let mut space = IntervalSpace::new(-2., 7., 42);
        for _ in 0..1000 {
            let s = space.sample();
            assert!(s.0 >= -2. && s.0 < 7.);
        }
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let mut a = IntervalSpace::new(0., 10., 5);
        let mut b = IntervalSpace::new(0., 10., 5);
        for _ in 0..100 {
            assert_eq!(a.sample().0, b.sample().0);
        }
    }

    #[test]
    fn test_degenerate_bounds_collapse() {
        let mut space = IntervalSpace::new(3., 3., 0);
        assert_eq!(space.sample().0, 3.);
    }

    #[test]
    fn test_distance_and_interpolate_defaults() {
        let space = IntervalSpace::new(0., 1., 0);
        let a = States1D(1.);
        let b = States1D(4.);
        assert!((space.distance(&a, &b) - 3.).abs() < EPSILON);
        assert!((space.interpolate(&a, &b, 0.5).0 - 2.5).abs() < EPSILON);
    }

    #[test]
    fn test_point_mass_sampling_in_bounds() {
        let mut space = PointMassSpace::new(
            Vector2::new(-1., -1.),
            Vector2::new(1., 1.),
            Vector2::new(0., 0.),
            Vector2::new(0., 0.),
            9,
        );
        for _ in 0..200 {
            let s = space.sample();
            assert!(s.position.x >= -1. && s.position.x < 1.);
            assert!(s.position.y >= -1. && s.position.y < 1.);
            assert_eq!(s.velocity.x, 0.);
            assert_eq!(s.velocity.y, 0.);
        }
    }
}
