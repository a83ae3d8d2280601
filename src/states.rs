use std::fmt::Debug;

use nalgebra::Vector2;

/// Tolerance for approximate state equality.
pub const EPSILON: f64 = 1e-8;

pub trait States: Clone + Sized + Debug {
    fn get_num_dims(&self) -> i32;

    ///finite dimensional vector representation, used for spatial queries
    fn get_vals(&self) -> Vec<f64>;

    ///linear blend (1-alpha)*self + alpha*other
    fn lincomb(&self, other: &Self, alpha: f64) -> Self;

    fn approx_eq(&self, other: &Self) -> bool {
        euclidean_distance(&self.get_vals(), &other.get_vals()) <= EPSILON
    }
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[derive(Clone, Copy, Debug)]
pub struct States1D(pub f64);

impl States for States1D {
    fn get_num_dims(&self) -> i32 {
        1
    }
    fn get_vals(&self) -> Vec<f64> {
        vec![self.0]
    }
    fn lincomb(&self, other: &Self, alpha: f64) -> Self {
        States1D(self.0 * (1. - alpha) + other.0 * alpha)
    }
}

///planar point mass carrying position and velocity
#[derive(Clone, Copy, Debug)]
pub struct StatesPointMass {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
}

impl StatesPointMass {
    pub fn new(position: Vector2<f64>, velocity: Vector2<f64>) -> Self {
        Self { position, velocity }
    }

    pub fn at_rest(position: Vector2<f64>) -> Self {
        Self {
            position,
            velocity: Vector2::new(0., 0.),
        }
    }
}

impl States for StatesPointMass {
    fn get_num_dims(&self) -> i32 {
        4
    }
    fn get_vals(&self) -> Vec<f64> {
        vec![
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
        ]
    }
    fn lincomb(&self, other: &Self, alpha: f64) -> Self {
        StatesPointMass {
            position: self.position * (1. - alpha) + other.position * alpha,
            velocity: self.velocity * (1. - alpha) + other.velocity * alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lincomb_midpoint() {
        let a = States1D(0.);
        let b = States1D(10.);
        let mid = a.lincomb(&b, 0.5);
        assert!((mid.0 - 5.).abs() < EPSILON);
    }

    #[test]
    fn test_lincomb_endpoints_exact() {
        let a = States1D(1.25);
        let b = States1D(-3.5);
        assert_eq!(a.lincomb(&b, 0.).0, 1.25);
        assert_eq!(a.lincomb(&b, 1.).0, -3.5);
    }

    #[test]
    fn test_approx_eq_tolerance() {
        let a = States1D(1.);
        assert!(a.approx_eq(&States1D(1. + 1e-9)));
        assert!(!a.approx_eq(&States1D(1. + 1e-6)));
    }

    #[test]
    fn test_point_mass_vals() {
        let s = StatesPointMass::new(Vector2::new(1., 2.), Vector2::new(3., 4.));
        assert_eq!(s.get_num_dims(), 4);
        assert_eq!(s.get_vals(), vec![1., 2., 3., 4.]);
    }

    #[test]
    fn test_point_mass_lincomb() {
        let a = StatesPointMass::at_rest(Vector2::new(0., 0.));
        let b = StatesPointMass::new(Vector2::new(4., 8.), Vector2::new(2., 0.));
        let c = a.lincomb(&b, 0.25);
        assert!((c.position.x - 1.).abs() < EPSILON);
        assert!((c.position.y - 2.).abs() < EPSILON);
        assert!((c.velocity.x - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_euclidean_distance() {
        let d = euclidean_distance(&[0., 0.], &[3., 4.]);
        assert!((d - 5.).abs() < EPSILON);
    }
}
