use std::path::Path;

use anyhow::{bail, Context, Result};
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;

/// Worst-case deviation between tracker and planner states, one entry per
/// planner state dimension.
#[derive(Clone, Debug, Deserialize)]
pub struct TrackingBound {
    pub bound: Vec<f64>,
}

///speed envelope the planner may assume of itself
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerDynamics {
    pub max_speed: Vec<f64>,
}

/// Precomputed reachability solution, treated as an oracle: it supplies
/// the instantaneous optimal tracking control and the tracking error
/// bound that the planning graph is padded by.
pub trait ValueFunction {
    fn optimal_control(&self, tracker: &[f64], planner: &[f64]) -> Vec<f64>;
    fn tracking_bound(&self) -> &TrackingBound;
    fn planner_dynamics(&self) -> &PlannerDynamics;
}

#[derive(Debug, Deserialize)]
struct ValueFunctionData {
    gains: Vec<Vec<f64>>,
    control_lo: Vec<f64>,
    control_hi: Vec<f64>,
    bound: Vec<f64>,
    max_speed: Vec<f64>,
}

/// Value function in linear feedback form, loaded from a data file
/// produced by offline reachability analysis. The control law is
/// `u = clamp(-K (tracker - planner))` with the planner state zero-padded
/// up to the tracker dimension.
pub struct LinearFeedbackValue {
    gains: DMatrix<f64>,
    control_lo: DVector<f64>,
    control_hi: DVector<f64>,
    bound: TrackingBound,
    dynamics: PlannerDynamics,
}

impl LinearFeedbackValue {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(&path).with_context(|| {
            format!("reading value function from {}", path.as_ref().display())
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let data: ValueFunctionData =
            serde_json::from_str(text).context("parsing value function data")?;
        Self::from_data(data)
    }

    fn from_data(data: ValueFunctionData) -> Result<Self> {
        let nrows = data.gains.len();
        if nrows == 0 {
            bail!("value function has an empty gain matrix");
        }
        let ncols = data.gains[0].len();
        if data.gains.iter().any(|row| row.len() != ncols) {
            bail!("value function gain matrix is not rectangular");
        }
        if data.control_lo.len() != nrows || data.control_hi.len() != nrows {
            bail!(
                "control bounds have {}/{} entries for a {} row gain matrix",
                data.control_lo.len(),
                data.control_hi.len(),
                nrows
            );
        }

        let flat: Vec<f64> = data.gains.iter().flatten().copied().collect();
        Ok(LinearFeedbackValue {
            gains: DMatrix::from_row_slice(nrows, ncols, &flat),
            control_lo: DVector::from_vec(data.control_lo),
            control_hi: DVector::from_vec(data.control_hi),
            bound: TrackingBound { bound: data.bound },
            dynamics: PlannerDynamics {
                max_speed: data.max_speed,
            },
        })
    }
}

impl ValueFunction for LinearFeedbackValue {
    fn optimal_control(&self, tracker: &[f64], planner: &[f64]) -> Vec<f64> {
        let n = self.gains.ncols();
        let mut relative = DVector::zeros(n);
        for ii in 0..n {
            let t = tracker.get(ii).copied().unwrap_or(0.);
            let p = planner.get(ii).copied().unwrap_or(0.);
            relative[ii] = t - p;
        }

        let u = -(&self.gains * relative);
        u.iter()
            .enumerate()
            .map(|(ii, &v)| v.max(self.control_lo[ii]).min(self.control_hi[ii]))
            .collect()
    }

    fn tracking_bound(&self) -> &TrackingBound {
        &self.bound
    }

    fn planner_dynamics(&self) -> &PlannerDynamics {
        &self.dynamics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"{
        "gains": [[1.0, 0.0], [0.0, 1.0]],
        "control_lo": [-1.0, -1.0],
        "control_hi": [1.0, 1.0],
        "bound": [0.5, 0.5],
        "max_speed": [2.0, 2.0]
    }"#;

    #[test]
    fn test_optimal_control_clamped_feedback() {
        let vf = LinearFeedbackValue::from_json(DATA).unwrap();
        let u = vf.optimal_control(&[0.5, 2.0], &[0.0, 0.0]);
        assert_eq!(u, vec![-0.5, -1.0]);
    }

    #[test]
    fn test_planner_state_zero_padded() {
        let vf = LinearFeedbackValue::from_json(DATA).unwrap();
        let u = vf.optimal_control(&[0.25, 0.25], &[0.25]);
        assert_eq!(u, vec![0.0, -0.25]);
    }

    #[test]
    fn test_bound_and_dynamics_accessors() {
        let vf = LinearFeedbackValue::from_json(DATA).unwrap();
        assert_eq!(vf.tracking_bound().bound, vec![0.5, 0.5]);
        assert_eq!(vf.planner_dynamics().max_speed, vec![2.0, 2.0]);
    }

    #[test]
    fn test_ragged_gains_rejected() {
        let bad = r#"{
            "gains": [[1.0, 0.0], [0.0]],
            "control_lo": [-1.0, -1.0],
            "control_hi": [1.0, 1.0],
            "bound": [0.5],
            "max_speed": [2.0]
        }"#;
        assert!(LinearFeedbackValue::from_json(bad).is_err());
    }

    #[test]
    fn test_mismatched_control_bounds_rejected() {
        let bad = r#"{
            "gains": [[1.0, 0.0]],
            "control_lo": [-1.0, -1.0],
            "control_hi": [1.0],
            "bound": [0.5],
            "max_speed": [2.0]
        }"#;
        assert!(LinearFeedbackValue::from_json(bad).is_err());
    }
}
