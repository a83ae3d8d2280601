use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Planner configuration. Loaded once before any planning; a missing or
/// malformed parameter fails initialization.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlannerParams {
    ///radius for goal candidate queries, in state vector distance
    pub search_radius: f64,
    ///k for the nearest neighbour attach step
    pub num_neighbors: usize,
    ///wall clock budget per plan call, seconds
    pub max_runtime: f64,
    ///tracker cadence, consumed by the tracker rather than the planner
    pub time_step: f64,
}

impl PlannerParams {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "reading planner parameters from {}",
                path.as_ref().display()
            )
        })?;
        let params: PlannerParams =
            serde_json::from_str(&text).context("parsing planner parameters")?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.search_radius.is_finite() || self.search_radius <= 0. {
            bail!(
                "search_radius must be positive and finite, got {}",
                self.search_radius
            );
        }
        if self.num_neighbors < 1 {
            bail!("num_neighbors must be at least 1");
        }
        if !self.max_runtime.is_finite() || self.max_runtime <= 0. {
            bail!(
                "max_runtime must be positive and finite, got {}",
                self.max_runtime
            );
        }
        if !self.time_step.is_finite() || self.time_step <= 0. {
            bail!("time_step must be positive and finite, got {}", self.time_step);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PlannerParams {
        PlannerParams {
            search_radius: 2.,
            num_neighbors: 4,
            max_runtime: 1.,
            time_step: 0.1,
        }
    }

    #[test]
    fn test_valid_params() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_zero_neighbors_rejected() {
        let mut p = valid();
        p.num_neighbors = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_nonpositive_radius_rejected() {
        let mut p = valid();
        p.search_radius = -1.;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_nan_runtime_rejected() {
        let mut p = valid();
        p.max_runtime = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_missing_field_fails_parse() {
        let r: std::result::Result<PlannerParams, _> =
            serde_json::from_str(r#"{ "search_radius": 1.0 }"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_round_trip_json() {
        let p = valid();
        let text = serde_json::to_string(&p).unwrap();
        let q: PlannerParams = serde_json::from_str(&text).unwrap();
        assert_eq!(q.num_neighbors, 4);
        assert_eq!(q.search_radius, 2.);
    }
}
