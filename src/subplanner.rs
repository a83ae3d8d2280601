use crate::states::{euclidean_distance, States};
use crate::trajectory::Trajectory;

/// Oracle producing a dynamically feasible trajectory between two states.
///
/// The returned trajectory starts at `start_time` with its first state at
/// `from` and its last state at (or within tolerance of) `to`. An empty
/// trajectory signals that no feasible connection exists under the
/// planner's resource limits.
pub trait SubPlanner<S: States> {
    fn sub_plan(&mut self, from: &S, to: &S, start_time: f64) -> Trajectory<S>;
}

/// Constant-speed straight-line connections, sampled at a fixed period.
/// An optional connection range makes distant pairs infeasible, which is
/// enough to exercise the recursive feasibility machinery in tests and
/// demos.
pub struct StraightLinePlanner {
    speed: f64,
    sample_period: f64,
    max_range: Option<f64>,
}

impl StraightLinePlanner {
    pub fn new(speed: f64, sample_period: f64) -> Self {
        assert!(speed > 0., "straight line planner needs a positive speed");
        assert!(
            sample_period > 0.,
            "straight line planner needs a positive sample period"
        );
        Self {
            speed,
            sample_period,
            max_range: None,
        }
    }

    ///refuse connections longer than `range` in state vector distance
    pub fn with_max_range(mut self, range: f64) -> Self {
        self.max_range = Some(range);
        self
    }
}

impl<S: States> SubPlanner<S> for StraightLinePlanner {
    fn sub_plan(&mut self, from: &S, to: &S, start_time: f64) -> Trajectory<S> {
        let dist = euclidean_distance(&from.get_vals(), &to.get_vals());
        if let Some(range) = self.max_range {
            if dist > range {
                return Trajectory::empty();
            }
        }

        let duration = dist / self.speed;
        if duration <= 0. {
            //degenerate connection, still a valid zero-duration trajectory
            return Trajectory::new(vec![from.clone(), to.clone()], vec![start_time, start_time]);
        }

        let segments = (duration / self.sample_period).ceil().max(1.) as usize;
        let mut states = Vec::with_capacity(segments + 1);
        let mut times = Vec::with_capacity(segments + 1);
        for ii in 0..=segments {
            let alpha = ii as f64 / segments as f64;
            states.push(from.lincomb(to, alpha));
            times.push(start_time + alpha * duration);
        }
        Trajectory::new(states, times)
    }
}
