use crate::states::States;
use crate::trajectory::Trajectory;

/// Top-level planning surface: produce a trajectory from `start` to `goal`
/// beginning at `start_time`, or an empty trajectory on failure.
pub trait Planner<S: States> {
    fn plan(&mut self, start: &S, goal: &S, start_time: f64) -> Trajectory<S>;
}
