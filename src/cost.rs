use crate::states::States;
use crate::trajectory::Trajectory;

/// Edge cost used to accumulate cost-to-come along the planning graph.
pub trait CostFunctor<S: States> {
    fn evaluate(&self, traj: &Trajectory<S>) -> f64;
}

///time-optimal planning: an edge costs its duration
pub struct DurationCost;

impl<S: States> CostFunctor<S> for DurationCost {
    fn evaluate(&self, traj: &Trajectory<S>) -> f64 {
        traj.duration()
    }
}
