use log::warn;
use serde::Serialize;

use crate::log_throttle;
use crate::states::States;

/// Timestamped state sequence. The two sequences are kept the same length
/// with non-decreasing times; an empty trajectory signals planner failure.
#[derive(Clone, Debug)]
pub struct Trajectory<S: States> {
    states: Vec<S>,
    times: Vec<f64>,
}

///wire form of one trajectory sample
#[derive(Clone, Debug, Serialize)]
pub struct Waypoint {
    pub t: f64,
    pub x: Vec<f64>,
}

impl<S: States> Trajectory<S> {
    /// Best-effort construction: a length mismatch truncates the longer
    /// sequence, a time inversion is clamped to the preceding timestamp.
    /// Both repairs are logged.
    pub fn new(mut states: Vec<S>, mut times: Vec<f64>) -> Self {
        if states.len() != times.len() {
            warn!(
                "trajectory constructed with {} states but {} times, truncating",
                states.len(),
                times.len()
            );
            let n = states.len().min(times.len());
            states.truncate(n);
            times.truncate(n);
        }

        for ii in 1..times.len() {
            if times[ii] < times[ii - 1] {
                warn!(
                    "trajectory time inversion at index {}: {} < {}, clamping",
                    ii,
                    times[ii],
                    times[ii - 1]
                );
                times[ii] = times[ii - 1];
            }
        }

        Trajectory { states, times }
    }

    pub fn empty() -> Self {
        Trajectory {
            states: vec![],
            times: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn first_state(&self) -> Option<&S> {
        self.states.first()
    }

    pub fn last_state(&self) -> Option<&S> {
        self.states.last()
    }

    pub fn first_time(&self) -> Option<f64> {
        self.times.first().copied()
    }

    pub fn last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.,
        }
    }

    /// Linear interpolation at time `tau`, clamped to the endpoint states
    /// outside the time range. `None` on an empty trajectory.
    pub fn interpolate(&self, tau: f64) -> Option<S> {
        if self.is_empty() {
            log_throttle!(1.0, warn, "interpolating an empty trajectory");
            return None;
        }

        match self.times.iter().position(|&t| t >= tau) {
            Some(0) => {
                log_throttle!(
                    1.0,
                    warn,
                    "interpolating before first time: {} < {}",
                    tau,
                    self.times[0]
                );
                Some(self.states[0].clone())
            }
            None => {
                log_throttle!(
                    1.0,
                    warn,
                    "interpolating after last time: {} > {}",
                    tau,
                    self.times[self.times.len() - 1]
                );
                Some(self.states[self.states.len() - 1].clone())
            }
            Some(hi) => {
                let lo = hi - 1;
                let dt = self.times[hi] - self.times[lo];
                let alpha = if dt > 0. {
                    (tau - self.times[lo]) / dt
                } else {
                    0.
                };
                Some(self.states[lo].lincomb(&self.states[hi], alpha))
            }
        }
    }

    ///translate all timestamps so the first equals t0
    pub fn reset_first_time(&mut self, t0: f64) {
        if let Some(first) = self.times.first().copied() {
            let shift = t0 - first;
            for t in self.times.iter_mut() {
                *t += shift;
            }
        }
    }

    /// Fuse a sequence of trajectories into one. Each piece is re-timed so
    /// its first timestamp abuts the previous piece's last; duplicate
    /// boundary samples are kept. Empty pieces contribute nothing.
    pub fn concatenate<I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = Trajectory<S>>,
    {
        let mut states = Vec::new();
        let mut times: Vec<f64> = Vec::new();

        for mut piece in pieces {
            if piece.is_empty() {
                continue;
            }
            if let Some(&last) = times.last() {
                piece.reset_first_time(last);
            }
            states.extend(piece.states);
            times.extend(piece.times);
        }

        Trajectory { states, times }
    }

    pub fn to_waypoints(&self) -> Vec<Waypoint> {
        self.states
            .iter()
            .zip(self.times.iter())
            .map(|(s, &t)| Waypoint {
                t,
                x: s.get_vals(),
            })
            .collect()
    }
}
