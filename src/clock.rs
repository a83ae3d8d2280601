use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Utc};

/// Monotonic time source consumed by the planner's deadline loop.
///
/// Abstracted so tests can drive the budget deterministically.
pub trait RunClock {
    ///seconds since some fixed origin
    fn now(&self) -> f64;
}

pub struct WallClock {
    epoch: DateTime<Utc>,
}

impl WallClock {
    pub fn new() -> Self {
        WallClock { epoch: Utc::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        WallClock::new()
    }
}

impl RunClock for WallClock {
    fn now(&self) -> f64 {
        let d = Utc::now().signed_duration_since(self.epoch);
        match d.num_microseconds() {
            Some(us) => us as f64 * 1e-6,
            None => d.num_milliseconds() as f64 * 1e-3,
        }
    }
}

/// Hand-driven clock for deterministic tests. Clones share the same time
/// cell, so a test can keep a handle while the planner owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    t: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, t: f64) {
        self.t.set(t);
    }

    pub fn advance(&self, dt: f64) {
        self.t.set(self.t.get() + dt);
    }
}

impl RunClock for ManualClock {
    fn now(&self) -> f64 {
        self.t.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_monotone() {
        let clock = WallClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.);
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_shared_handle() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.set(2.5);
        assert_eq!(clock.now(), 2.5);
        handle.advance(0.5);
        assert_eq!(clock.now(), 3.);
    }
}
