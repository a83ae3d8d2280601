use chrono::{DateTime, Utc};

/// Wall-clock stopwatch for per-phase timing statistics.
pub struct Timer {
    t0: DateTime<Utc>,
}

impl Default for Timer {
    fn default() -> Self {
        Timer { t0: Utc::now() }
    }
}

impl Timer {
    ///milliseconds elapsed since construction
    pub fn dur_ms(&self) -> f64 {
        let d = Utc::now().signed_duration_since(self.t0);
        match d.num_microseconds() {
            Some(us) => us as f64 / 1000.,
            None => d.num_milliseconds() as f64,
        }
    }
}

/// Rate-limited logging. Each call site keeps its own last-emit time and
/// stays silent until `period_s` seconds have passed since it last fired.
///
/// ```ignore
/// log_throttle!(1.0, warn, "interpolating before first time {}", tau);
/// ```
#[macro_export]
macro_rules! log_throttle {
    ($period_s:expr, $lvl:ident, $($arg:tt)*) => {{
        use std::cell::Cell;
        use std::time::Instant;
        thread_local! {
            static LAST_EMIT: Cell<Option<Instant>> = Cell::new(None);
        }
        LAST_EMIT.with(|last| {
            let now = Instant::now();
            let due = match last.get() {
                Some(prev) => now.duration_since(prev).as_secs_f64() >= $period_s,
                None => true,
            };
            if due {
                last.set(Some(now));
                log::$lvl!($($arg)*);
            }
        });
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_is_nonnegative() {
        let timer = Timer::default();
        assert!(timer.dur_ms() >= 0.);
    }

    #[test]
    fn test_log_throttle_expands() {
        //smoke test, the macro must be callable with format arguments
        log_throttle!(10.0, debug, "throttled message {}", 1);
        log_throttle!(10.0, debug, "throttled message {}", 2);
    }
}
