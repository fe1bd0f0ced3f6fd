//! Wall-clock spawn timer and per-frame tick length.

use std::time::{Duration, Instant};

/// Fixed-period wall-clock timer, polled from the main loop.
///
/// Fires at most once per poll. If the loop stalls for several periods the
/// missed firings are dropped rather than replayed in a burst.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next: Instant,
}

impl Interval {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: now + period,
        }
    }

    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }
}

/// Tick length to feed the integrator for a frame that took `elapsed`.
///
/// Without compensation every frame counts as exactly one nominal frame.
pub fn frame_dt(elapsed: Duration, nominal: Duration, compensate: bool) -> f64 {
    if !compensate || nominal.is_zero() {
        return 1.0;
    }
    // Clamp so a long stall can't tunnel the bird through a pipe.
    (elapsed.as_secs_f64() / nominal.as_secs_f64()).clamp(0.0, 3.0)
}
