// src/throttle.rs
//
// Fixed politeness pause between units of work. The first `wait` passes
// immediately; each later one blocks until `interval` has elapsed since the
// previous unit finished (`done`), so slow fetches and retries never eat
// into the pause.

use std::time::{Duration, Instant};

use tracing::info;

use crate::core::clock::Clock;

pub struct Throttle<C: Clock> {
    clock: C,
    interval: Duration,
    last: Option<Instant>,
}

impl<C: Clock> Throttle<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self { clock, interval, last: None }
    }

    /// Block until the next unit may start. Returns how long it slept.
    pub fn wait(&mut self) -> Duration {
        let slept = match self.last {
            Some(prev) => {
                let remaining = (prev + self.interval).saturating_duration_since(self.clock.now());
                if !remaining.is_zero() {
                    info!(secs = remaining.as_secs_f32(), "pausing before next team");
                    self.clock.sleep(remaining);
                }
                remaining
            }
            None => Duration::ZERO,
        };
        // Gate the next unit even if `done` is never called.
        self.last = Some(self.clock.now());
        slept
    }

    /// Mark the current unit finished; the next pause counts from here.
    pub fn done(&mut self) {
        self.last = Some(self.clock.now());
    }
}
