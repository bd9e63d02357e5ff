// src/core/backoff.rs
use rand::Rng;
use std::time::Duration;

use crate::config::consts::{BACKOFF_BASE_MS, JITTER_MS};

/// `base * 2^attempt` plus a uniform jitter in `[0, jitter_ms)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    base_ms: u64,
    jitter_ms: u64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BACKOFF_BASE_MS).with_jitter(JITTER_MS)
    }
}

impl Backoff {
    pub const fn new(base_ms: u64) -> Self {
        Self { base_ms, jitter_ms: 0 }
    }

    pub const fn with_jitter(mut self, jitter_ms: u64) -> Self {
        self.jitter_ms = jitter_ms;
        self
    }

    /// Delay after the failed attempt with zero-based index `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = self.base_ms.saturating_mul(2u64.saturating_pow(attempt.min(20)));
        let jitter = if self.jitter_ms > 0 {
            rand::thread_rng().gen_range(0..self.jitter_ms)
        } else {
            0
        };
        Duration::from_millis(exp.saturating_add(jitter))
    }
}
