//! Retry delays for trade placement

use crate::config::ExecutionConfig;
use rand::Rng;
use std::time::Duration;

/// Share of each delay randomized in either direction
const JITTER_FACTOR: f64 = 0.1;

/// Exponential backoff between placement retries
///
/// Retry `n` waits `base_ms * 2^n`, capped at `max_ms`, shifted by up to
/// `JITTER_FACTOR` of itself in either direction.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base_ms: u64,
    max_ms: u64,
    retries: u32,
}

impl ExponentialBackoff {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self {
            base_ms,
            max_ms,
            retries: 0,
        }
    }

    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self::new(config.backoff_base_ms, config.backoff_max_ms)
    }

    /// Delay before the next retry
    pub fn next_delay(&mut self) -> Duration {
        let nominal = self.nominal_ms();
        self.retries = self.retries.saturating_add(1);
        Duration::from_millis(jittered(nominal))
    }

    fn nominal_ms(&self) -> u64 {
        let factor = 1u64.checked_shl(self.retries).unwrap_or(u64::MAX);
        self.base_ms.saturating_mul(factor).min(self.max_ms)
    }
}

fn jittered(ms: u64) -> u64 {
    let spread = (ms as f64 * JITTER_FACTOR) as u64;
    if spread == 0 {
        return ms;
    }
    let low = ms.saturating_sub(spread);
    rand::thread_rng().gen_range(low..=ms.saturating_add(spread))
}
