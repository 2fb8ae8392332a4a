//! Seeded synthetic tick generator
//!
//! Produces a random-walk quote whose pip digit is drawn uniformly from 0..=9,
//! so parity is unbiased by construction. Used by the backtest validator and
//! by the paper exchange.

use super::TickSample;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

/// Starting level of the random walk
const BASE_PRICE: f64 = 100.0;
/// Lowest level the walk is allowed to reach
const PRICE_FLOOR: f64 = 50.0;
/// Maximum absolute step per tick
const MAX_STEP: f64 = 0.05;

/// Deterministic stream of synthetic ticks
pub struct SyntheticTicks {
    symbol: String,
    pip_decimals: u32,
    rng: StdRng,
    price: f64,
    next_ts: DateTime<Utc>,
    interval: Duration,
}

impl SyntheticTicks {
    /// Create a generator with the given seed
    pub fn new(symbol: impl Into<String>, pip_decimals: u32, seed: u64) -> Self {
        Self {
            symbol: symbol.into(),
            pip_decimals,
            rng: StdRng::seed_from_u64(seed),
            price: BASE_PRICE,
            next_ts: DateTime::<Utc>::UNIX_EPOCH,
            interval: Duration::seconds(1),
        }
    }

    /// Start timestamps at `start` instead of the Unix epoch
    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.next_ts = start;
        self
    }

    /// Draw a uniform digit from the generator's own stream
    fn next_digit(&mut self) -> u8 {
        self.rng.gen_range(0..10)
    }

    fn next_tick(&mut self) -> TickSample {
        let step = self.rng.gen_range(-MAX_STEP..=MAX_STEP);
        self.price = (self.price + step).max(PRICE_FLOOR);

        let digit = self.next_digit();
        let head = (self.price * 10f64.powi(self.pip_decimals as i32 - 1)).floor() as i64;
        let quote = Decimal::new(head * 10 + i64::from(digit), self.pip_decimals);

        let timestamp = self.next_ts;
        self.next_ts += self.interval;

        TickSample {
            symbol: self.symbol.clone(),
            quote,
            last_digit: digit,
            timestamp,
        }
    }
}

impl Iterator for SyntheticTicks {
    type Item = TickSample;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_tick())
    }
}
