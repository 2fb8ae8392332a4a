//! Backtest validator
//!
//! Drives the live signal generator over a seeded synthetic tick stream and
//! settles every decision against the parity of the following tick.

use super::ValidationResult;
use crate::config::Config;
use crate::feed::SyntheticTicks;
use crate::signal::{SignalGenerator, TickWindow};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Runs edge validation on synthetic data
#[derive(Debug, Clone)]
pub struct BacktestValidator {
    symbol: String,
    pip_decimals: u32,
    /// Tick budget; the run stops here even with too few trials
    max_ticks: usize,
}

impl BacktestValidator {
    /// Create a new validator
    pub fn new(symbol: impl Into<String>, pip_decimals: u32, max_ticks: usize) -> Self {
        Self {
            symbol: symbol.into(),
            pip_decimals,
            max_ticks,
        }
    }

    /// Create from the feed and backtest sections
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.feed.symbol.clone(),
            config.feed.pip_decimals,
            config.backtest.max_ticks,
        )
    }

    /// Validate the generator's edge; deterministic for a given seed
    pub fn validate(
        &self,
        generator: &SignalGenerator,
        min_samples: usize,
        confidence_level: f64,
        payout_ratio: Decimal,
        seed: u64,
    ) -> ValidationResult {
        let payout = payout_ratio.to_f64().unwrap_or(0.0);
        let mut ticks = SyntheticTicks::new(self.symbol.clone(), self.pip_decimals, seed);
        let mut window = TickWindow::new(generator.lookback());

        let mut consumed = 0usize;
        let mut trials = 0usize;
        let mut wins = 0usize;
        let mut equity = 0.0f64;
        let mut peak = 0.0f64;
        let mut max_drawdown = 0.0f64;

        let mut current = ticks.next();
        if current.is_some() {
            consumed += 1;
        }

        while let Some(tick) = current {
            if trials >= min_samples || consumed >= self.max_ticks {
                break;
            }

            window.push(tick);
            let decision = generator.generate(&window);

            let Some(next) = ticks.next() else { break };
            consumed += 1;

            if let Some(decision) = decision {
                trials += 1;
                if next.parity() == decision.direction {
                    wins += 1;
                    equity += payout - 1.0;
                } else {
                    equity -= 1.0;
                }
                peak = peak.max(equity);
                max_drawdown = max_drawdown.max(peak - equity);
            }

            current = Some(next);
        }

        let mut result =
            ValidationResult::from_counts(wins, trials, min_samples, confidence_level, payout);
        result.ticks_consumed = consumed;
        result.max_drawdown_units = max_drawdown;
        result.net_units = equity;

        tracing::info!(
            seed,
            trials,
            wins,
            ticks = consumed,
            win_rate = result.win_rate,
            ev = result.expected_value,
            ci_lower = result.confidence_interval_lower,
            ci_upper = result.confidence_interval_upper,
            has_edge = result.has_edge,
            "Backtest validation complete"
        );

        result
    }
}
