//! Validation statistics and reporting

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Lowest acceptable lower confidence bound on the win rate
pub const MIN_CI_LOWER: f64 = 0.51;
/// Lowest confidence level at which an edge can be declared
pub const MIN_CONFIDENCE_LEVEL: f64 = 0.95;

/// Outcome of a backtest validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Settled trials
    pub total_trades: usize,
    /// Winning trials
    pub wins: usize,
    /// wins / total_trades, 0 without trials
    pub win_rate: f64,
    /// Expected profit per unit stake
    pub expected_value: f64,
    pub confidence_interval_lower: f64,
    pub confidence_interval_upper: f64,
    pub confidence_level: f64,
    /// Synthetic ticks drawn
    pub ticks_consumed: usize,
    /// Largest peak-to-trough decline of the unit-stake equity curve
    pub max_drawdown_units: f64,
    /// Final unit-stake P&L
    pub net_units: f64,
    /// True when the run supports live trading
    pub has_edge: bool,
}

impl ValidationResult {
    /// Compute the statistics from raw counts
    pub fn from_counts(
        wins: usize,
        trials: usize,
        min_samples: usize,
        confidence_level: f64,
        payout_ratio: f64,
    ) -> Self {
        let win_rate = if trials == 0 {
            0.0
        } else {
            wins as f64 / trials as f64
        };
        let expected_value = win_rate * payout_ratio - 1.0;

        let (lower, upper) = if trials == 0 {
            (0.0, 0.0)
        } else {
            let margin =
                z_score(confidence_level) * (win_rate * (1.0 - win_rate) / trials as f64).sqrt();
            (win_rate - margin, win_rate + margin)
        };

        let has_edge = trials >= min_samples
            && expected_value > 0.0
            && lower > MIN_CI_LOWER
            && confidence_level >= MIN_CONFIDENCE_LEVEL;

        Self {
            total_trades: trials,
            wins,
            win_rate,
            expected_value,
            confidence_interval_lower: lower,
            confidence_interval_upper: upper,
            confidence_level,
            ticks_consumed: 0,
            max_drawdown_units: 0.0,
            net_units: expected_value * trials as f64,
            has_edge,
        }
    }

    pub fn losses(&self) -> usize {
        self.total_trades - self.wins
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
               VALIDATION RESULTS
══════════════════════════════════════════════════════

PERFORMANCE
───────────────────────────────────────────────────────
Win Rate:         {:.2}%
Expected Value:   {:+.4} per unit
Net P&L:          {:+.2} units
{:.0}% CI:          [{:.4}, {:.4}]
Max Drawdown:     {:.2} units

ACTIVITY
───────────────────────────────────────────────────────
Trials:           {} ({} W / {} L)
Ticks Consumed:   {}

VERDICT
───────────────────────────────────────────────────────
Edge:             {}
══════════════════════════════════════════════════════
"#,
            self.win_rate * 100.0,
            self.expected_value,
            self.net_units,
            self.confidence_level * 100.0,
            self.confidence_interval_lower,
            self.confidence_interval_upper,
            self.max_drawdown_units,
            self.total_trades,
            self.wins,
            self.losses(),
            self.ticks_consumed,
            if self.has_edge { "YES" } else { "NO" },
        )
    }
}

/// Two-sided standard normal quantile for a confidence level
///
/// `z_score(0.95)` is 1.96.
pub fn z_score(confidence_level: f64) -> f64 {
    Normal::standard().inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0)
}
