//! Stake sizing
//!
//! A fixed fraction of the balance, rounded to cents and clamped between the
//! exchange minimum and a hard per-trade cap.

use crate::config::RiskConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixed-fraction stake sizer
#[derive(Debug, Clone)]
pub struct StakeSizer {
    /// Fraction of balance per trade (e.g., 0.02 = 2%)
    pub max_stake_frac: Decimal,
    /// Smallest stake the exchange accepts
    pub min_stake: Decimal,
    /// Largest stake ever placed
    pub max_single_stake_cap: Decimal,
}

impl StakeSizer {
    /// Create a new sizer
    pub fn new(max_stake_frac: Decimal, min_stake: Decimal, max_single_stake_cap: Decimal) -> Self {
        Self {
            max_stake_frac,
            min_stake,
            max_single_stake_cap,
        }
    }

    /// Create from RiskConfig
    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(
            config.max_stake_frac,
            config.min_stake,
            config.max_single_stake_cap,
        )
    }

    /// Stake for a given balance; may exceed the balance when it is tiny
    pub fn stake_for(&self, balance: Decimal) -> Decimal {
        let raw = (balance * self.max_stake_frac).round_dp(2);
        raw.max(self.min_stake).min(self.max_single_stake_cap)
    }
}

impl Default for StakeSizer {
    fn default() -> Self {
        Self {
            max_stake_frac: dec!(0.02), // 2% per trade
            min_stake: dec!(0.35),      // exchange minimum
            max_single_stake_cap: dec!(5),
        }
    }
}
