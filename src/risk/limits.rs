//! Session halt limits

use super::{HaltReason, RiskState};
use crate::config::RiskConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Thresholds that stop a trading session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Halt when balance is at or below this
    pub balance_floor: Decimal,
    /// Halt when balance is at or above this
    pub balance_ceiling: Decimal,
    /// Halt when drawdown from session peak reaches this fraction
    pub drawdown_stop_frac: Decimal,
    /// Halt when the day's loss reaches this fraction of the day's opening balance
    pub daily_loss_cap_frac: Decimal,
}

impl RiskLimits {
    pub fn from_config(config: &RiskConfig) -> Self {
        Self {
            balance_floor: config.balance_floor,
            balance_ceiling: config.balance_ceiling,
            drawdown_stop_frac: config.drawdown_stop_frac,
            daily_loss_cap_frac: config.daily_loss_cap_frac,
        }
    }

    /// First breached halt condition, checked in priority order
    pub fn check(&self, state: &RiskState) -> Option<HaltReason> {
        if state.balance <= self.balance_floor {
            return Some(HaltReason::BalanceFloor);
        }
        if state.balance >= self.balance_ceiling {
            return Some(HaltReason::TargetReached);
        }
        if state.drawdown() >= self.drawdown_stop_frac {
            return Some(HaltReason::Drawdown);
        }
        if state.daily_pnl <= -self.daily_loss_cap_frac * state.daily_start_balance {
            return Some(HaltReason::DailyLoss);
        }
        None
    }
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            balance_floor: dec!(5.0),
            balance_ceiling: dec!(10000.0),
            drawdown_stop_frac: dec!(0.15),
            daily_loss_cap_frac: dec!(0.10),
        }
    }
}
