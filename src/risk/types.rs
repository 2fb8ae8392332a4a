//! Risk management types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason for a session halt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HaltReason {
    /// Balance at or below the floor
    BalanceFloor,
    /// Balance at or above the profit target
    TargetReached,
    /// Drawdown from session peak at or beyond the stop
    Drawdown,
    /// Daily loss cap reached
    DailyLoss,
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HaltReason::BalanceFloor => "BALANCE_FLOOR",
            HaltReason::TargetReached => "TARGET_REACHED",
            HaltReason::Drawdown => "DRAWDOWN",
            HaltReason::DailyLoss => "DAILY_LOSS",
        };
        f.write_str(s)
    }
}

/// Risk gate vetoes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskViolation {
    /// Session was halted earlier
    #[error("Trading already halted: {0}")]
    AlreadyHalted(HaltReason),
    /// Session halted by this evaluation
    #[error("Trading halted: {0}")]
    Halted(HaltReason),
    /// Loss-streak cooldown still running
    #[error("In cooldown until {until}")]
    InCooldown { until: DateTime<Utc> },
    /// Clamped stake exceeds the balance
    #[error("Insufficient balance: stake {stake} > balance {balance}")]
    InsufficientBalance { stake: Decimal, balance: Decimal },
}

impl RiskViolation {
    /// Halt reason carried by a halting veto
    pub fn halt_reason(&self) -> Option<HaltReason> {
        match self {
            RiskViolation::AlreadyHalted(reason) | RiskViolation::Halted(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Short label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            RiskViolation::AlreadyHalted(_) => "already_halted",
            RiskViolation::Halted(_) => "halted",
            RiskViolation::InCooldown { .. } => "in_cooldown",
            RiskViolation::InsufficientBalance { .. } => "insufficient_balance",
        }
    }
}

/// Gate phase derived from risk state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskPhase {
    Active,
    Cooldown { until: DateTime<Utc> },
    Halted(HaltReason),
}

impl std::fmt::Display for RiskPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskPhase::Active => write!(f, "ACTIVE"),
            RiskPhase::Cooldown { until } => write!(f, "COOLDOWN until {}", until.format("%H:%M:%S")),
            RiskPhase::Halted(reason) => write!(f, "HALTED ({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_halt_violations() {
        assert_eq!(
            RiskViolation::AlreadyHalted(HaltReason::DailyLoss).halt_reason(),
            Some(HaltReason::DailyLoss)
        );
        assert_eq!(
            RiskViolation::InCooldown { until: Utc::now() }.halt_reason(),
            None
        );
        assert_eq!(
            RiskViolation::InsufficientBalance {
                stake: dec!(0.35),
                balance: dec!(0.20)
            }
            .halt_reason(),
            None
        );
        assert_eq!(
            RiskViolation::Halted(HaltReason::Drawdown).halt_reason(),
            Some(HaltReason::Drawdown)
        );
    }

    #[test]
    fn test_violation_message_names_reason() {
        let msg = RiskViolation::Halted(HaltReason::BalanceFloor).to_string();
        assert_eq!(msg, "Trading halted: BALANCE_FLOOR");
    }

    #[test]
    fn test_halt_reason_serializes_screaming() {
        let json = serde_json::to_string(&HaltReason::TargetReached).unwrap();
        assert_eq!(json, "\"TARGET_REACHED\"");
    }
}
