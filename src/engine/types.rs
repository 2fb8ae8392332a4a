//! Engine types

use crate::backtest::ValidationResult;
use crate::execution::ExecutionError;
use crate::feed::{Parity, TickSample};
use crate::risk::{HaltReason, RiskPhase, RiskState};
use crate::signal::TradeDecision;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Fatal engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Validation did not find a statistical edge
    #[error("No statistical edge: win rate {win_rate:.4}, CI lower {ci_lower:.4} over {trials} trials")]
    NoEdge {
        win_rate: f64,
        ci_lower: f64,
        trials: usize,
    },
    /// Exchange call failed after every retry
    #[error("Execution failed: {0}")]
    Execution(#[from] ExecutionError),
    /// Trade outcome never confirmed; recorded as a full-stake loss
    #[error("Unresolved {direction} trade of {stake}, recorded as a loss")]
    UnresolvedTrade { direction: Parity, stake: Decimal },
    /// No tick within the timeout
    #[error("Feed stalled: no tick for {0:?}")]
    FeedStalled(Duration),
    /// Tick stream ended
    #[error("Feed closed")]
    FeedClosed,
}

/// Engine lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStage {
    Idle,
    Validating,
    Trading,
    Stopped,
}

impl std::fmt::Display for EngineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EngineStage::Idle => "IDLE",
            EngineStage::Validating => "VALIDATING",
            EngineStage::Trading => "TRADING",
            EngineStage::Stopped => "STOPPED",
        };
        f.write_str(s)
    }
}

/// Read-only view of the engine for dashboards
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub stage: EngineStage,
    pub phase: RiskPhase,
    pub risk: RiskState,
    /// Loss still allowed today before the daily cap
    pub daily_loss_remaining: Decimal,
    /// Decline still allowed before the drawdown stop
    pub drawdown_remaining: Decimal,
    pub cooldown_remaining_secs: i64,
    /// Share of even ticks in the signal window
    pub even_frequency: Option<Decimal>,
    pub last_tick: Option<TickSample>,
    pub validation: Option<ValidationResult>,
    pub last_decision: Option<TradeDecision>,
    pub ticks_processed: u64,
    pub timestamp: DateTime<Utc>,
}

/// Why a session ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    Shutdown,
    Halted(HaltReason),
}

/// Final report of a trading session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub stop: StopReason,
    pub validation: ValidationResult,
    pub final_state: RiskState,
    pub ticks_processed: u64,
    pub signals: u64,
    pub vetoes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unresolved_message() {
        let err = EngineError::UnresolvedTrade {
            direction: Parity::Odd,
            stake: dec!(2.00),
        };
        assert_eq!(err.to_string(), "Unresolved ODD trade of 2.00, recorded as a loss");
    }

    #[test]
    fn test_execution_error_converts() {
        let err: EngineError = ExecutionError::Network("reset".to_string()).into();
        assert!(matches!(err, EngineError::Execution(_)));
    }
}
