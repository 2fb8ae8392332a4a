//! Execution types

use crate::feed::Parity;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Contract identifier
pub type ContractId = Uuid;

/// A trade approved and sized by the risk manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovedTrade {
    /// Parity to buy
    pub direction: Parity,
    /// Stake in account currency
    pub stake: Decimal,
}

/// Settlement outcome of a parity contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeOutcome {
    Win,
    Loss,
}

impl std::fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeOutcome::Win => write!(f, "WIN"),
            TradeOutcome::Loss => write!(f, "LOSS"),
        }
    }
}

/// Result of a settled (or assumed) trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResult {
    /// Exchange contract identifier, absent for assumed outcomes
    pub contract_id: Option<ContractId>,
    /// Parity bought
    pub direction: Parity,
    /// Stake risked
    pub stake: Decimal,
    /// Win or loss
    pub outcome: TradeOutcome,
    /// Signed profit and loss
    pub pnl: Decimal,
    /// Account balance after settlement
    pub resulting_balance: Decimal,
    /// False when the outcome was never confirmed by the exchange
    pub settled: bool,
    /// Settlement timestamp
    pub timestamp: DateTime<Utc>,
}

impl TradeResult {
    /// Loss of the full stake recorded for a trade whose outcome is unknown
    pub fn assumed_loss(trade: &ApprovedTrade, balance_before: Decimal) -> Self {
        Self {
            contract_id: None,
            direction: trade.direction,
            stake: trade.stake,
            outcome: TradeOutcome::Loss,
            pnl: -trade.stake,
            resulting_balance: balance_before - trade.stake,
            settled: false,
            timestamp: Utc::now(),
        }
    }
}

/// Exchange call failures
#[derive(Debug, Clone, Error)]
pub enum ExecutionError {
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),
    /// Exchange rejected or garbled the request
    #[error("Protocol error: {0}")]
    Protocol(String),
    /// No response within the deadline
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
    /// Tick subscription ended
    #[error("Feed closed")]
    FeedClosed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_assumed_loss_costs_full_stake() {
        let trade = ApprovedTrade {
            direction: Parity::Odd,
            stake: dec!(2.00),
        };
        let result = TradeResult::assumed_loss(&trade, dec!(100));

        assert_eq!(result.outcome, TradeOutcome::Loss);
        assert_eq!(result.pnl, dec!(-2.00));
        assert_eq!(result.resulting_balance, dec!(98.00));
        assert!(!result.settled);
        assert!(result.contract_id.is_none());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(TradeOutcome::Win.to_string(), "WIN");
        assert_eq!(TradeOutcome::Loss.to_string(), "LOSS");
    }

    #[test]
    fn test_execution_error_messages() {
        let err = ExecutionError::Network("connection reset".to_string());
        assert_eq!(err.to_string(), "Network error: connection reset");
        assert_eq!(ExecutionError::FeedClosed.to_string(), "Feed closed");
    }
}
