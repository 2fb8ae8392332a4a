//! Execution module
//!
//! The exchange collaborator boundary: tick subscription, contract placement,
//! and balance queries. A paper implementation is bundled.

mod backoff;
mod paper;
mod types;

pub use backoff::ExponentialBackoff;
pub use paper::PaperExchange;
pub use types::{ApprovedTrade, ContractId, ExecutionError, TradeOutcome, TradeResult};

use crate::feed::{Parity, TickSample};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

/// Trait for exchange connections
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Subscribe to the tick stream for a symbol
    async fn subscribe(&self, symbol: &str) -> Result<mpsc::Receiver<TickSample>, ExecutionError>;
    /// Buy a parity contract and wait for its settlement
    async fn place_trade(
        &self,
        direction: Parity,
        stake: Decimal,
    ) -> Result<TradeResult, ExecutionError>;
    /// Current account balance
    async fn get_balance(&self) -> Result<Decimal, ExecutionError>;
}
