//! Paper exchange
//!
//! Simulates the exchange collaborator: a seeded synthetic tick feed, and
//! one-tick contracts that settle on the digit of the next tick the feed
//! emits after placement. No capital is risked.

use super::{ExchangeClient, ExecutionError, TradeOutcome, TradeResult};
use crate::config::Config;
use crate::feed::{Parity, SyntheticTicks, TickSample};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, RwLock};
use uuid::Uuid;

/// Buffered ticks per subscription
const FEED_BUFFER: usize = 1024;

/// Paper exchange with simulated feed and settlement
pub struct PaperExchange {
    pip_decimals: u32,
    payout_ratio: Decimal,
    feed_seed: u64,
    tick_interval: Duration,
    /// Latest emitted tick; settlement waits on the next change
    latest_tick: Arc<watch::Sender<Option<TickSample>>>,
    feed_active: AtomicBool,
    balance: Arc<RwLock<Decimal>>,
    history: Arc<RwLock<Vec<TradeResult>>>,
}

impl PaperExchange {
    /// Create a paper exchange
    pub fn new(
        pip_decimals: u32,
        payout_ratio: Decimal,
        starting_balance: Decimal,
        seed: u64,
    ) -> Self {
        Self {
            pip_decimals,
            payout_ratio,
            feed_seed: seed,
            tick_interval: Duration::from_secs(1),
            latest_tick: Arc::new(watch::channel(None).0),
            feed_active: AtomicBool::new(false),
            balance: Arc::new(RwLock::new(starting_balance)),
            history: Arc::new(RwLock::new(vec![])),
        }
    }

    /// Create from the feed and execution sections
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.feed.pip_decimals,
            config.execution.payout_ratio,
            config.execution.paper_starting_balance,
            config.execution.paper_seed,
        )
    }

    /// Wall-clock spacing between emitted ticks
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Every trade settled so far
    pub async fn history(&self) -> Vec<TradeResult> {
        self.history.read().await.clone()
    }
}

#[async_trait]
impl ExchangeClient for PaperExchange {
    async fn subscribe(&self, symbol: &str) -> Result<mpsc::Receiver<TickSample>, ExecutionError> {
        let (tx, rx) = mpsc::channel(FEED_BUFFER);
        let mut ticks =
            SyntheticTicks::new(symbol, self.pip_decimals, self.feed_seed).starting_at(Utc::now());
        let interval = self.tick_interval;
        let latest = self.latest_tick.clone();
        self.feed_active.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            loop {
                timer.tick().await;
                let Some(tick) = ticks.next() else { break };
                latest.send_replace(Some(tick.clone()));
                if tx.send(tick).await.is_err() {
                    tracing::debug!("Paper feed subscriber dropped");
                    break;
                }
            }
        });

        tracing::info!(symbol, ?interval, "Paper feed subscribed");
        Ok(rx)
    }

    async fn place_trade(
        &self,
        direction: Parity,
        stake: Decimal,
    ) -> Result<TradeResult, ExecutionError> {
        if stake <= Decimal::ZERO {
            return Err(ExecutionError::Protocol(format!("invalid stake {}", stake)));
        }

        let mut balance = self.balance.write().await;
        if stake > *balance {
            return Err(ExecutionError::Protocol(format!(
                "stake {} exceeds balance {}",
                stake, *balance
            )));
        }

        if !self.feed_active.load(Ordering::SeqCst) {
            return Err(ExecutionError::Protocol(
                "no tick feed to settle against".to_string(),
            ));
        }

        // Marks the current tick as seen, so only a later one settles
        let mut next_tick = self.latest_tick.subscribe();
        next_tick
            .changed()
            .await
            .map_err(|e| ExecutionError::Network(e.to_string()))?;
        let Some(settlement) = next_tick.borrow_and_update().clone() else {
            return Err(ExecutionError::Protocol("feed emitted no tick".to_string()));
        };

        let digit = settlement.last_digit;
        let outcome = if settlement.parity() == direction {
            TradeOutcome::Win
        } else {
            TradeOutcome::Loss
        };
        let pnl = match outcome {
            TradeOutcome::Win => (stake * (self.payout_ratio - Decimal::ONE)).round_dp(2),
            TradeOutcome::Loss => -stake,
        };
        *balance += pnl;

        let result = TradeResult {
            contract_id: Some(Uuid::new_v4()),
            direction,
            stake,
            outcome,
            pnl,
            resulting_balance: *balance,
            settled: true,
            timestamp: settlement.timestamp,
        };
        self.history.write().await.push(result.clone());

        tracing::info!(
            contract_id = ?result.contract_id,
            %direction,
            %stake,
            digit,
            %outcome,
            %pnl,
            balance = %result.resulting_balance,
            "Paper trade settled"
        );
        Ok(result)
    }

    async fn get_balance(&self) -> Result<Decimal, ExecutionError> {
        Ok(*self.balance.read().await)
    }
}
