//! Session orchestrator
//!
//! One logical task: validation runs once, then each tick is fully processed
//! (window, signal, risk gate, execution, settlement) before the next is
//! requested. Shutdown is only observed between ticks, so an approved trade
//! is always recorded.

use super::{EngineError, EngineSnapshot, EngineStage, SessionSummary, StopReason};
use crate::backtest::{BacktestValidator, ValidationResult};
use crate::config::Config;
use crate::execution::{
    ApprovedTrade, ExchangeClient, ExecutionError, ExponentialBackoff, TradeOutcome, TradeResult,
};
use crate::feed::TickSample;
use crate::risk::{HaltReason, RiskManager};
use crate::signal::{SignalGenerator, TickWindow, TradeDecision};
use crate::telemetry::{self, LatencyMetric};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Drives a single trading session
pub struct Orchestrator {
    config: Config,
    exchange: Arc<dyn ExchangeClient>,
    generator: SignalGenerator,
    validator: BacktestValidator,
    risk: RiskManager,
    window: TickWindow,
    stage: EngineStage,
    validation: Option<ValidationResult>,
    last_decision: Option<TradeDecision>,
    last_trade_at: Option<DateTime<Utc>>,
    last_status_at: Option<DateTime<Utc>>,
    current_day: Option<NaiveDate>,
    /// Timestamp of the latest tick; the engine's notion of "now"
    clock: DateTime<Utc>,
    ticks_processed: u64,
    signals: u64,
    vetoes: u64,
}

impl Orchestrator {
    pub fn new(config: &Config, exchange: Arc<dyn ExchangeClient>) -> Self {
        let generator = SignalGenerator::new(&config.signal);
        Self {
            window: TickWindow::new(generator.lookback()),
            generator,
            validator: BacktestValidator::from_config(config),
            risk: RiskManager::new(&config.risk, Decimal::ZERO),
            config: config.clone(),
            exchange,
            stage: EngineStage::Idle,
            validation: None,
            last_decision: None,
            last_trade_at: None,
            last_status_at: None,
            current_day: None,
            clock: Utc::now(),
            ticks_processed: 0,
            signals: 0,
            vetoes: 0,
        }
    }

    /// Run validation and then trade until halted, shut down, or failed
    pub async fn run(
        &mut self,
        shutdown: watch::Receiver<bool>,
    ) -> Result<SessionSummary, EngineError> {
        let outcome = self.run_session(shutdown).await;
        self.stage = EngineStage::Stopped;

        match &outcome {
            Ok(summary) => {
                tracing::info!(
                    stop = ?summary.stop,
                    trades = summary.final_state.trades,
                    balance = %summary.final_state.balance,
                    pnl = %summary.final_state.session_pnl(),
                    "Session ended"
                );
            }
            Err(err) => tracing::error!(error = %err, "Session failed"),
        }
        outcome
    }

    /// Read-only view for dashboards
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            stage: self.stage,
            phase: self.risk.phase(self.clock),
            risk: self.risk.snapshot(),
            daily_loss_remaining: self.risk.daily_loss_remaining(),
            drawdown_remaining: self.risk.drawdown_remaining(),
            cooldown_remaining_secs: self.risk.cooldown_remaining(self.clock).num_seconds(),
            even_frequency: self.window.even_frequency(),
            last_tick: self.window.latest().cloned(),
            validation: self.validation.clone(),
            last_decision: self.last_decision.clone(),
            ticks_processed: self.ticks_processed,
            timestamp: self.clock,
        }
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    async fn run_session(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<SessionSummary, EngineError> {
        let balance = self.exchange.get_balance().await?;
        self.clock = Utc::now();
        self.risk.start_session(balance, self.clock);
        telemetry::record_risk_state(self.risk.state());

        let validation = self.validate();
        if !validation.has_edge {
            if !self.config.engine.trade_without_edge {
                return Err(EngineError::NoEdge {
                    win_rate: validation.win_rate,
                    ci_lower: validation.confidence_interval_lower,
                    trials: validation.total_trades,
                });
            }
            tracing::warn!(
                win_rate = validation.win_rate,
                ci_lower = validation.confidence_interval_lower,
                "No statistical edge, trading anyway"
            );
        }

        let symbol = self.config.feed.symbol.clone();
        let mut ticks = self.exchange.subscribe(&symbol).await?;
        let tick_timeout = Duration::from_secs(self.config.feed.tick_timeout_secs);
        self.stage = EngineStage::Trading;
        tracing::info!(%symbol, %balance, "Trading started");

        let stop = loop {
            if *shutdown.borrow() {
                break StopReason::Shutdown;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break StopReason::Shutdown;
                    }
                }
                next = tokio::time::timeout(tick_timeout, ticks.recv()) => {
                    let tick = match next {
                        Ok(Some(tick)) => tick,
                        Ok(None) => return Err(EngineError::FeedClosed),
                        Err(_) => return Err(EngineError::FeedStalled(tick_timeout)),
                    };
                    if let Some(reason) = self.on_tick(tick).await? {
                        break StopReason::Halted(reason);
                    }
                }
            }
        };

        self.emit_status();

        Ok(SessionSummary {
            stop,
            validation,
            final_state: self.risk.snapshot(),
            ticks_processed: self.ticks_processed,
            signals: self.signals,
            vetoes: self.vetoes,
        })
    }

    fn validate(&mut self) -> ValidationResult {
        self.stage = EngineStage::Validating;
        let bt = &self.config.backtest;
        tracing::info!(
            min_samples = bt.min_samples,
            confidence_level = bt.confidence_level,
            seed = bt.seed,
            "Validating signal edge"
        );

        let result = self.validator.validate(
            &self.generator,
            bt.min_samples,
            bt.confidence_level,
            self.config.execution.payout_ratio,
            bt.seed,
        );
        self.validation = Some(result.clone());
        result
    }

    /// Process one tick; returns the halt reason when the session must stop
    async fn on_tick(&mut self, tick: TickSample) -> Result<Option<HaltReason>, EngineError> {
        let now = tick.timestamp;
        self.clock = now;
        self.ticks_processed += 1;
        self.roll_day(now);
        self.window.push(tick);

        if self.status_due(now) {
            self.emit_status();
        }

        let Some(decision) = self.generator.generate(&self.window) else {
            return Ok(None);
        };
        self.signals += 1;
        self.last_decision = Some(decision.clone());

        if let Some(last) = self.last_trade_at {
            let spacing = chrono::Duration::seconds(self.config.engine.min_trade_interval_secs as i64);
            if now - last < spacing {
                tracing::debug!(since_last = %(now - last), "Signal skipped, trade spacing");
                return Ok(None);
            }
        }

        let trade = match self.risk.evaluate(&decision, now) {
            Ok(trade) => trade,
            Err(violation) => {
                self.vetoes += 1;
                telemetry::record_veto(violation.label());
                if let Some(reason) = violation.halt_reason() {
                    tracing::error!(%violation, "Trade vetoed, session halted");
                    return Ok(Some(reason));
                }
                tracing::info!(%violation, "Trade vetoed");
                return Ok(None);
            }
        };

        tracing::info!(
            direction = %trade.direction,
            stake = %trade.stake,
            confidence = %decision.confidence,
            even_frequency = %decision.even_frequency,
            "Placing trade"
        );

        let result = self.execute(&trade, now).await?;
        let state = self.risk.record_result(&result, now);
        self.last_trade_at = Some(now);

        telemetry::record_trade(result.outcome);
        telemetry::record_risk_state(&state);
        tracing::info!(
            outcome = %result.outcome,
            pnl = %result.pnl,
            balance = %state.balance,
            streak = state.loss_streak,
            "Trade settled"
        );

        Ok(state.halt_reason)
    }

    /// Place a trade with per-attempt timeout and bounded retries
    async fn execute(
        &mut self,
        trade: &ApprovedTrade,
        now: DateTime<Utc>,
    ) -> Result<TradeResult, EngineError> {
        let timeout = Duration::from_secs(self.config.execution.trade_timeout_secs);
        let max_attempts = self.config.execution.max_attempts;
        let mut backoff = ExponentialBackoff::from_config(&self.config.execution);

        for attempt in 1..=max_attempts {
            let started = Instant::now();
            let placed = tokio::time::timeout(
                timeout,
                self.exchange.place_trade(trade.direction, trade.stake),
            )
            .await;

            match placed {
                Ok(Ok(result)) => {
                    telemetry::record_latency(LatencyMetric::TradePlacement, started.elapsed());
                    return Ok(result);
                }
                // The contract may be live; retrying could double the exposure
                Err(_) | Ok(Err(ExecutionError::Timeout(_))) => {
                    return Err(self.record_unresolved(trade, now));
                }
                Ok(Err(err)) if attempt < max_attempts => {
                    let delay = backoff.next_delay();
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        error = %err,
                        ?delay,
                        "Trade placement failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                // Placement state is unknown after the last failure
                Ok(Err(err)) => {
                    tracing::error!(attempt, error = %err, "Trade placement failed, giving up");
                    self.record_assumed_loss(trade, now);
                    return Err(EngineError::Execution(err));
                }
            }
        }

        Err(EngineError::Execution(ExecutionError::Protocol(
            "no placement attempts configured".to_string(),
        )))
    }

    fn record_unresolved(&mut self, trade: &ApprovedTrade, now: DateTime<Utc>) -> EngineError {
        self.record_assumed_loss(trade, now);
        EngineError::UnresolvedTrade {
            direction: trade.direction,
            stake: trade.stake,
        }
    }

    /// Book the full stake as lost when the exchange never confirmed an outcome
    fn record_assumed_loss(&mut self, trade: &ApprovedTrade, now: DateTime<Utc>) {
        let result = TradeResult::assumed_loss(trade, self.risk.state().balance);
        let state = self.risk.record_result(&result, now);
        self.last_trade_at = Some(now);
        telemetry::record_trade(TradeOutcome::Loss);
        telemetry::record_risk_state(&state);
        tracing::error!(
            direction = %trade.direction,
            stake = %trade.stake,
            balance = %state.balance,
            "Trade outcome unresolved, recorded as loss"
        );
    }

    fn roll_day(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        match self.current_day {
            Some(day) if day == today => {}
            Some(_) => {
                self.risk.start_new_day(now);
                self.current_day = Some(today);
            }
            None => self.current_day = Some(today),
        }
    }

    fn status_due(&self, now: DateTime<Utc>) -> bool {
        let interval = chrono::Duration::seconds(self.config.engine.status_interval_secs as i64);
        self.last_status_at
            .map_or(true, |last| now - last >= interval)
    }

    fn emit_status(&mut self) {
        self.last_status_at = Some(self.clock);
        tracing::info!("{}", telemetry::render_status(&self.snapshot()));
    }
}
