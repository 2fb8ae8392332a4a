//! Prometheus metrics
//!
//! Recorded through the `metrics` facade; nothing is exported until a
//! recorder is installed.

use crate::execution::TradeOutcome;
use crate::risk::RiskState;
use rust_decimal::prelude::ToPrimitive;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Contract placement through settlement
    TradePlacement,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Account balance
    Balance,
    /// Drawdown from session peak
    DrawdownPct,
    /// Daily P&L
    DailyPnl,
    /// Consecutive losses
    LossStreak,
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::TradePlacement => "paritybot_trade_latency_ms",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::Balance => "paritybot_balance_usd",
            GaugeMetric::DrawdownPct => "paritybot_drawdown_pct",
            GaugeMetric::DailyPnl => "paritybot_daily_pnl_usd",
            GaugeMetric::LossStreak => "paritybot_loss_streak",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    metrics::histogram!(metric.name()).record(duration.as_secs_f64() * 1000.0);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}

/// Count a settled trade
pub fn record_trade(outcome: TradeOutcome) {
    let label = match outcome {
        TradeOutcome::Win => "win",
        TradeOutcome::Loss => "loss",
    };
    metrics::counter!("paritybot_trades_total", "outcome" => label).increment(1);
}

/// Count a risk veto by reason label
pub fn record_veto(reason: &'static str) {
    metrics::counter!("paritybot_vetoes_total", "reason" => reason).increment(1);
}

/// Publish every risk gauge from a state snapshot
pub fn record_risk_state(state: &RiskState) {
    set_gauge(GaugeMetric::Balance, state.balance.to_f64().unwrap_or(0.0));
    set_gauge(
        GaugeMetric::DrawdownPct,
        state.drawdown().to_f64().unwrap_or(0.0) * 100.0,
    );
    set_gauge(GaugeMetric::DailyPnl, state.daily_pnl.to_f64().unwrap_or(0.0));
    set_gauge(GaugeMetric::LossStreak, f64::from(state.loss_streak));
}
