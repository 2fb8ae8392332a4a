//! End-to-end integration tests

use parity_bot::config::Config;
use parity_bot::engine::{EngineError, EngineStage, Orchestrator, StopReason};
use parity_bot::execution::{ExchangeClient, PaperExchange};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const EXAMPLE: &str = include_str!("../../config.toml.example");

fn fast_config() -> Config {
    let mut config = Config::from_toml(EXAMPLE).unwrap();
    config.backtest.min_samples = 200;
    config.engine.min_trade_interval_secs = 0;
    config.engine.status_interval_secs = 3600;
    config
}

#[test]
fn test_config_example_loads() {
    let config = Config::from_toml(EXAMPLE).unwrap();
    assert_eq!(config.feed.symbol, "R_50");
    assert_eq!(config.risk.loss_streak_threshold, 3);
    assert!(!config.engine.trade_without_edge);
}

#[tokio::test]
async fn test_paper_session_until_shutdown() {
    let mut config = fast_config();
    config.engine.trade_without_edge = true;

    let exchange = Arc::new(
        PaperExchange::from_config(&config).with_tick_interval(Duration::from_millis(1)),
    );
    let mut engine = Orchestrator::new(&config, exchange.clone());

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let _ = tx.send(true);
    });

    let summary = engine.run(rx).await.unwrap();
    assert!(matches!(
        summary.stop,
        StopReason::Shutdown | StopReason::Halted(_)
    ));
    assert!(summary.ticks_processed > 0);

    // Every settled paper trade was recorded by the risk gate
    let history = exchange.history().await;
    assert_eq!(summary.final_state.trades as usize, history.len());
    assert_eq!(
        summary.final_state.balance,
        exchange.get_balance().await.unwrap()
    );
    for trade in &history {
        assert!(trade.stake >= dec!(0.35));
        assert!(trade.stake <= dec!(5));
    }

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.stage, EngineStage::Stopped);
    assert!(snapshot.validation.is_some());
}

#[tokio::test]
async fn test_paper_session_refuses_without_edge() {
    let mut config = fast_config();
    // Below 95% confidence an edge is never declared
    config.backtest.confidence_level = 0.90;

    let exchange = Arc::new(PaperExchange::from_config(&config));
    let mut engine = Orchestrator::new(&config, exchange.clone());
    let (_tx, rx) = watch::channel(false);

    let err = engine.run(rx).await.unwrap_err();
    assert!(matches!(err, EngineError::NoEdge { .. }));
    assert!(exchange.history().await.is_empty());
    assert_eq!(
        exchange.get_balance().await.unwrap(),
        config.execution.paper_starting_balance
    );
}

#[test]
fn test_dashboard_renders_engine_snapshot() {
    let config = fast_config();
    let engine = Orchestrator::new(&config, Arc::new(PaperExchange::from_config(&config)));
    let out = parity_bot::telemetry::render_status(&engine.snapshot());
    assert!(out.contains("Stage:            IDLE"));
    assert!(out.contains("Edge:             pending"));
}
