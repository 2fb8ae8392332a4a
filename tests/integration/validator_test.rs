//! Backtest validation integration tests

use parity_bot::backtest::{z_score, BacktestValidator, ValidationResult};
use parity_bot::config::{Config, VolatilityEstimator};
use parity_bot::signal::SignalGenerator;
use rust_decimal_macros::dec;

const EXAMPLE: &str = include_str!("../../config.toml.example");

fn run(config: &Config, seed: u64) -> ValidationResult {
    let generator = SignalGenerator::new(&config.signal);
    BacktestValidator::from_config(config).validate(
        &generator,
        config.backtest.min_samples,
        config.backtest.confidence_level,
        config.execution.payout_ratio,
        seed,
    )
}

#[test]
fn test_same_seed_same_result() {
    let config = Config::from_toml(EXAMPLE).unwrap();
    let a = run(&config, 42);
    let b = run(&config, 42);
    assert_eq!(a, b);
    assert_eq!(a.total_trades, config.backtest.min_samples);
}

#[test]
fn test_different_seeds_differ() {
    let config = Config::from_toml(EXAMPLE).unwrap();
    assert_ne!(run(&config, 1), run(&config, 2));
}

#[test]
fn test_volatility_filter_blocks_every_trial() {
    let mut config = Config::from_toml(EXAMPLE).unwrap();
    config.signal.volatility_threshold = dec!(0.000000001);
    config.backtest.max_ticks = 2000;

    let result = run(&config, 42);
    assert_eq!(result.total_trades, 0);
    assert_eq!(result.ticks_consumed, 2000);
    assert_eq!(result.win_rate, 0.0);
    assert!(!result.has_edge);
}

#[test]
fn test_return_std_dev_estimator() {
    let mut config = Config::from_toml(EXAMPLE).unwrap();
    config.signal.volatility_estimator = VolatilityEstimator::ReturnStdDev;
    config.backtest.min_samples = 300;

    let result = run(&config, 5);
    assert_eq!(result.total_trades, 300);
}

#[test]
fn test_edge_decision_examples() {
    let edge = ValidationResult::from_counts(600, 1000, 1000, 0.95, 1.9);
    assert!(edge.has_edge);
    assert!((edge.expected_value - 0.14).abs() < 1e-9);

    let none = ValidationResult::from_counts(520, 1000, 1000, 0.95, 1.9);
    assert!(!none.has_edge);
    assert!(none.confidence_interval_lower < 0.51);
}

#[test]
fn test_z_score_at_95() {
    assert!((z_score(0.95) - 1.96).abs() < 1e-3);
}
