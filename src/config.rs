//! Configuration types for parity-bot
//!
//! One immutable [`Config`] value is loaded and validated at startup, then
//! passed by reference into every component constructor.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deepest pip position a quote may be read at
pub const MAX_PIP_DECIMALS: u32 = 10;
/// Upper bound for the loss-streak cooldown (one week)
pub const MAX_COOLDOWN_MINUTES: u64 = 7 * 24 * 60;
/// Upper bound for timeouts and engine intervals (one day)
pub const MAX_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// File could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its allowed range
    #[error("Invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub feed: FeedConfig,
    pub signal: SignalConfig,
    pub backtest: BacktestConfig,
    pub risk: RiskConfig,
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Tick feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub symbol: String,
    /// Decimal places of the digit that decides parity
    pub pip_decimals: u32,
    /// Maximum wait for the next tick before the feed is considered stalled
    pub tick_timeout_secs: u64,
}

/// Signal generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    pub min_confidence_threshold: Decimal,
    pub frequency_bias_threshold: Decimal,
    pub volatility_threshold: Decimal,
    pub lookback_window: usize,
    #[serde(default)]
    pub volatility_estimator: VolatilityEstimator,
}

/// Rolling statistic used by the volatility filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityEstimator {
    /// Standard deviation of quotes divided by their mean
    #[default]
    CoefficientOfVariation,
    /// Standard deviation of tick-to-tick simple returns
    ReturnStdDev,
}

/// Backtest validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub min_samples: usize,
    pub confidence_level: f64,
    /// Synthetic tick budget; guarantees termination when signals are rare
    pub max_ticks: usize,
    pub seed: u64,
}

/// Risk management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    pub max_stake_frac: Decimal,
    pub min_stake: Decimal,
    pub max_single_stake_cap: Decimal,
    pub balance_floor: Decimal,
    pub balance_ceiling: Decimal,
    pub daily_loss_cap_frac: Decimal,
    pub drawdown_stop_frac: Decimal,
    pub loss_streak_threshold: u32,
    pub cooldown_minutes: u64,
}

/// Execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Gross payout per unit stake on a win (stake included)
    pub payout_ratio: Decimal,
    pub trade_timeout_secs: u64,
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
    #[serde(default)]
    pub paper_seed: u64,
    #[serde(default = "default_paper_starting_balance")]
    pub paper_starting_balance: Decimal,
}

fn default_backoff_base_ms() -> u64 {
    500
}
fn default_backoff_max_ms() -> u64 {
    8_000
}
fn default_paper_starting_balance() -> Decimal {
    dec!(10)
}

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Proceed to trading even when validation finds no edge
    #[serde(default)]
    pub trade_without_edge: bool,

    /// Minimum spacing between consecutive trades
    #[serde(default = "default_min_trade_interval")]
    pub min_trade_interval_secs: u64,

    /// How often the status dashboard is emitted
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: u64,
}

fn default_min_trade_interval() -> u64 {
    30
}
fn default_status_interval() -> u64 {
    60
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trade_without_edge: false,
            min_trade_interval_secs: 30,
            status_interval_secs: 60,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; no exporter when absent
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every threshold against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "feed.pip_decimals",
            self.feed.pip_decimals <= MAX_PIP_DECIMALS,
            &format!("must be at most {}", MAX_PIP_DECIMALS),
        )?;
        check_interval("feed.tick_timeout_secs", self.feed.tick_timeout_secs)?;

        let s = &self.signal;
        check_unit_open("signal.frequency_bias_threshold", s.frequency_bias_threshold)?;
        check_range(
            "signal.min_confidence_threshold",
            s.min_confidence_threshold >= Decimal::ZERO && s.min_confidence_threshold <= Decimal::ONE,
            "must be within [0, 1]",
        )?;
        check_range(
            "signal.volatility_threshold",
            s.volatility_threshold > Decimal::ZERO,
            "must be positive",
        )?;
        check_range(
            "signal.lookback_window",
            s.lookback_window >= 2,
            "must be at least 2",
        )?;

        let b = &self.backtest;
        check_range("backtest.min_samples", b.min_samples > 0, "must be positive")?;
        check_range(
            "backtest.confidence_level",
            b.confidence_level > 0.0 && b.confidence_level < 1.0,
            "must be within (0, 1)",
        )?;
        check_range(
            "backtest.max_ticks",
            b.max_ticks >= b.min_samples,
            "must be at least min_samples",
        )?;

        let r = &self.risk;
        check_unit_open("risk.max_stake_frac", r.max_stake_frac)?;
        check_unit_open("risk.daily_loss_cap_frac", r.daily_loss_cap_frac)?;
        check_unit_open("risk.drawdown_stop_frac", r.drawdown_stop_frac)?;
        check_range("risk.min_stake", r.min_stake > Decimal::ZERO, "must be positive")?;
        check_range(
            "risk.max_single_stake_cap",
            r.max_single_stake_cap >= r.min_stake,
            "must be at least min_stake",
        )?;
        check_range(
            "risk.balance_floor",
            r.balance_floor >= Decimal::ZERO,
            "must not be negative",
        )?;
        check_range(
            "risk.balance_ceiling",
            r.balance_ceiling > r.balance_floor,
            "must exceed balance_floor",
        )?;
        check_range(
            "risk.loss_streak_threshold",
            r.loss_streak_threshold > 0,
            "must be positive",
        )?;
        check_range(
            "risk.cooldown_minutes",
            r.cooldown_minutes <= MAX_COOLDOWN_MINUTES,
            &format!("must be at most {}", MAX_COOLDOWN_MINUTES),
        )?;

        let e = &self.execution;
        check_range(
            "execution.payout_ratio",
            e.payout_ratio > Decimal::ONE,
            "must exceed 1",
        )?;
        check_range(
            "execution.max_attempts",
            e.max_attempts > 0,
            "must be positive",
        )?;
        check_interval("execution.trade_timeout_secs", e.trade_timeout_secs)?;
        check_range(
            "execution.backoff_max_ms",
            e.backoff_max_ms <= MAX_INTERVAL_SECS * 1000,
            "must be at most one day",
        )?;

        let g = &self.engine;
        check_range(
            "engine.min_trade_interval_secs",
            g.min_trade_interval_secs <= MAX_INTERVAL_SECS,
            "must be at most one day",
        )?;
        check_range(
            "engine.status_interval_secs",
            g.status_interval_secs <= MAX_INTERVAL_SECS,
            "must be at most one day",
        )?;

        Ok(())
    }
}

fn check_range(field: &'static str, ok: bool, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        })
    }
}

/// Positive and no longer than a day
fn check_interval(field: &'static str, secs: u64) -> Result<(), ConfigError> {
    check_range(
        field,
        secs > 0 && secs <= MAX_INTERVAL_SECS,
        "must be within 1 second and one day",
    )
}

fn check_unit_open(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    check_range(
        field,
        value > Decimal::ZERO && value < Decimal::ONE,
        "must be within (0, 1)",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
        [feed]
        symbol = "R_50"
        pip_decimals = 4
        tick_timeout_secs = 10

        [signal]
        min_confidence_threshold = 0.55
        frequency_bias_threshold = 0.15
        volatility_threshold = 0.02
        lookback_window = 20

        [backtest]
        min_samples = 1000
        confidence_level = 0.95
        max_ticks = 200000
        seed = 42

        [risk]
        max_stake_frac = 0.02
        min_stake = 0.35
        max_single_stake_cap = 5.0
        balance_floor = 5.0
        balance_ceiling = 10000.0
        daily_loss_cap_frac = 0.10
        drawdown_stop_frac = 0.15
        loss_streak_threshold = 3
        cooldown_minutes = 10

        [execution]
        payout_ratio = 1.9
        trade_timeout_secs = 15
        max_attempts = 3
    "#;

    #[test]
    fn test_config_deserialize() {
        let config = Config::from_toml(EXAMPLE).unwrap();
        assert_eq!(config.feed.symbol, "R_50");
        assert_eq!(config.signal.lookback_window, 20);
        assert_eq!(config.risk.min_stake, dec!(0.35));
        assert_eq!(
            config.signal.volatility_estimator,
            VolatilityEstimator::CoefficientOfVariation
        );
    }

    #[test]
    fn test_optional_sections_default() {
        let config = Config::from_toml(EXAMPLE).unwrap();
        assert!(!config.engine.trade_without_edge);
        assert_eq!(config.engine.min_trade_interval_secs, 30);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
        assert!(config.telemetry.metrics_port.is_none());
        assert_eq!(config.execution.backoff_base_ms, 500);
        assert_eq!(config.execution.paper_starting_balance, dec!(10));
    }

    #[test]
    fn test_volatility_estimator_snake_case() {
        let toml = EXAMPLE.replace(
            "lookback_window = 20",
            "lookback_window = 20\nvolatility_estimator = \"return_std_dev\"",
        );
        let config = Config::from_toml(&toml).unwrap();
        assert_eq!(
            config.signal.volatility_estimator,
            VolatilityEstimator::ReturnStdDev
        );
    }

    #[test]
    fn test_missing_threshold_is_parse_error() {
        let toml = EXAMPLE.replace("drawdown_stop_frac = 0.15", "");
        let err = Config::from_toml(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_min_stake_above_cap_rejected() {
        let toml = EXAMPLE.replace("max_single_stake_cap = 5.0", "max_single_stake_cap = 0.20");
        let err = Config::from_toml(&toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "risk.max_single_stake_cap",
                ..
            }
        ));
    }

    #[test]
    fn test_fraction_out_of_range_rejected() {
        let toml = EXAMPLE.replace("max_stake_frac = 0.02", "max_stake_frac = 1.5");
        let err = Config::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("risk.max_stake_frac"));
    }

    #[test]
    fn test_payout_ratio_must_exceed_one() {
        let toml = EXAMPLE.replace("payout_ratio = 1.9", "payout_ratio = 0.95");
        assert!(Config::from_toml(&toml).is_err());
    }

    #[test]
    fn test_floor_must_be_below_ceiling() {
        let toml = EXAMPLE.replace("balance_ceiling = 10000.0", "balance_ceiling = 4.0");
        assert!(Config::from_toml(&toml).is_err());
    }

    #[test]
    fn test_tick_budget_must_cover_min_samples() {
        let toml = EXAMPLE.replace("max_ticks = 200000", "max_ticks = 10");
        assert!(Config::from_toml(&toml).is_err());
    }

    fn rejected_field(toml: &str) -> &'static str {
        match Config::from_toml(toml) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected a range error, got {:?}", other),
        }
    }

    #[test]
    fn test_pip_decimals_bounded() {
        let toml = EXAMPLE.replace("pip_decimals = 4", "pip_decimals = 29");
        assert_eq!(rejected_field(&toml), "feed.pip_decimals");

        let toml = EXAMPLE.replace("pip_decimals = 4", "pip_decimals = 10");
        assert!(Config::from_toml(&toml).is_ok());
    }

    #[test]
    fn test_cooldown_bounded() {
        let toml = EXAMPLE.replace("cooldown_minutes = 10", "cooldown_minutes = 1000000000000000");
        assert_eq!(rejected_field(&toml), "risk.cooldown_minutes");
    }

    #[test]
    fn test_engine_intervals_bounded() {
        let with_engine = |body: &str| format!("{}\n[engine]\n{}\n", EXAMPLE, body);

        let toml = with_engine("min_trade_interval_secs = 9223372036854775807");
        assert_eq!(rejected_field(&toml), "engine.min_trade_interval_secs");

        let toml = with_engine("status_interval_secs = 9223372036854775807");
        assert_eq!(rejected_field(&toml), "engine.status_interval_secs");

        let toml = with_engine("min_trade_interval_secs = 86400\nstatus_interval_secs = 86400");
        assert!(Config::from_toml(&toml).is_ok());
    }

    #[test]
    fn test_timeouts_bounded() {
        let toml = EXAMPLE.replace("tick_timeout_secs = 10", "tick_timeout_secs = 0");
        assert_eq!(rejected_field(&toml), "feed.tick_timeout_secs");

        let toml = EXAMPLE.replace("trade_timeout_secs = 15", "trade_timeout_secs = 100000");
        assert_eq!(rejected_field(&toml), "execution.trade_timeout_secs");
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, EXAMPLE).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.backtest.seed, 42);
    }
}
