//! parity-bot: Odd/even digit-parity trading bot
//!
//! This library provides the core components for:
//! - Tick samples and a seeded synthetic tick stream
//! - Frequency-bias signal generation with a volatility filter
//! - Backtest validation of the signal's statistical edge
//! - Risk gating: stake sizing, halt limits, loss-streak cooldown
//! - Exchange abstraction with a bundled paper exchange
//! - Session orchestration with retries and graceful shutdown
//! - Logging, Prometheus metrics, and a console dashboard

pub mod backtest;
pub mod cli;
pub mod config;
pub mod engine;
pub mod execution;
pub mod feed;
pub mod risk;
pub mod signal;
pub mod telemetry;
