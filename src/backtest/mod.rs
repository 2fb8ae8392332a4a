//! Backtesting module
//!
//! Validates the signal's statistical edge on seeded synthetic ticks before
//! any capital is risked

mod analytics;
mod validator;

pub use analytics::{z_score, ValidationResult, MIN_CI_LOWER, MIN_CONFIDENCE_LEVEL};
pub use validator::BacktestValidator;
