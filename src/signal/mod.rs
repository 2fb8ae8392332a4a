//! Signal generation module
//!
//! Turns a rolling window of digit parities into an optional parity bet

mod generator;
mod types;
pub mod volatility;
mod window;

pub use generator::{confidence_for, SignalGenerator};
pub use types::{NoSignalReason, TradeDecision};
pub use window::TickWindow;
