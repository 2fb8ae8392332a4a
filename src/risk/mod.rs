//! Risk management module
//!
//! Stake sizing, session halt limits, and the loss-streak cooldown gate

mod limits;
mod manager;
mod sizing;
mod types;

pub use limits::RiskLimits;
pub use manager::{RiskManager, RiskState};
pub use sizing::StakeSizer;
pub use types::{HaltReason, RiskPhase, RiskViolation};
