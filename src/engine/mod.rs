//! Trading engine module
//!
//! Sequences validation, signal generation, risk gating, and execution for
//! one trading session

mod orchestrator;
mod types;

pub use orchestrator::Orchestrator;
pub use types::{EngineError, EngineSnapshot, EngineStage, SessionSummary, StopReason};
