//! Tick feed module
//!
//! Tick samples, digit parity, and a seeded synthetic tick source

mod synthetic;
mod types;

pub use synthetic::SyntheticTicks;
pub use types::{pip_digit, Parity, TickSample};
