//! Tick feed types

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parity of the last significant digit of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    /// Parity of a single digit
    pub fn of_digit(digit: u8) -> Self {
        if digit % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// The other parity
    pub fn opposite(self) -> Self {
        match self {
            Parity::Odd => Parity::Even,
            Parity::Even => Parity::Odd,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Odd => write!(f, "ODD"),
            Parity::Even => write!(f, "EVEN"),
        }
    }
}

/// A single price observation from the tick stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSample {
    /// Underlying symbol (e.g., "R_50")
    pub symbol: String,
    /// Quoted price
    pub quote: Decimal,
    /// Digit at the quote's pip precision
    pub last_digit: u8,
    /// Time the tick was observed
    pub timestamp: DateTime<Utc>,
}

impl TickSample {
    /// Build a tick from a quote, reading the digit at `pip_decimals` places
    ///
    /// Trailing zeros at the pip position are significant: a quote of
    /// `101.20` with two pip decimals has last digit 0.
    pub fn from_quote(
        symbol: impl Into<String>,
        quote: Decimal,
        pip_decimals: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quote,
            last_digit: pip_digit(quote, pip_decimals),
            timestamp,
        }
    }

    /// Parity of this tick's last digit
    pub fn parity(&self) -> Parity {
        Parity::of_digit(self.last_digit)
    }
}

/// Digit at the given number of decimal places
pub fn pip_digit(quote: Decimal, pip_decimals: u32) -> u8 {
    let scaled = (quote.abs() * Decimal::from(10u64.pow(pip_decimals))).trunc();
    let digit = scaled % Decimal::TEN;
    digit.to_u8().unwrap_or(0)
}
