//! Signal types

use crate::feed::Parity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A directional parity bet proposed by the signal generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDecision {
    /// Parity to bet on
    pub direction: Parity,
    /// Confidence score (0.0 to 1.0)
    pub confidence: Decimal,
    /// Observed share of EVEN ticks in the window
    pub even_frequency: Decimal,
    /// |even_frequency - 0.5|
    pub deviation: Decimal,
    /// Volatility reading that passed the filter
    pub volatility: Decimal,
}

/// Why the generator produced no decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoSignalReason {
    /// Window not yet full
    WarmingUp { have: usize, need: usize },
    /// Volatility above threshold
    HighVolatility(Decimal),
    /// Parity frequencies too close to 50/50
    NoBias(Decimal),
    /// Confidence below the configured minimum
    LowConfidence(Decimal),
}

impl std::fmt::Display for NoSignalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoSignalReason::WarmingUp { have, need } => {
                write!(f, "insufficient data: {}/{}", have, need)
            }
            NoSignalReason::HighVolatility(v) => write!(f, "high volatility: {:.4}", v),
            NoSignalReason::NoBias(d) => write!(f, "no significant bias: {:.3}", d),
            NoSignalReason::LowConfidence(c) => write!(f, "low confidence: {:.3}", c),
        }
    }
}
