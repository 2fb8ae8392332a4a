//! Frequency-bias signal generation
//!
//! Mean-reversion on digit parity: when one parity is over-represented in the
//! recent window, bet on the other one. A volatility filter runs first and
//! suppresses every signal while the market is moving too much.

use super::volatility;
use super::{NoSignalReason, TickWindow, TradeDecision};
use crate::config::SignalConfig;
use crate::feed::Parity;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Confidence never exceeds this before the uncertainty haircut
const MAX_RAW_CONFIDENCE: Decimal = dec!(0.8);
/// Haircut applied to every confidence score
const CONFIDENCE_HAIRCUT: Decimal = dec!(0.9);

/// Stateless signal generator; the window is owned by the caller
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    config: SignalConfig,
}

impl SignalGenerator {
    /// Create a generator from signal configuration
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Number of ticks needed before a signal can be produced
    pub fn lookback(&self) -> usize {
        self.config.lookback_window
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Produce a decision for the current window, if any
    pub fn generate(&self, window: &TickWindow) -> Option<TradeDecision> {
        match self.evaluate(window) {
            Ok(decision) => Some(decision),
            Err(reason) => {
                tracing::trace!(reason = %reason, "No signal");
                None
            }
        }
    }

    /// Like [`generate`](Self::generate) but reports why no decision was made
    pub fn evaluate(&self, window: &TickWindow) -> Result<TradeDecision, NoSignalReason> {
        let need = self.config.lookback_window;
        if window.len() < need {
            return Err(NoSignalReason::WarmingUp {
                have: window.len(),
                need,
            });
        }

        let quotes = window.quotes();
        let vol = volatility::estimate(self.config.volatility_estimator, &quotes);
        if vol > self.config.volatility_threshold {
            return Err(NoSignalReason::HighVolatility(vol));
        }

        let even_frequency = window.even_frequency().unwrap_or(dec!(0.5));
        let deviation = (even_frequency - dec!(0.5)).abs();
        if deviation < self.config.frequency_bias_threshold {
            return Err(NoSignalReason::NoBias(deviation));
        }

        // Bet on the under-represented parity reverting toward 50/50
        let majority = if even_frequency > dec!(0.5) {
            Parity::Even
        } else {
            Parity::Odd
        };
        let direction = majority.opposite();

        let confidence = confidence_for(deviation);
        if confidence < self.config.min_confidence_threshold {
            return Err(NoSignalReason::LowConfidence(confidence));
        }

        Ok(TradeDecision {
            direction,
            confidence,
            even_frequency,
            deviation,
            volatility: vol,
        })
    }
}

/// Confidence as a non-decreasing function of deviation, within [0, 1]
pub fn confidence_for(deviation: Decimal) -> Decimal {
    let raw = (dec!(0.5) + deviation).min(MAX_RAW_CONFIDENCE);
    (raw * CONFIDENCE_HAIRCUT).clamp(Decimal::ZERO, Decimal::ONE)
}
