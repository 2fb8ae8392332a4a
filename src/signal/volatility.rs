//! Rolling volatility over a tick window

use crate::config::VolatilityEstimator;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use statrs::statistics::Statistics;

/// Fewer samples than this always read as zero volatility
pub const MIN_VOLATILITY_SAMPLES: usize = 5;

/// Estimate volatility of a quote series with the chosen statistic
///
/// Returns zero when there are too few samples, so the filter passes.
pub fn estimate(estimator: VolatilityEstimator, quotes: &[Decimal]) -> Decimal {
    if quotes.len() < MIN_VOLATILITY_SAMPLES {
        return Decimal::ZERO;
    }

    let prices: Vec<f64> = quotes.iter().filter_map(|q| q.to_f64()).collect();

    let value = match estimator {
        VolatilityEstimator::CoefficientOfVariation => coefficient_of_variation(&prices),
        VolatilityEstimator::ReturnStdDev => return_std_dev(&prices),
    };

    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn coefficient_of_variation(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let mean = prices.mean();
    if mean <= 0.0 {
        return 0.0;
    }
    prices.population_std_dev() / mean
}

fn return_std_dev(prices: &[f64]) -> f64 {
    let returns: Vec<f64> = prices
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    if returns.is_empty() {
        return 0.0;
    }
    returns.population_std_dev()
}
