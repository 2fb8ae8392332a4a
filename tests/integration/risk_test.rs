//! Risk gate integration tests

use chrono::{Duration, TimeZone, Utc};
use parity_bot::config::Config;
use parity_bot::execution::{TradeOutcome, TradeResult};
use parity_bot::feed::Parity;
use parity_bot::risk::{HaltReason, RiskManager, RiskPhase, RiskViolation};
use parity_bot::signal::TradeDecision;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const EXAMPLE: &str = include_str!("../../config.toml.example");

fn decision() -> TradeDecision {
    TradeDecision {
        direction: Parity::Odd,
        confidence: dec!(0.72),
        even_frequency: dec!(0.8),
        deviation: dec!(0.3),
        volatility: dec!(0.0005),
    }
}

fn settle(outcome: TradeOutcome, stake: Decimal, balance: Decimal) -> TradeResult {
    let pnl = match outcome {
        TradeOutcome::Win => (stake * dec!(0.9)).round_dp(2),
        TradeOutcome::Loss => -stake,
    };
    TradeResult {
        contract_id: None,
        direction: Parity::Odd,
        stake,
        outcome,
        pnl,
        resulting_balance: balance + pnl,
        settled: true,
        timestamp: Utc::now(),
    }
}

#[test]
fn test_three_losses_then_cooldown_then_resume() {
    let config = Config::from_toml(EXAMPLE).unwrap();
    let mut rm = RiskManager::new(&config.risk, dec!(100));
    let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

    for _ in 0..3 {
        let trade = rm.evaluate(&decision(), t0).unwrap();
        let balance = rm.state().balance;
        rm.record_result(&settle(TradeOutcome::Loss, trade.stake, balance), t0);
    }
    assert!(matches!(rm.phase(t0), RiskPhase::Cooldown { .. }));

    let err = rm.evaluate(&decision(), t0 + Duration::minutes(5)).unwrap_err();
    assert!(matches!(err, RiskViolation::InCooldown { .. }));

    let trade = rm.evaluate(&decision(), t0 + Duration::minutes(11)).unwrap();
    assert!(trade.stake > Decimal::ZERO);
}

#[test]
fn test_drawdown_halt_is_permanent() {
    let config = Config::from_toml(EXAMPLE).unwrap();
    let mut rm = RiskManager::new(&config.risk, dec!(100));
    let now = Utc::now();

    let state = rm.record_result(&settle(TradeOutcome::Loss, dec!(16), dec!(100)), now);
    assert_eq!(state.halt_reason, Some(HaltReason::Drawdown));

    for hours in 0..48 {
        let later = now + Duration::hours(hours);
        if hours % 24 == 0 {
            rm.start_new_day(later);
        }
        assert!(rm.evaluate(&decision(), later).is_err());
    }
}

#[test]
fn test_invariants_hold_over_random_session() {
    let config = Config::from_toml(EXAMPLE).unwrap();
    let risk = &config.risk;
    let mut rm = RiskManager::new(risk, dec!(100));
    let mut rng = StdRng::seed_from_u64(2024);
    let mut now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let mut halted = false;

    for _ in 0..5000 {
        now += Duration::minutes(1);
        match rm.evaluate(&decision(), now) {
            Ok(trade) => {
                assert!(!halted, "approval after halt");
                let balance = rm.state().balance;
                assert!(trade.stake >= risk.min_stake);
                assert!(trade.stake <= risk.max_single_stake_cap);
                assert!(trade.stake <= balance);

                let outcome = if rng.gen_bool(0.45) {
                    TradeOutcome::Win
                } else {
                    TradeOutcome::Loss
                };
                let state = rm.record_result(&settle(outcome, trade.stake, balance), now);
                assert!(state.session_peak_balance >= state.balance);
                halted |= state.halt_reason.is_some();
            }
            Err(violation) => {
                halted |= violation.halt_reason().is_some();
            }
        }
    }

    assert!(halted, "a losing session should eventually halt");
}
