//! Risk gate state machine
//!
//! The manager exclusively owns [`RiskState`]. `evaluate` either sizes an
//! approved trade or vetoes it; `record_result` folds a settled trade back
//! into the state. Halt conditions are checked before stake sizing so a
//! stopped session never gets an approval.
//!
//! Cooldown expiry is lazy: there is no timer, the deadline is compared
//! against `now` on the next `evaluate`.

use super::{HaltReason, RiskLimits, RiskPhase, RiskViolation, StakeSizer};
use crate::config::RiskConfig;
use crate::execution::{ApprovedTrade, TradeOutcome, TradeResult};
use crate::signal::TradeDecision;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mutable session state owned by the risk manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskState {
    /// Current account balance
    pub balance: Decimal,
    /// Highest balance seen this session
    pub session_peak_balance: Decimal,
    /// Balance at the start of the current day
    pub daily_start_balance: Decimal,
    /// Accumulated P&L since the start of the day
    pub daily_pnl: Decimal,
    /// Consecutive losses
    pub loss_streak: u32,
    /// Cooldown deadline, if one is pending
    pub cooldown_until: Option<DateTime<Utc>>,
    /// Set once the session is halted; never cleared
    pub halt_reason: Option<HaltReason>,
    /// Balance when the session started
    pub starting_balance: Decimal,
    /// Trades recorded this session
    pub trades: u64,
    pub wins: u64,
    pub losses: u64,
}

impl RiskState {
    /// Fresh state for a session starting at `balance`
    pub fn new(balance: Decimal) -> Self {
        Self {
            balance,
            session_peak_balance: balance,
            daily_start_balance: balance,
            daily_pnl: Decimal::ZERO,
            loss_streak: 0,
            cooldown_until: None,
            halt_reason: None,
            starting_balance: balance,
            trades: 0,
            wins: 0,
            losses: 0,
        }
    }

    /// Relative decline from the session peak
    pub fn drawdown(&self) -> Decimal {
        if self.session_peak_balance <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.session_peak_balance - self.balance) / self.session_peak_balance
    }

    /// Session P&L since start
    pub fn session_pnl(&self) -> Decimal {
        self.balance - self.starting_balance
    }

    /// Share of recorded trades that won
    pub fn win_rate(&self) -> Option<Decimal> {
        if self.trades == 0 {
            return None;
        }
        Some(Decimal::from(self.wins) / Decimal::from(self.trades))
    }
}

/// Stateful risk gate for one trading session
pub struct RiskManager {
    limits: RiskLimits,
    sizer: StakeSizer,
    loss_streak_threshold: u32,
    cooldown: Duration,
    state: RiskState,
}

impl RiskManager {
    /// Create a manager for a session starting at `starting_balance`
    pub fn new(config: &RiskConfig, starting_balance: Decimal) -> Self {
        tracing::info!(
            balance = %starting_balance,
            floor = %config.balance_floor,
            ceiling = %config.balance_ceiling,
            "Risk manager initialized"
        );
        Self {
            limits: RiskLimits::from_config(config),
            sizer: StakeSizer::from_config(config),
            loss_streak_threshold: config.loss_streak_threshold,
            cooldown: Duration::minutes(config.cooldown_minutes as i64),
            state: RiskState::new(starting_balance),
        }
    }

    /// Reset the state for a new session at `balance`
    pub fn start_session(&mut self, balance: Decimal, now: DateTime<Utc>) {
        tracing::info!(%balance, started = %now, "Risk session started");
        self.state = RiskState::new(balance);
    }

    /// Approve and size a trade, or veto it
    pub fn evaluate(
        &mut self,
        decision: &TradeDecision,
        now: DateTime<Utc>,
    ) -> Result<ApprovedTrade, RiskViolation> {
        if let Some(reason) = self.state.halt_reason {
            return Err(RiskViolation::AlreadyHalted(reason));
        }

        if let Some(until) = self.state.cooldown_until {
            if now < until {
                return Err(RiskViolation::InCooldown { until });
            }
            tracing::info!(%until, "Cooldown expired");
            self.state.cooldown_until = None;
        }

        if let Some(reason) = self.limits.check(&self.state) {
            self.halt(reason);
            return Err(RiskViolation::Halted(reason));
        }

        let stake = self.sizer.stake_for(self.state.balance);
        if stake > self.state.balance {
            return Err(RiskViolation::InsufficientBalance {
                stake,
                balance: self.state.balance,
            });
        }

        tracing::debug!(
            direction = %decision.direction,
            confidence = %decision.confidence,
            %stake,
            "Trade approved"
        );

        Ok(ApprovedTrade {
            direction: decision.direction,
            stake,
        })
    }

    /// Fold a trade result into the state and return the updated snapshot
    pub fn record_result(&mut self, result: &TradeResult, now: DateTime<Utc>) -> RiskState {
        let state = &mut self.state;
        state.balance = result.resulting_balance;
        if state.balance > state.session_peak_balance {
            state.session_peak_balance = state.balance;
        }
        state.daily_pnl += result.pnl;
        state.trades += 1;

        match result.outcome {
            TradeOutcome::Win => {
                state.wins += 1;
                state.loss_streak = 0;
            }
            TradeOutcome::Loss => {
                state.losses += 1;
                state.loss_streak += 1;
                tracing::warn!(
                    streak = state.loss_streak,
                    pnl = %result.pnl,
                    "Loss recorded"
                );

                if state.loss_streak >= self.loss_streak_threshold {
                    let until = now + self.cooldown;
                    state.cooldown_until = Some(until);
                    tracing::warn!(
                        streak = state.loss_streak,
                        minutes = self.cooldown.num_minutes(),
                        %until,
                        "Cooldown triggered"
                    );
                }
            }
        }

        if state.halt_reason.is_none() {
            if let Some(reason) = self.limits.check(&self.state) {
                self.halt(reason);
            }
        }

        self.state.clone()
    }

    /// Roll the daily counters at a day boundary
    pub fn start_new_day(&mut self, now: DateTime<Utc>) {
        self.state.daily_start_balance = self.state.balance;
        self.state.daily_pnl = Decimal::ZERO;
        tracing::info!(
            day = %now.date_naive(),
            daily_start_balance = %self.state.daily_start_balance,
            "Daily limits reset"
        );
    }

    /// Current gate phase
    pub fn phase(&self, now: DateTime<Utc>) -> RiskPhase {
        if let Some(reason) = self.state.halt_reason {
            return RiskPhase::Halted(reason);
        }
        match self.state.cooldown_until {
            Some(until) if now < until => RiskPhase::Cooldown { until },
            _ => RiskPhase::Active,
        }
    }

    /// Read-only copy of the state
    pub fn snapshot(&self) -> RiskState {
        self.state.clone()
    }

    pub fn state(&self) -> &RiskState {
        &self.state
    }

    /// Loss still allowed today before the daily cap halts the session
    pub fn daily_loss_remaining(&self) -> Decimal {
        let cap = self.limits.daily_loss_cap_frac * self.state.daily_start_balance;
        (cap + self.state.daily_pnl).max(Decimal::ZERO)
    }

    /// Further decline from the current balance before the drawdown stop halts the session
    pub fn drawdown_remaining(&self) -> Decimal {
        let stop_at =
            self.state.session_peak_balance * (Decimal::ONE - self.limits.drawdown_stop_frac);
        (self.state.balance - stop_at).max(Decimal::ZERO)
    }

    /// Time left in the current cooldown
    pub fn cooldown_remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.state.cooldown_until {
            Some(until) if now < until => until - now,
            _ => Duration::zero(),
        }
    }

    fn halt(&mut self, reason: HaltReason) {
        tracing::error!(
            %reason,
            balance = %self.state.balance,
            peak = %self.state.session_peak_balance,
            daily_pnl = %self.state.daily_pnl,
            "Trading halted"
        );
        self.state.halt_reason = Some(reason);
    }
}
