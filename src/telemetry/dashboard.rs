//! Console status dashboard
//!
//! A pure rendering of [`EngineSnapshot`]; the engine decides when to print it.

use crate::engine::EngineSnapshot;
use crate::risk::RiskPhase;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Render the status block for a snapshot
pub fn render_status(snapshot: &EngineSnapshot) -> String {
    let risk = &snapshot.risk;

    let win_rate = risk
        .win_rate()
        .map(|r| format!("{:.1}%", r * dec!(100)))
        .unwrap_or_else(|| "n/a".to_string());

    let cooldown = match snapshot.phase {
        RiskPhase::Cooldown { .. } => {
            let secs = snapshot.cooldown_remaining_secs.max(0);
            format!("{}m {:02}s", secs / 60, secs % 60)
        }
        _ => "-".to_string(),
    };

    let parity = match snapshot.even_frequency {
        Some(even) => format!(
            "even {:.0}% / odd {:.0}%",
            even * dec!(100),
            (Decimal::ONE - even) * dec!(100)
        ),
        None => "-".to_string(),
    };

    let last_tick = match &snapshot.last_tick {
        Some(t) => format!("{} (digit {}, {})", t.quote, t.last_digit, t.parity()),
        None => "-".to_string(),
    };

    let edge = match &snapshot.validation {
        Some(v) => format!(
            "{} (win {:.2}%, CI [{:.4}, {:.4}])",
            if v.has_edge { "YES" } else { "NO" },
            v.win_rate * 100.0,
            v.confidence_interval_lower,
            v.confidence_interval_upper
        ),
        None => "pending".to_string(),
    };

    let signal = match &snapshot.last_decision {
        Some(d) => format!(
            "{} @ {:.2} (even {:.0}%)",
            d.direction,
            d.confidence,
            d.even_frequency * dec!(100)
        ),
        None => "-".to_string(),
    };

    format!(
        r#"
══════════════════════════════════════════════════════
  PARITY BOT  {}  {}
══════════════════════════════════════════════════════
Stage:            {}
Phase:            {}
Balance:          {:.2} (peak {:.2})
Session P&L:      {:+.2}
Daily P&L:        {:+.2} ({:.2} left before cap)
Drawdown:         {:.2}% ({:.2} left before stop)
Trades:           {} ({} W / {} L, {})
Loss Streak:      {}
Cooldown:         {}
Edge:             {}
Window:           {}
Last Tick:        {}
Last Signal:      {}
Ticks:            {}
══════════════════════════════════════════════════════
"#,
        snapshot.timestamp.format("%Y-%m-%d"),
        snapshot.timestamp.format("%H:%M:%S"),
        snapshot.stage,
        snapshot.phase,
        risk.balance,
        risk.session_peak_balance,
        risk.session_pnl(),
        risk.daily_pnl,
        snapshot.daily_loss_remaining,
        risk.drawdown() * dec!(100),
        snapshot.drawdown_remaining,
        risk.trades,
        risk.wins,
        risk.losses,
        win_rate,
        risk.loss_streak,
        cooldown,
        edge,
        parity,
        last_tick,
        signal,
        snapshot.ticks_processed,
    )
}
