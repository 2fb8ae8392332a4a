//! Run command implementation

use crate::config::Config;
use crate::engine::{EngineError, Orchestrator, StopReason};
use crate::execution::PaperExchange;
use clap::Args;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Trade even when validation finds no edge
    #[arg(long)]
    pub trade_without_edge: bool,

    /// Paper account starting balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Seed for the paper feed and settlement
    #[arg(long)]
    pub paper_seed: Option<u64>,

    /// Milliseconds between paper ticks
    #[arg(long, default_value = "1000")]
    pub tick_interval_ms: u64,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let config = self.apply(config);

        let exchange = PaperExchange::from_config(&config)
            .with_tick_interval(Duration::from_millis(self.tick_interval_ms));
        let mut engine = Orchestrator::new(&config, Arc::new(exchange));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received, finishing current tick");
                let _ = shutdown_tx.send(true);
            }
        });

        match engine.run(shutdown_rx).await {
            Ok(summary) => {
                let state = &summary.final_state;
                println!();
                match summary.stop {
                    StopReason::Shutdown => println!("Session stopped by shutdown"),
                    StopReason::Halted(reason) => println!("Session halted: {}", reason),
                }
                println!(
                    "Trades: {} ({} W / {} L)  Balance: {:.2}  P&L: {:+.2}",
                    state.trades,
                    state.wins,
                    state.losses,
                    state.balance,
                    state.session_pnl()
                );
                Ok(())
            }
            Err(EngineError::NoEdge { .. }) => {
                if let Some(validation) = engine.validation() {
                    println!("{}", validation.format_table());
                }
                anyhow::bail!("No statistical edge; rerun with --trade-without-edge to trade anyway")
            }
            Err(err) => Err(err.into()),
        }
    }

    fn apply(&self, config: &Config) -> Config {
        let mut config = config.clone();
        if self.trade_without_edge {
            config.engine.trade_without_edge = true;
        }
        if let Some(balance) = self.balance {
            config.execution.paper_starting_balance = balance;
        }
        if let Some(seed) = self.paper_seed {
            config.execution.paper_seed = seed;
        }
        config
    }
}
