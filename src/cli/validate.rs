//! Validate command implementation

use crate::backtest::BacktestValidator;
use crate::config::Config;
use crate::signal::SignalGenerator;
use clap::{Args, ValueEnum};

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Seed for the synthetic tick stream
    #[arg(long)]
    pub seed: Option<u64>,

    /// Trials required before an edge can be declared
    #[arg(long)]
    pub min_samples: Option<usize>,

    /// Output format: table or json
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ValidateArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let seed = self.seed.unwrap_or(config.backtest.seed);
        let min_samples = self.min_samples.unwrap_or(config.backtest.min_samples);

        let generator = SignalGenerator::new(&config.signal);
        let validator = BacktestValidator::from_config(config);
        let result = validator.validate(
            &generator,
            min_samples,
            config.backtest.confidence_level,
            config.execution.payout_ratio,
            seed,
        );

        match self.format {
            OutputFormat::Table => println!("{}", result.format_table()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        }
        Ok(())
    }
}
