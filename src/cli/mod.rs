//! CLI interface for parity-bot
//!
//! Provides subcommands for:
//! - `run`: Validate the edge, then trade against the paper exchange
//! - `validate`: Backtest validation only
//! - `config`: Show the effective configuration

mod run;
mod validate;

pub use run::RunArgs;
pub use validate::{OutputFormat, ValidateArgs};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "parity-bot")]
#[command(about = "Odd/even digit-parity trading bot with edge validation and risk gating")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate, then start a paper trading session
    Run(RunArgs),
    /// Run backtest validation only
    Validate(ValidateArgs),
    /// Show the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate_args() {
        let cli = Cli::parse_from([
            "parity-bot",
            "--config",
            "alt.toml",
            "validate",
            "--seed",
            "9",
            "--min-samples",
            "500",
            "--format",
            "json",
        ]);
        assert_eq!(cli.config, "alt.toml");
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.seed, Some(9));
                assert_eq!(args.min_samples, Some(500));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::parse_from(["parity-bot", "run"]);
        assert_eq!(cli.config, "config.toml");
        match cli.command {
            Commands::Run(args) => {
                assert!(!args.trade_without_edge);
                assert_eq!(args.tick_interval_ms, 1000);
                assert!(args.balance.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
