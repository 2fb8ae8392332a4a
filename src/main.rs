use clap::Parser;
use parity_bot::cli::{Cli, Commands};
use parity_bot::config::{Config, ConfigError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration; only a missing file falls back to the example
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("Warning: {} not found, using bundled example configuration", cli.config);
            Config::from_toml(include_str!("../config.toml.example"))?
        }
        Err(e) => return Err(e.into()),
    };

    // Initialize telemetry
    let _telemetry = parity_bot::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!(symbol = %config.feed.symbol, "Starting paper trading mode");
            args.execute(&config).await?;
        }
        Commands::Validate(args) => {
            tracing::info!("Starting backtest validation");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
