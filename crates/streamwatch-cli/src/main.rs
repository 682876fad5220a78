//! Streamwatch CLI
//!
//! Drives the windowed anomaly detector over a synthetic or recorded stream
//! and writes the results as plain-text files.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

use commands::{replay::ReplayArgs, simulate::SimulateArgs};
use config::CliConfig;
use error::CliResult;
use output::OutputFormat;

/// Streamwatch - windowed anomaly detection for numeric streams
#[derive(Parser)]
#[command(name = "streamwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "STREAMWATCH_CONFIG")]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic stream and classify it
    Simulate(SimulateArgs),

    /// Classify a recorded `index, value` stream
    Replay(ReplayArgs),

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate(args) => commands::simulate::execute(args, config, cli.output).await,
        Commands::Replay(args) => commands::replay::execute(args, config, cli.output),
        Commands::Config => match cli.output {
            OutputFormat::Table => {
                print!("{}", config.to_toml_string()?);
                Ok(())
            }
            OutputFormat::Json => output::print_json(&config),
        },
    }
}
