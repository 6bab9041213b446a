use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Ledger node end-to-end harness
#[derive(Parser)]
#[command(name = "ledger-e2e")]
#[command(about = "End-to-end acceptance checks against a ledger node")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to ./ledger-e2e.toml or LEDGER_E2E_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the seed and address derived for a label
    Address(commands::address::AddressCommand),
    /// Print the balance of a labelled account
    Balance(commands::address::BalanceCommand),
    /// Show leasing, sponsoring and association state between two labels
    Relations(commands::relations::RelationsCommand),
    /// Wait for the node to answer its liveness probe
    NodeStatus(commands::node_status::NodeStatusCommand),
    /// Run step scripts matching a glob pattern
    Run(commands::run::RunCommand),
}

pub async fn run() -> AppResult<()> {
    // RUST_LOG wins; otherwise scenario progress at info
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Address(command) => command.run(&config),
        Commands::Balance(command) => command.run(&config).await,
        Commands::Relations(command) => command.run(&config).await,
        Commands::NodeStatus(command) => command.run(&config).await,
        Commands::Run(command) => command.run(&config).await,
    }
}

fn load_config(path: Option<&std::path::Path>) -> AppResult<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(Some(path)),
        None => AppConfig::load(),
    };
    config.map_err(|e| AppError::Config(e.to_string()))
}
