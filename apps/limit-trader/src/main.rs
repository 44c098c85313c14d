//! Trade CLI
//!
//! Places and clears buy limits through QUIK or Tinkoff.
//!
//! # Usage
//!
//! ```bash
//! trade --provider open limit set limits.xlsx
//! trade --provider tinkoff limit clear
//! trade --provider tinkoff tickers
//! ```
//!
//! # Environment Variables
//!
//! - `HOME`: default config lookup (`$HOME/.trade.yaml`)
//! - `RUST_LOG`: Log level (default: info)
//! - any variable referenced as `${VAR}` in the config file

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use limit_trader::application::ports::TradeClientPort;
use limit_trader::application::use_cases::{
    ClearLimitsUseCase, ListTickersUseCase, SetLimitsUseCase,
};
use limit_trader::config::{Provider, load_config};
use limit_trader::infrastructure::broker::Backend;
use limit_trader::infrastructure::limit_source::XlsxLimitSource;
use limit_trader::telemetry::init_tracing;

/// Limit order automation for QUIK and Tinkoff Invest.
#[derive(Debug, Parser)]
#[command(name = "trade", version, about)]
struct Cli {
    /// Trading backend.
    #[arg(long, short, value_enum)]
    provider: Provider,

    /// Config file (default: $HOME/.trade.yaml, then ./.trade.yaml).
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage limit orders.
    #[command(subcommand)]
    Limit(LimitCommand),

    /// Print tradeable tickers, one per line.
    Tickers,
}

#[derive(Debug, Subcommand)]
enum LimitCommand {
    /// Place every marked limit from an xlsx template.
    Set {
        /// Path to the template.
        file: PathBuf,
    },

    /// Cancel all outstanding orders.
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref()).context("loading configuration")?;
    let provider = config.provider(cli.provider)?;
    let mut backend = Backend::from_provider_config(&provider)
        .with_context(|| format!("creating {} client", cli.provider))?;

    tracing::debug!(provider = %cli.provider, backend = backend.name(), "Client ready");

    let result = dispatch(&mut backend, cli.command).await;

    if let Err(e) = backend.close().await {
        tracing::warn!(error = %e, "Failed to close client");
    }

    result
}

async fn dispatch(backend: &mut Backend, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Limit(LimitCommand::Set { file }) => set_limits(backend, &file).await,
        Command::Limit(LimitCommand::Clear) => {
            let cancelled = ClearLimitsUseCase::new(backend)
                .execute()
                .await
                .context("clearing limits")?;
            tracing::info!("{} limits have been cleared", cancelled);
            Ok(())
        }
        Command::Tickers => {
            let tickers = ListTickersUseCase::new(backend)
                .execute()
                .await
                .context("listing tickers")?;
            for ticker in tickers {
                println!("{ticker}");
            }
            Ok(())
        }
    }
}

async fn set_limits(backend: &mut Backend, file: &Path) -> anyhow::Result<()> {
    let mut source = XlsxLimitSource::open(file)?;
    let placed = SetLimitsUseCase::new(backend)
        .execute(&mut source)
        .await
        .with_context(|| format!("setting limits from {}", file.display()))?;
    tracing::info!("{} limits are set", placed);
    Ok(())
}

/// Load `.env` from the working directory or the nearest ancestor.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}
