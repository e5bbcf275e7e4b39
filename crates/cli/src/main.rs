mod cli;
mod commands;
mod integrations;

use anyhow::{Context, Result};
use clap::Parser;

use alerta_core::{config, Config, Signal};
use alerta_notify::Dispatcher;

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    match args.command {
        Command::Ingest {
            file,
            user_id,
            json,
        } => commands::ingest(&file, user_id, json),
        Command::Validate { integrations } => commands::validate(&integrations),
        Command::Dispatch {
            integrations,
            numero,
            date,
            time,
            id,
            min_multiplier,
        } => {
            let signal = Signal {
                numero,
                date,
                time,
                external_id: id,
            };
            commands::dispatch(&dispatcher()?, &integrations, signal, min_multiplier).await
        }
        Command::Test { integrations } => commands::test(&dispatcher()?, &integrations).await,
    }
}

fn dispatcher() -> Result<Dispatcher> {
    let config = Config::from_env();
    config.log_summary();
    Dispatcher::from_config(&config).context("failed to build HTTP client")
}
