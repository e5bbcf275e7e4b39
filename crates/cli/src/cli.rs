use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spreadsheet signal ingestion and alert delivery.
///
/// Reads `.env` and `ALERTA_*` environment variables for provider
/// endpoints; per-user credentials come from the integrations file.
#[derive(Parser, Debug)]
#[command(name = "alerta", version, about = "Signal ingestion and alert delivery")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a spreadsheet and print the signals it contains
    Ingest {
        /// Spreadsheet file (xlsx, xls, xlsb or ods)
        file: PathBuf,

        /// Also print the storage key this upload would get for the user
        #[arg(long)]
        user_id: Option<i64>,

        /// Print signals as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check every integration in a JSON file resolves to a usable config
    Validate {
        /// JSON array of integrations (`type`, `config`, optional `id`, `active`)
        integrations: PathBuf,
    },

    /// Deliver one signal alert to every active integration
    Dispatch {
        integrations: PathBuf,

        /// Multiplier, e.g. 4.07
        #[arg(long)]
        numero: String,

        /// Signal date, YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// Signal time, HH:MM:SS
        #[arg(long)]
        time: String,

        /// External signal id
        #[arg(long)]
        id: String,

        /// Skip delivery when the multiplier is below this value
        #[arg(long, env = "ALERTA_MIN_MULTIPLIER")]
        min_multiplier: Option<String>,
    },

    /// Send a sample alert through every active integration
    Test { integrations: PathBuf },
}
