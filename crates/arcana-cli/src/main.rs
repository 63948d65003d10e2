use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod app;
mod commands;
mod logging;
mod presenter;

#[derive(Parser)]
#[command(name = "arcana")]
#[command(about = "ARCANA - generated tarot decks and grim readings", long_about = None)]
struct Cli {
    /// Configuration directory holding config.toml and secret.json
    /// (default: ~/.config/arcana)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level, on top of any ARCANA_LOG / RUST_LOG directives
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available spreads
    Spreads,
    /// Generate a deck and show the gallery
    Deck {
        /// Write every card image into this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
    },
    /// Generate a deck and perform one reading
    Read {
        /// Spread id, e.g. three-card or celtic-cross
        #[arg(short, long)]
        spread: String,
        /// The question to ask the cards
        #[arg(short, long, default_value = "")]
        query: String,
        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Start an interactive session
    Repl,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.config.as_deref(), cli.verbose);
    let config_dir = cli.config.as_deref();

    match cli.command {
        Commands::Spreads => {
            commands::spreads::list();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Deck { export } => commands::deck::run(config_dir, export.as_deref()).await,
        Commands::Read {
            spread,
            query,
            seed,
        } => commands::read::run(config_dir, &spread, &query, seed).await,
        Commands::Repl => commands::repl::run(config_dir).await,
    }
}
