//! ProctorVision CLI — replay, monitor, and score interview sessions.
//!
//! Usage:
//!   proctor replay <SCRIPT>     Replay a tick script offline
//!   proctor monitor <SCRIPT>    Run the live scheduler against a tick script
//!   proctor score <EVENTS>      Score a JSONL event log
//!   proctor config              Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use proctor_common::config::AppConfig;

mod commands;
mod report;

#[derive(Parser)]
#[command(
    name = "proctor",
    about = "Interview integrity monitoring from classifier output",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a tick script offline and print the resulting events
    Replay {
        /// Path to the JSONL tick script
        script: PathBuf,

        /// Candidate name for the session
        #[arg(short, long, default_value = "Candidate")]
        candidate: String,

        /// Tick interval override (milliseconds)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Print events as JSONL instead of a table
        #[arg(long)]
        jsonl: bool,
    },

    /// Run the live scheduler against a tick script
    Monitor {
        /// Path to the JSONL tick script
        script: PathBuf,

        /// Candidate name for the session
        #[arg(short, long, default_value = "Candidate")]
        candidate: String,

        /// Tick interval override (milliseconds)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Score a JSONL event log
    Score {
        /// Path to the events file
        events: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    proctor_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            script,
            candidate,
            interval_ms,
            jsonl,
        } => commands::replay::run(script, candidate, interval_ms, jsonl, &config).await,
        Commands::Monitor {
            script,
            candidate,
            interval_ms,
        } => commands::monitor::run(script, candidate, interval_ms, &config).await,
        Commands::Score { events } => commands::score::run(events),
        Commands::Config { save } => commands::config::run(&config, save),
    }
}
