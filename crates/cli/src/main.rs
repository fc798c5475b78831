//! SGR CLI — the main entry point.
//!
//! Commands:
//! - `run`        — Run a research task to completion
//! - `strategies` — List the available step strategies
//! - `config`     — Initialize or validate the configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "sgr",
    about = "SGR — schema-guided reasoning agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a task with an agent
    Run {
        /// The task to research
        task: String,

        /// Path to the TOML config file
        #[arg(short, long, default_value = "sgr.toml")]
        config: std::path::PathBuf,

        /// Step strategy to use
        #[arg(short, long, default_value = "sgr_tool_calling")]
        strategy: String,
    },

    /// List the available step strategies
    Strategies,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config_cmd::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            task,
            config,
            strategy,
        } => commands::run::run(&task, &config, &strategy).await?,
        Commands::Strategies => commands::strategies::run(),
        Commands::Config { action } => commands::config_cmd::run(action)?,
    }

    Ok(())
}
