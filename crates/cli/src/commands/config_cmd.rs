//! `sgr config` — configuration management commands.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a default config file
    Init {
        /// Where to write it
        #[arg(short, long, default_value = "sgr.toml")]
        path: PathBuf,
    },

    /// Load a config file and report problems
    Validate {
        /// The config file to check
        #[arg(short, long, default_value = "sgr.toml")]
        path: PathBuf,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Init { path } => {
            if path.exists() {
                return Err(format!("{} already exists, not overwriting", path.display()).into());
            }
            std::fs::write(&path, sgr_config::default_toml())?;
            println!("  Wrote default config to {}", path.display());
            println!("  Set llm.api_key (or the SGR_API_KEY env var) before running.");
        }
        ConfigAction::Validate { path } => {
            match sgr_config::load(&path) {
                Ok(config) => {
                    println!("  Config OK");
                    println!();
                    println!("  Model:          {}", config.llm.model);
                    println!("  Base URL:       {}", config.llm.base_url);
                    println!(
                        "  API key:        {}",
                        if config.llm.api_key.is_empty() {
                            "NOT SET"
                        } else {
                            "set"
                        }
                    );
                    println!("  Max iterations: {}", config.execution.max_iterations);
                    println!("  Max searches:   {}", config.execution.max_searches);
                    match &config.execution.logs_dir {
                        Some(dir) => println!("  Logs dir:       {}", dir.display()),
                        None => println!("  Logs dir:       disabled"),
                    }
                }
                Err(e) => {
                    return Err(format!("Config error: {e}").into());
                }
            }
        }
    }
    Ok(())
}
