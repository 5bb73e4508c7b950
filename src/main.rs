//! ReelRank - hybrid movie search and ranking
//!
//! Main entry point for the ReelRank CLI and server.

mod cli;
mod commands;
mod server;

use std::path::Path;

use clap::Parser;
use tracing::{error, info, warn};

use reelrank_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};
use crate::commands::{run_import, run_search, run_top_watched};
use crate::server::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        None => run_server(config, None, None).await,
        Some(Commands::Serve { host, port }) => run_server(config, host, port).await,
        Some(Commands::Import { file }) => run_import(&config, &file).await.map(|_| ()),
        Some(Commands::Search { query, mode, json }) => {
            run_search(&config, &query, mode, json).await
        }
        Some(Commands::TopWatched { limit, json }) => run_top_watched(&config, limit, json).await,
    }
}

/// Load and validate configuration. A missing file means defaults.
fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    if path.exists() {
        info!("Loaded configuration from {}", path.display());
    } else {
        info!("No config at {}, using defaults", path.display());
    }

    let result = ConfigValidator::validate(&config)?;
    for err in &result.errors {
        error!("Config error at {}: {}", err.path, err.message);
    }
    for warning in result.into_result()? {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }
    Ok(config)
}
