//! CLI definitions for ReelRank.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use reelrank_ranking::SearchMode;

/// ReelRank CLI.
#[derive(Parser)]
#[command(name = "reelrank")]
#[command(about = "Hybrid movie search and ranking")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the HTTP server in foreground (default)
    Serve {
        /// Server host (overrides [server].host)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides [server].port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load a JSON catalog fixture into the store
    Import {
        /// Fixture file with items, watch_history and reviews
        file: PathBuf,
    },

    /// Rank the catalog for one query
    Search {
        /// Query text
        query: String,

        /// Ranking mode (basic, hybrid, ranked)
        #[arg(short, long, default_value = "ranked")]
        mode: SearchMode,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the most watched items in the activity window
    TopWatched {
        /// Number of rows (overrides [activity].top_watched_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}
