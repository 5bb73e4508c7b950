//! Server initialization and startup logic for ReelRank.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use reelrank_api::{ApiConfig, ApiServer, AppState};
use reelrank_config::Config;

use crate::commands::{build_engine, open_catalog};

/// ReelRank home directory (`~/.reelrank`).
pub(crate) fn reelrank_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".reelrank"))
        .unwrap_or_else(|| PathBuf::from(".reelrank"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.reelrank/logs/ with daily rotation. Console
/// output goes to stderr so `--json` command output stays clean.
pub(crate) fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = reelrank_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("reelrank")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on drop; must live for the whole process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Run the HTTP server in foreground until Ctrl-C.
pub(crate) async fn run_server(
    config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let api_config = ApiConfig::new(
        host.unwrap_or_else(|| config.server.host.clone()),
        port.unwrap_or(config.server.port),
    );

    info!("Starting ReelRank v{}", env!("CARGO_PKG_VERSION"));

    let catalog = open_catalog(&config.catalog).await?;
    let engine = Arc::new(build_engine(&config, catalog.clone())?);
    info!(
        model = engine.embedder().model_id(),
        top_k = config.ranking.top_k,
        "Ranking engine initialized"
    );

    // Warm title vectors in the background; requests embed lazily until it finishes.
    let warm_engine = engine.clone();
    tokio::spawn(async move {
        match warm_engine.warm_cache().await {
            Ok(count) => info!("Embedding cache warmed with {} titles", count),
            Err(e) => warn!("Embedding cache warm-up failed: {}", e),
        }
    });

    let state = Arc::new(AppState::new(
        engine,
        catalog.clone(),
        catalog,
        config.activity.clone(),
    ));

    let server = ApiServer::new(api_config, state);
    info!("API server: http://{}", server.addr());

    if let Err(e) = server.run(shutdown_signal()).await {
        error!("API server error: {}", e);
        return Err(e.into());
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl-C, shutting down");
}
