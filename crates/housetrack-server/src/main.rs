use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use housetrack_core::auth::Session;
use housetrack_core::cache::CacheManager;
use housetrack_core::{Config, DataStore, SchemeApi};
use housetrack_server::{app, AppState};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber. Logs always go to stderr; with a log
/// directory they are also written to a daily-rolling file. The returned
/// guard must live until shutdown so buffered lines are flushed.
fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // RUST_LOG controls the level (e.g., RUST_LOG=housetrack_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "housetrack.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    let _log_guard = init_tracing(config.log_dir.as_deref())?;
    info!("housetrack starting");

    let store = DataStore::load(&config.data_dir).with_context(|| {
        format!("Failed to load seed data from {}", config.data_dir.display())
    })?;
    info!(
        houses = store.houses().len(),
        officers = store.officers().len(),
        data_dir = %config.data_dir.display(),
        "Loaded seed data"
    );

    let mut session = Session::new(config.session_dir()?);
    if session.load()? {
        info!(role = ?session.role(), "Restored previous session");
    }

    let api = SchemeApi::new(store, CacheManager::new(config.cache_ttl()), config.latency());
    let state = AppState::new(api, session, config.data_dir.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
