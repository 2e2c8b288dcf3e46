mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use batepapo_api::AppStateInner;
use batepapo_core::reaper::run_reaper_loop;
use batepapo_core::{Clock, MemoryStore, Reaper, SharedStore, SystemClock};
use batepapo_db::Database;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batepapo=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let store: SharedStore = if config.in_memory() {
        info!("Using in-memory store; nothing will persist");
        Arc::new(MemoryStore::default())
    } else {
        Arc::new(Database::open(&config.db_path)?)
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Background idle reaper
    let reaper = Arc::new(Reaper::new(store.clone(), clock.clone(), config.idle_after));
    tokio::spawn(run_reaper_loop(reaper, config.sweep_interval));

    let state = Arc::new(AppStateInner::new(store, clock));
    let app = batepapo_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Batepapo listening on {}", addr);
    info!(
        "Idle participants are removed after {}s (checked every {}s)",
        config.idle_after.as_secs(),
        config.sweep_interval.as_secs()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
