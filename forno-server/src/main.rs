//! forno-server binary
//!
//! Loads `.env`, configures logging, opens the database and serves the API.
//! Two housekeeping tasks run alongside: rate limiter cleanup and expiry of
//! unpaid order intents.

use std::net::SocketAddr;
use std::time::Duration;

use forno_server::{AppState, Config, build_app, db, logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = logger::init_logger(config.log_dir.as_deref());

    tracing::info!(
        env = %config.environment,
        timezone = %config.store_timezone,
        webhook_mode = ?config.webhook_mode,
        "Starting forno-server"
    );

    let state = AppState::new(&config).await?;

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    // Persist expiry of unpaid intents (reads already treat them as expired)
    let pool = state.pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            match db::intents::expire_stale(&pool, shared::util::now_millis()).await {
                Ok(0) => {}
                Ok(n) => tracing::info!(count = n, "Expired stale order intents"),
                Err(e) => tracing::warn!(error = %e, "Intent expiry sweep failed"),
            }
        }
    });

    let app = build_app(state);
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("forno-server HTTP listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("forno-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
