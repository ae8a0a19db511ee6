//! Ledger HTTP server.
//!
//! Run from repo root: `cargo run -p ledger-server`
//! Configuration comes from the environment (or `.env`): DATABASE_URL, LEDGER_LISTEN_ADDR,
//! LEDGER_MAX_CONNECTIONS, LEDGER_BUSY_TIMEOUT_MS, LEDGER_BODY_LIMIT_BYTES.

use bank_ledger::{app, AppState, LedgerConfig, Store};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bank_ledger=info,tower_http=info")),
        )
        .init();

    let config = LedgerConfig::from_env()?;
    let store = Store::open(&config).await?;
    let router = app(AppState::new(store.clone()), &config);

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!("ledger listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
