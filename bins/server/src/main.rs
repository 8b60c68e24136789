//! Neraca report server.
//!
//! Serves financial statements computed from the PostgreSQL ledger.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neraca_api::{AppState, create_router};
use neraca_core::reports::ReportService;
use neraca_db::{SeaOrmLedgerStore, connect_with};
use neraca_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neraca=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let store = Arc::new(SeaOrmLedgerStore::new(db));
    let reports = ReportService::new(store, &config.reporting);
    info!(
        materiality = %config.reporting.materiality_tolerance,
        "Report service configured"
    );

    let app = create_router(AppState::new(reports));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
