//! College management API server.
//!
//! Run from repo root: `cargo run -p college-server`
//! Settings come from the environment (a `.env` file is loaded if present); see `Settings`.

use college_api::{
    app, apply_migrations, ensure_database_exists, AppState, CollegeStore,
    MemoryStore, PgStore, Settings, StoreBackend,
};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn open_store(settings: &Settings) -> Result<Arc<dyn CollegeStore>, Box<dyn std::error::Error>> {
    match settings.backend {
        StoreBackend::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let store = PgStore::connect(&settings.database_url, settings.max_connections).await?;
            apply_migrations(store.pool()).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            let store = if settings.seed_demo_data {
                MemoryStore::with_demo_data().await?
            } else {
                MemoryStore::new()
            };
            tracing::warn!(seeded = settings.seed_demo_data, "using in-memory store; data is lost on exit");
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("college_server=info,college_api=info,tower_http=info")
            }),
        )
        .init();

    let settings = Settings::from_env()?;

    let store = open_store(&settings).await?;
    let state = AppState::new(store).with_internal_errors(settings.development);

    let listener = TcpListener::bind(settings.bind_addr()?).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        backend = ?settings.backend,
        development = settings.development,
        "College Management System API listening"
    );
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
