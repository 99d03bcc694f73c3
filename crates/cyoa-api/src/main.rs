//! Cyoa API server entry point.

use std::error::Error;
use std::sync::Arc;

use cyoa_api::config::Config;
use cyoa_api::state::AppState;
use cyoa_store::pg_story_repository::PgStoryRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Optional .env file; real environment variables take precedence.
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Cyoa story server");

    let config = Config::from_env()?;
    let addr = config.bind_addr()?;

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    let story_repository = Arc::new(PgStoryRepository::new(pool.clone()));
    let app = cyoa_api::app(AppState::new(pool.clone(), story_repository));

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down; closing database pool");
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
