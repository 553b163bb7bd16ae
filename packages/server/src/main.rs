use std::sync::Arc;

use anyhow::Context;
use server::config::AppConfig;
use server::database::{ensure_indexes, init_db};
use server::state::AppState;
use spotify::SpotifyClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    let client = SpotifyClient::new(config.spotify.clone())
        .context("Failed to build catalog API client")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let cors = server::cors_layer(&config.server.cors);
    let state = AppState::new(db, config, Arc::new(client));
    let app = server::build_router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("Server running at http://{}", addr);
    info!("API reference at http://{}/scalar", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
