//! `credence-api` binary: configuration from the environment, then serve.

use credence_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("configuration rejected: {e}");
        e
    })?;
    tracing::debug!(?config, "configuration loaded");
    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set, API authentication is disabled");
    }
    let port = config.port;

    let state = AppState::try_with_config(config).map_err(|e| {
        tracing::error!("startup failed: {e}");
        e
    })?;
    let app = credence_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("credence API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
