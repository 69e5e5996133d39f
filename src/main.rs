use std::sync::Arc;

use anyhow::Context;
use media_matchmaker::{
    config::Config,
    routes::{create_router, AppState},
    services::HttpRecommendationProvider,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,media_matchmaker=debug,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Fail fast: never start serving with a missing URL or key
    let client_config = config
        .client_config()
        .context("Recommendation API is not configured")?;

    tracing::info!(
        api_url = %client_config.base_url(),
        timeout_secs = client_config.timeout().as_secs(),
        "Recommendation API configured"
    );

    let provider = HttpRecommendationProvider::new(client_config)?;
    let state = Arc::new(AppState::new(Arc::new(provider)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
