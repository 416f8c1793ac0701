use tracing_subscriber::EnvFilter;

use nonprofit_search::api;
use nonprofit_search::config::Config;
use nonprofit_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Elasticsearch: {} (index '{}')",
        config.elastic.host,
        config.elastic.index
    );

    let state = AppState::new(config.clone()).await?;

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
