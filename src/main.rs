use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use rentdesk::config::AppConfig;
use rentdesk::handlers;
use rentdesk::services::http::rest::RestBackend;
use rentdesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(
        config.api_base_url.starts_with("http://") || config.api_base_url.starts_with("https://"),
        "API_BASE_URL must be an http(s) URL, got {}",
        config.api_base_url
    );

    let backend = RestBackend::new(&config)?;
    tracing::info!(
        "using backend {} (timeout {:?}, service token {})",
        config.api_base_url,
        config.api_timeout,
        if config.service_token.is_some() { "set" } else { "unset" }
    );

    let port = config.port;
    let state = Arc::new(AppState::new(config, Arc::new(backend)));
    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
