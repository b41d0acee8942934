use std::sync::Arc;

use anyhow::Context;

use ethiscan_api::{app, config::ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ethiscan_observability::init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    for var in config.lookup.missing_credentials() {
        tracing::warn!("{var} not set; lookups that need it will fail");
    }
    tracing::debug!(?config, "loaded configuration");

    let services = app::services::AppServices::from_config(&config.lookup)
        .context("failed to build lookup clients")?;
    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
