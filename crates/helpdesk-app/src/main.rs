use std::sync::Arc;

use anyhow::{Context, Result};
use helpdesk_app::AppState;
use helpdesk_core::{PageFetcher, SessionRegistry};
use integration_zendesk::{ZendeskConfig, ZendeskTransport};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = helpdesk_config::load_from_env()?;
    let zendesk = ZendeskConfig::from_env(
        config.api_url_override(),
        config.zendesk.request_timeout_secs,
    )?;
    let transport = Arc::new(ZendeskTransport::new(zendesk)?);

    if let Err(error) = transport.health_check().await {
        tracing::warn!(error = %error, "Zendesk health check failed at startup");
    }

    let api_root = transport.api_url().to_owned();
    let registry = SessionRegistry::new(PageFetcher::new(transport));
    let state = AppState::new(registry, &api_root, config.pagination.page_size);

    let address = config.bind_address()?;
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind helpdesk proxy on {address}"))?;

    helpdesk_app::serve(listener, state)
        .await
        .context("helpdesk proxy server error")?;
    Ok(())
}
