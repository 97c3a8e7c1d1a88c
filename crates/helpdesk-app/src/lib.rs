//! JSON surface over the per-session ticket navigator and enricher.

pub mod routes;
pub mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use helpdesk_core::SessionRegistry;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub api_root: Arc<str>,
    pub page_size: u32,
}

impl AppState {
    pub fn new(registry: SessionRegistry, api_root: &str, page_size: u32) -> Self {
        Self {
            registry: Arc::new(registry),
            api_root: Arc::from(api_root.trim_end_matches('/')),
            page_size,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/navigate", get(routes::navigate))
        .route("/ticket_details", get(routes::ticket_details))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let address: Option<SocketAddr> = listener.local_addr().ok();
    info!(address = ?address, "helpdesk proxy listening");
    axum::serve(listener, build_router(state)).await
}
