//! Main HTTP gateway server.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use recibo_pipeline::ReceiptPipeline;

use crate::webhook;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<ReceiptPipeline>,
    pub webhook_secret: String,
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/webhooks/email", post(webhook::receive_webhook))
        .route("/healthz", get(|| async { "OK" }))
        .with_state(state)
}

/// Start the Axum HTTP server and serve until the process ends.
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = router(state);

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
