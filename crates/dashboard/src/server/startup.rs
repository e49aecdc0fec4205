//! REST server startup and configuration

use anyhow::{anyhow, Result};
use axum::serve;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::routing::create_router;
use crate::server::state::AppState;

/// Start the REST server and run until Ctrl-C
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
  tracing::info!("Starting threadlens REST server on {addr}");
  tracing::info!("Reading posts from {}", state.ingest.csv_path.display());
  if !state.summarizer.remote_enabled() {
    tracing::info!("No API key configured; perspectives will be heuristic");
  }

  let app = create_router(state)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(addr).await?;
  tracing::info!("Server listening on {addr}");

  serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.map_err(|e| anyhow!("Server error: {e}"))?;
  tracing::info!("Server shutdown gracefully");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("Failed to listen for shutdown signal: {e}");
    std::future::pending::<()>().await;
  }
}
