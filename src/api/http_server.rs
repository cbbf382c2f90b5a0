// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::scheduler::Monitor;

#[derive(Clone)]
struct AppState {
    monitor: Arc<Monitor>,
}

pub fn router(monitor: Arc<Monitor>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { monitor })
}

/// Serve the status endpoint on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, monitor: Arc<Monitor>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    if let Some(addr) = addr {
        info!("Status server listening on {}", addr);
    }
    axum::serve(listener, router(monitor))
        .with_graceful_shutdown(shutdown)
        .await
}

pub async fn start_server<F>(port: u16, monitor: Arc<Monitor>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
    serve(listener, monitor, shutdown).await
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.monitor.check_health().await)
}
