//! Recon API: webhook endpoint and operational routes
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handlers::webhook))
        .route("/v1/refresh", post(handlers::refresh))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_text))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(addr: &str, state: AppState) {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    tracing::info!("reconciliation webhook listening on {}", addr);
    axum::serve(listener, app)
        .await
        .expect("Server error");
}
