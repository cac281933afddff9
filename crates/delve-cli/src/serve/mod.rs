//! HTTP API for running research.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - API request/response types (DTOs)

mod handlers;
mod models;

pub use models::ResearchResponse;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use delve_core::config::ServerConfig;
use delve_core::ResearchPipeline;

/// Shared application state for the server.
pub struct AppState {
    pub pipeline: ResearchPipeline,
}

/// Builds the router with every API endpoint.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/research", post(handlers::research))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the research server.
pub async fn start_server(config: &ServerConfig, pipeline: ResearchPipeline) -> std::io::Result<()> {
    let state = Arc::new(AppState { pipeline });
    let addr = format!("{}:{}", config.host, config.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "research server listening");
    println!("Delve API: http://{}", addr);
    println!("Press Ctrl+C to stop\n");

    axum::serve(listener, router(state)).await
}
