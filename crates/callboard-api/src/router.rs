//! Router configuration and server setup.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/api/health", get(handlers::health))
        // Automations
        .route("/api/automation/status", get(handlers::automation_status))
        .route("/api/automation/:name", post(handlers::run_automation))
        // Schedule
        .route("/api/schedule/status", get(handlers::schedule_status))
        .route("/api/schedule/check", get(handlers::schedule_check))
        .route(
            "/api/schedule/trigger/:name",
            post(handlers::schedule_trigger),
        )
        .route("/api/schedule/update/:name", post(handlers::schedule_update))
        // Monitor
        .route("/api/monitor/logs", get(handlers::monitor_logs))
        .route("/api/monitor/stats", get(handlers::monitor_stats))
        .route("/api/monitor/:stage/:name", post(handlers::record_stage))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
pub async fn serve(config: ApiConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}

/// Starts the API server and stops accepting connections once `shutdown`
/// resolves.
pub async fn serve_with_shutdown<F>(
    config: ApiConfig,
    state: AppState,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
