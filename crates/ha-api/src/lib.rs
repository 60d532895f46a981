//! Helper agent HTTP API
//!
//! A thin axum layer in front of the Home Assistant REST API. Requests are
//! forwarded through [`HomeAssistantApi`], mutations are optionally recorded
//! through [`CommitLog`], and results come back in the [`ApiResponse`]
//! envelope.

pub mod error;
pub mod helpers;

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use ha_client::HomeAssistantApi;
use ha_git::CommitLog;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::{ApiError, ErrorResponse};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// State and service calls against Home Assistant
    pub ha: Arc<dyn HomeAssistantApi>,
    /// Commit logging after mutations
    pub git: Arc<dyn CommitLog>,
}

impl AppState {
    pub fn new(ha: Arc<dyn HomeAssistantApi>, git: Arc<dyn CommitLog>) -> Self {
        Self { ha, git }
    }
}

/// Uniform response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let helpers_router = Router::new()
        .route("/list", get(helpers::list_helpers))
        .route("/create", post(helpers::create_helper))
        .route("/delete/:entity_id", delete(helpers::delete_helper));

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/helpers", helpers_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the API server, returning once `shutdown` resolves and in-flight
/// requests have drained
pub async fn start_server<F>(state: AppState, addr: &str, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// GET /api/health - Health check endpoint
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}
