use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::routing::dispatch;
use crate::state::AppState;

/// Build the application router. `/health` is the only framework route;
/// everything else, API and static assets alike, goes through the dispatcher.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .fallback(dispatch)
        .with_state(state.clone());

    if state.config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "error": "store unavailable",
                })),
            )
        }
    }
}
