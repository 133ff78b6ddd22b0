//! Axum router assembly.

use axum::extract::State;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{any, get};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use domo_domain::time::now;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the JSON API under `/api` and the `WebSocket` stream at `/ws`.
/// Includes a [`TraceLayer`] that logs each request/response through the
/// `tracing` ecosystem and a [`CorsLayer`] for the configured browser
/// origins.
pub fn build(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", crate::api::routes())
        .route("/ws", any(crate::ws::upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// `GET /` — service banner.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "domo smart home API",
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": now().to_rfc3339(),
    }))
}

/// `GET /health` — liveness plus a couple of gauges.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "devices_count": state.registry.device_count(),
        "stream_subscribers": state.registry.subscriber_count(),
    }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
