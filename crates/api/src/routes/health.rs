//! Liveness and store connectivity probes.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use storefront_store::Health;

use crate::app::AppState;

pub async fn root() -> Response {
    Json(serde_json::json!({ "message": "Ecommerce API is running" })).into_response()
}

pub async fn health<S: Health>(State(state): State<AppState<S>>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(serde_json::json!({
            "status": "healthy",
            "database": "connected",
        }))
        .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "unhealthy",
                "database": "disconnected",
                "error": err.to_string(),
            })),
        )
            .into_response(),
    }
}
