use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Liveness probe. Mounted outside the gate.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
