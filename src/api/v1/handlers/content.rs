use axum::response::IntoResponse;

/// Sample upstream handler; only reachable through the gate.
pub async fn content() -> impl IntoResponse {
    "Protected content"
}
