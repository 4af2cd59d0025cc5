use axum::response::Json;
use serde_json::{json, Value};

/// GET /health - liveness probe. No authentication, no store access:
/// the response must stay constant regardless of store state.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
