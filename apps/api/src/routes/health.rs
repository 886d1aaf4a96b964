use axum::Json;
use serde_json::{json, Value};

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// GET /
/// Points callers at the health and docs endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "AI Interviewer API running",
        "health": "/health",
        "docs": "/docs"
    }))
}
