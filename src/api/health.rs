//! Liveness probe, independent of the lookup pipeline

use axum::response::Json;
use serde_json::{json, Value};

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
