// src/handlers/mod.rs

pub mod community;
pub mod quiz;
pub mod session;

use axum::{Json, response::IntoResponse};

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
