//! Liveness endpoints

use crate::api::response::ApiResponse;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "MediaVault API";

/// GET /api/v1/health
pub async fn health_check() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(
        "Health check successful",
        json!({
            "status": "UP",
            "timestamp": Utc::now().to_rfc3339(),
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        }),
    ))
}

/// GET /api/v1/health/ping
pub async fn ping() -> &'static str {
    "pong"
}

/// GET /api/v1/health/info
pub async fn info() -> Json<Value> {
    Json(json!({
        "application": "MediaVault",
        "description": "Media catalog backend with token authentication",
        "version": env!("CARGO_PKG_VERSION"),
        "os": std::env::consts::OS,
    }))
}
