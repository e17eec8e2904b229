use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

/// Liveness banner for load balancers and uptime probes
pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "Server is running",
        "message": "Fitness API is live!"
    }))
}

pub async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "ok",
        "service": "fitlog",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
