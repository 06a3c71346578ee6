//! 健康检查和版本信息处理器

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;

use crate::gateway::state::AppState;

/// 健康检查响应
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    backend: String,
}

/// GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.service().backend_name().to_string(),
    }))
}
