//! HTTP 请求处理器

pub mod health;
pub mod operations;

pub use health::handle_health;
pub use operations::{handle_complete_code, handle_generate_text, handle_translate_text};

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::service::ServiceError;

/// 失败响应体：`{"detail": ...}`
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

/// 统一的失败映射
///
/// 扁平策略：不重试、不恢复、不返回部分结果，
/// 每种错误都立即作为 HTTP 500 暴露，detail 为可读文本
fn error_response(err: ServiceError) -> axum::response::Response {
    let detail = err.to_string();
    tracing::warn!("request failed: {}", detail);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { detail })).into_response()
}
