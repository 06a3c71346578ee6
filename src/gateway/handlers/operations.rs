//! 操作端点处理器
//!
//! 三个 POST 端点：文本生成、翻译、代码补全。
//! 请求体为 JSON；缺省的参数在这一层填充默认值，
//! 未设置的可选参数保持缺失并一路传递到上游。

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use crate::gateway::handlers::error_response;
use crate::gateway::state::AppState;
use crate::providers::openai::{DEFAULT_CHAT_MODEL, DEFAULT_CODE_MODEL, DEFAULT_TEXT_MODEL};
use crate::providers::{GenerationRequest, TranslationRequest};

fn default_temperature() -> f64 {
    0.7
}

/// 生成类端点的请求体（generate_text 和 complete_code 形态相同）
#[derive(Debug, Deserialize)]
pub struct GenerationBody {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub frequency_penalty: f64,
    #[serde(default)]
    pub presence_penalty: f64,
    #[serde(default)]
    pub stop: Option<String>,
}

impl GenerationBody {
    /// 展开成 Provider 请求，model 缺省时使用端点的默认模型
    fn into_request(self, default_model: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt,
            model: self.model.unwrap_or_else(|| default_model.to_string()),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            stop: self.stop,
        }
    }
}

/// POST /api/translate_text 请求体
#[derive(Debug, Deserialize)]
pub struct TranslationBody {
    pub text: String,
    pub target_language: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl TranslationBody {
    fn into_request(self) -> TranslationRequest {
        TranslationRequest {
            text: self.text,
            target_language: self.target_language,
            model: self.model.unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
        }
    }
}

/// POST /api/generate_text 处理器
pub async fn handle_generate_text(
    State(state): State<AppState>,
    Json(body): Json<GenerationBody>,
) -> axum::response::Response {
    let request = body.into_request(DEFAULT_TEXT_MODEL);
    tracing::info!(model = %request.model, "generate_text");

    match state.service().generate_text(&request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /api/translate_text 处理器
pub async fn handle_translate_text(
    State(state): State<AppState>,
    Json(body): Json<TranslationBody>,
) -> axum::response::Response {
    let request = body.into_request();
    tracing::info!(model = %request.model, target = %request.target_language, "translate_text");

    match state.service().translate_text(&request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /api/complete_code 处理器
pub async fn handle_complete_code(
    State(state): State<AppState>,
    Json(body): Json<GenerationBody>,
) -> axum::response::Response {
    let request = body.into_request(DEFAULT_CODE_MODEL);
    tracing::info!(model = %request.model, "complete_code");

    match state.service().complete_code(&request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}
