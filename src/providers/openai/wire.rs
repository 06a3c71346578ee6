//! OpenAI API 线上格式
//!
//! 请求/响应结构与 OpenAI REST API 规范保持一致。
//! 请求结构中未设置的可选字段通过 `skip_serializing_if` 直接省略，
//! 不会以 null 的形式出现在请求体中。
//! 响应结构只声明本服务关心的字段，其余字段一律忽略。

use serde::{Deserialize, Serialize};

/// POST /v1/completions 请求体
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<&'a str>,
}

/// POST /v1/chat/completions 请求体
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
}

/// 对话中的一条消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// POST /v1/completions 响应体
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

/// Completion 响应中的一个候选
#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: Option<String>,
}

/// POST /v1/chat/completions 响应体
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// Chat 响应中的一个候选
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}
