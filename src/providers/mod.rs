//! Provider 抽象层
//!
//! 定义上游 AI Provider 的统一接口和错误分类。
//! Operation Service 只通过 [`Provider`] trait 访问上游，
//! 测试中可以用桩实现替换真实的 OpenAI Provider。

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::wire::{ChatResponse, CompletionResponse};

/// Provider 调用的错误分类
///
/// - `Upstream`: 上游 API 自身报告了失败（配额、非法请求、服务错误）
/// - `Transport`: 网络层面未能到达上游（连接、超时、读响应体）
/// - `Malformed`: 上游返回了无法解析成预期结构的响应体
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("OpenAI API error {status}: {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to reach OpenAI API: {0}")]
    Transport(String),
    #[error("Malformed OpenAI API response: {0}")]
    Malformed(String),
}

/// 生成类请求参数（文本生成和代码补全共用）
///
/// 不变量：未设置的可选字段在整条链路上保持缺失，
/// 序列化时不会以 null 形式发送给上游
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: f64,
    pub top_p: Option<f64>,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub stop: Option<String>,
}

/// 翻译请求参数
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language: String,
    pub model: String,
}

/// Provider Trait - 上游 AI 服务的统一接口
///
/// 每个方法对应一次上游网络调用，无重试、无缓存。
/// 调用不具备幂等性（temperature 非 0 时上游生成是非确定的）。
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider 名称（用于日志和标识）
    fn name(&self) -> &str;

    /// Completion 风格调用：prompt 原样传递
    async fn generate(&self, request: &GenerationRequest)
        -> Result<CompletionResponse, ProviderError>;

    /// Chat 风格调用：恰好一条 user 消息，内容为固定的翻译指令模板
    async fn translate(&self, request: &TranslationRequest)
        -> Result<ChatResponse, ProviderError>;

    /// 与 `generate` 相同的调用形态，仅默认模型不同
    async fn complete_code(
        &self,
        request: &GenerationRequest,
    ) -> Result<CompletionResponse, ProviderError>;
}
