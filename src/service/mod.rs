//! Operation Service
//!
//! 每个公开操作编排一次 Provider 调用，把上游响应归一化成单键结果，
//! 并把 Provider 的失败翻译成 HTTP 层消费的统一错误信号。
//!
//! 这一层不持有跨请求的可变状态：每个请求独立、自包含，
//! 两种终态——归一化结果，或一个带标签的错误。

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::providers::{
    ChatResponse, CompletionResponse, GenerationRequest, Provider, ProviderError,
    TranslationRequest,
};

/// Operation Service 的错误分类
///
/// 所有错误最终都映射成 HTTP 500，但 detail 文本可以区分：
/// - `Upstream`: 上游 API 自身报告的失败（detail 带上游错误前缀）
/// - `Transport`: 网络层面未能到达上游
/// - `Internal`: 本地失败（响应为空、字段缺失、提取失败）
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Internal(String),
}

impl From<ProviderError> for ServiceError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Upstream { .. } => ServiceError::Upstream(err.to_string()),
            ProviderError::Transport(_) => ServiceError::Transport(err.to_string()),
            ProviderError::Malformed(_) => ServiceError::Internal(err.to_string()),
        }
    }
}

/// 归一化结果：`{"text": ...}`
#[derive(Debug, Serialize)]
pub struct GeneratedText {
    pub text: String,
}

/// 归一化结果：`{"translation": ...}`
#[derive(Debug, Serialize)]
pub struct Translation {
    pub translation: String,
}

/// 归一化结果：`{"code": ...}`
#[derive(Debug, Serialize)]
pub struct CodeCompletion {
    pub code: String,
}

/// Operation Service
///
/// 通过 [`Provider`] trait 访问上游，测试中可用桩实现替换
pub struct OperationService {
    backend: Arc<dyn Provider>,
}

impl OperationService {
    pub fn new(backend: Arc<dyn Provider>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// 文本生成：提取 `choices[0].text`
    pub async fn generate_text(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedText, ServiceError> {
        let response = self.backend.generate(request).await?;
        Ok(GeneratedText {
            text: first_completion_text(response)?,
        })
    }

    /// 翻译：提取 `choices[0].message.content`
    pub async fn translate_text(
        &self,
        request: &TranslationRequest,
    ) -> Result<Translation, ServiceError> {
        let response = self.backend.translate(request).await?;
        Ok(Translation {
            translation: first_chat_content(response)?,
        })
    }

    /// 代码补全：提取 `choices[0].text`
    pub async fn complete_code(
        &self,
        request: &GenerationRequest,
    ) -> Result<CodeCompletion, ServiceError> {
        let response = self.backend.complete_code(request).await?;
        Ok(CodeCompletion {
            code: first_completion_text(response)?,
        })
    }
}

/// 提取 completion 响应中第一个候选的文本
///
/// choices 为空或候选缺少 text 字段时返回 `Internal`，不允许越界崩溃
fn first_completion_text(response: CompletionResponse) -> Result<String, ServiceError> {
    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Internal("OpenAI API response contained no choices".into()))?
        .text
        .ok_or_else(|| ServiceError::Internal("OpenAI API response choice contained no text".into()))
}

/// 提取 chat 响应中第一条消息的内容
fn first_chat_content(response: ChatResponse) -> Result<String, ServiceError> {
    Ok(response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Internal("OpenAI API response contained no choices".into()))?
        .message
        .content)
}
