//! OpenAI Provider
//!
//! 负责把归一化的请求参数翻译成 OpenAI API 期望的调用形态：
//! - 文本生成 / 代码补全：completion 风格（`/v1/completions`）
//! - 翻译：chat 风格（`/v1/chat/completions`），恰好一条 user 消息
//!
//! 每次调用是一次出站网络请求，无重试。

pub mod wire;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::OpenAiSettings;
use crate::providers::{GenerationRequest, Provider, ProviderError, TranslationRequest};
use wire::{ChatMessage, ChatRequest, ChatResponse, CompletionRequest, CompletionResponse};

/// 文本生成的默认模型
pub const DEFAULT_TEXT_MODEL: &str = "text-davinci-003";
/// 翻译的默认模型
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
/// 代码补全的默认模型
pub const DEFAULT_CODE_MODEL: &str = "code-davinci-002";

const COMPLETIONS_PATH: &str = "/v1/completions";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// API 请求超时（秒）
const API_TIMEOUT_SECS: u64 = 120;

/// OpenAI Provider
///
/// 持有一个进程启动时构造的可复用 HTTP 客户端和 API 凭证。
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(settings: &OpenAiSettings) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(API_TIMEOUT_SECS))
            .build()
            .expect("Failed to create OpenAI API client");

        Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 发送请求的公共逻辑
    ///
    /// 状态码非 2xx 时返回 `Upstream`（附带响应体文本），
    /// 网络层失败返回 `Transport`，响应体解析失败返回 `Malformed`
    async fn post_json<T, R>(&self, path: &str, body: &T) -> Result<R, ProviderError>
    where
        T: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                status,
                body: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

/// 从生成类请求构造 completion 请求体
///
/// 未设置的可选字段保持缺失，序列化时不会出现在请求体中
fn completion_body(request: &GenerationRequest) -> CompletionRequest<'_> {
    CompletionRequest {
        model: &request.model,
        prompt: &request.prompt,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        top_p: request.top_p,
        frequency_penalty: request.frequency_penalty,
        presence_penalty: request.presence_penalty,
        stop: request.stop.as_deref(),
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        tracing::debug!(model = %request.model, "completion request");
        self.post_json(COMPLETIONS_PATH, &completion_body(request))
            .await
    }

    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<ChatResponse, ProviderError> {
        // 指令模板是固定契约，target_language 原样嵌入，不做校验
        let content = format!(
            "Translate this text into {}: {}",
            request.target_language, request.text
        );

        let body = ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
        };

        tracing::debug!(model = %request.model, "chat request");
        self.post_json(CHAT_COMPLETIONS_PATH, &body).await
    }

    async fn complete_code(
        &self,
        request: &GenerationRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        // 与 generate 完全相同的调用形态，"这是代码" 只体现在模型选择上
        tracing::debug!(model = %request.model, "completion request");
        self.post_json(COMPLETIONS_PATH, &completion_body(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(base_url: String) -> OpenAiProvider {
        OpenAiProvider::new(&OpenAiSettings {
            api_key: "test-key".to_string(),
            base_url,
        })
    }

    fn generation_request() -> GenerationRequest {
        GenerationRequest {
            prompt: "Write a short sentence.".to_string(),
            model: DEFAULT_TEXT_MODEL.to_string(),
            max_tokens: None,
            temperature: 0.7,
            top_p: None,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: None,
        }
    }

    async fn mount_completion(server: &MockServer, text: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "choices": [{ "text": text }]
                })),
            )
            .mount(server)
            .await;
    }

    async fn received_body(server: &MockServer) -> Value {
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        serde_json::from_slice(&requests[0].body).unwrap()
    }

    #[tokio::test]
    async fn generate_omits_unset_optional_fields() {
        let server = MockServer::start().await;
        mount_completion(&server, "ok").await;

        let provider = provider_for(server.uri());
        provider.generate(&generation_request()).await.unwrap();

        let body = received_body(&server).await;
        assert_eq!(body["model"], DEFAULT_TEXT_MODEL);
        assert_eq!(body["prompt"], "Write a short sentence.");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["frequency_penalty"], 0.0);
        assert_eq!(body["presence_penalty"], 0.0);
        // 缺失必须保持缺失，不能以 null 发送
        let object = body.as_object().unwrap();
        assert!(!object.contains_key("max_tokens"));
        assert!(!object.contains_key("top_p"));
        assert!(!object.contains_key("stop"));
    }

    #[tokio::test]
    async fn generate_sends_optional_fields_when_set() {
        let server = MockServer::start().await;
        mount_completion(&server, "ok").await;

        let request = GenerationRequest {
            max_tokens: Some(64),
            top_p: Some(0.9),
            stop: Some("\n".to_string()),
            ..generation_request()
        };
        provider_for(server.uri()).generate(&request).await.unwrap();

        let body = received_body(&server).await;
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["top_p"], 0.9);
        assert_eq!(body["stop"], "\n");
    }

    #[tokio::test]
    async fn translate_sends_fixed_instruction_template() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "Bonjour" } }]
                })),
            )
            .mount(&server)
            .await;

        let request = TranslationRequest {
            text: "This is a translation.".to_string(),
            target_language: "fr".to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
        };
        provider_for(server.uri()).translate(&request).await.unwrap();

        let body = received_body(&server).await;
        assert_eq!(body["model"], DEFAULT_CHAT_MODEL);
        assert_eq!(
            body["messages"],
            json!([{
                "role": "user",
                "content": "Translate this text into fr: This is a translation."
            }])
        );
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = provider_for(server.uri())
            .generate(&generation_request())
            .await
            .unwrap_err();

        match err {
            ProviderError::Upstream { status, body } => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_upstream_is_transport_error() {
        // 没有监听者的端口，连接直接失败
        let provider = provider_for("http://127.0.0.1:9".to_string());
        let err = provider.generate(&generation_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider_for(server.uri())
            .generate(&generation_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}
