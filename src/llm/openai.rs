//! OpenRouter 客户端（OpenAI 兼容 API）
//!
//! 通过 async_openai 调用 OpenRouter 端点：Bearer Key 取自 OPENROUTER_API_KEY，
//! 附带 HTTP-Referer / X-Title 两个描述性请求头；模型、temperature、max_tokens 每次请求固定传入。
//! 每次请求受 request_timeout_secs 限制，超时返回 LlmError::Timeout。

use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::{LlmSection, ENV_API_KEY};
use crate::core::AgentError;
use crate::llm::{LlmClient, LlmError};
use crate::memory::{Message, Role};

/// OpenRouter 客户端：进程启动时构造一次，以 Arc 传给 Dispatcher 与工具
pub struct OpenRouterClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenRouterClient {
    /// 从 [llm] 配置构造；缺少 API Key 或请求头非法时返回 ConfigError
    pub fn from_config(cfg: &LlmSection) -> Result<Self, AgentError> {
        let api_key = cfg
            .api_key()
            .ok_or_else(|| AgentError::ConfigError(format!("{ENV_API_KEY} is not set")))?;

        let headers = openrouter_headers(&cfg.site_url(), &cfg.site_name())?;
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AgentError::ConfigError(format!("HTTP client: {e}")))?;

        let config = OpenAIConfig::new()
            .with_api_base(cfg.base_url.as_str())
            .with_api_key(api_key);

        tracing::debug!(
            base_url = %cfg.base_url,
            model = %cfg.model,
            "OpenRouter client configured"
        );

        Ok(Self {
            client: Client::with_config(config).with_http_client(http),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            timeout: Duration::from_secs(cfg.request_timeout_secs),
        })
    }

    fn to_openai_messages(
        &self,
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
        messages
            .iter()
            .map(|m| -> Result<ChatCompletionRequestMessage, OpenAIError> {
                Ok(match m.role {
                    Role::System => ChatCompletionRequestMessage::System(
                        ChatCompletionRequestSystemMessageArgs::default()
                            .content(m.content.clone())
                            .build()?,
                    ),
                    Role::User => ChatCompletionRequestMessage::User(
                        ChatCompletionRequestUserMessageArgs::default()
                            .content(m.content.clone())
                            .build()?,
                    ),
                    Role::Assistant => ChatCompletionRequestMessage::Assistant(
                        ChatCompletionRequestAssistantMessageArgs::default()
                            .content(m.content.clone())
                            .build()?,
                    ),
                })
            })
            .collect()
    }

    /// 每次请求都带上固定的 model / temperature / max_tokens
    #[allow(deprecated)]
    fn build_request(&self, messages: &[Message]) -> Result<CreateChatCompletionRequest, LlmError> {
        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.to_openai_messages(messages).map_err(map_openai_error)?)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(map_openai_error)
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = self.build_request(messages)?;

        tracing::debug!(model = %self.model, messages = messages.len(), "chat completion request");

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                LlmError::Timeout(format!(
                    "no response from {} within {}s",
                    self.model,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(map_openai_error)?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }

        let choice = response.choices.first().ok_or(LlmError::EmptyResponse)?;
        Ok(choice.message.content.clone().unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// HTTP-Referer / X-Title 请求头
fn openrouter_headers(site_url: &str, site_name: &str) -> Result<HeaderMap, AgentError> {
    let value = |v: &str| {
        HeaderValue::from_str(v)
            .map_err(|e| AgentError::ConfigError(format!("invalid header value {v:?}: {e}")))
    };
    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static("http-referer"), value(site_url)?);
    headers.insert(HeaderName::from_static("x-title"), value(site_name)?);
    Ok(headers)
}

fn map_openai_error(err: OpenAIError) -> LlmError {
    match err {
        OpenAIError::Reqwest(e) if e.is_timeout() => LlmError::Timeout(e.to_string()),
        OpenAIError::Reqwest(e) => LlmError::Network(e.to_string()),
        OpenAIError::ApiError(api) => classify_api_message(api.message),
        other => classify_api_message(other.to_string()),
    }
}

/// 按错误文本归类：鉴权 / 限流 / 其他 API 错误
fn classify_api_message(message: String) -> LlmError {
    let lower = message.to_lowercase();
    if lower.contains("401")
        || lower.contains("unauthorized")
        || lower.contains("auth")
        || lower.contains("api key")
    {
        LlmError::Auth(message)
    } else if lower.contains("429") || lower.contains("rate limit") || lower.contains("quota") {
        LlmError::RateLimited(message)
    } else {
        LlmError::Api(message)
    }
}
