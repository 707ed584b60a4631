//! LLM 客户端抽象
//!
//! 所有后端（OpenRouter / Mock）实现 LlmClient：complete 一次性返回完整文本。
//! 失败以 LlmError 区分类型，上层可按类型分支而不必匹配字符串。

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::Message;

/// 补全服务错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// 请求超时（本地超时或传输层超时）
    #[error("request timed out: {0}")]
    Timeout(String),

    /// 连接失败、DNS 等传输错误
    #[error("network error: {0}")]
    Network(String),

    /// API Key 无效或缺失
    #[error("authentication failed: {0}")]
    Auth(String),

    /// 配额 / 限流
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// 服务端返回的其他错误
    #[error("API error: {0}")]
    Api(String),

    /// 响应中没有任何 choice
    #[error("empty response from model")]
    EmptyResponse,
}

/// LLM 客户端 trait：给定消息序列，返回生成文本
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// 模型标识，用于日志
    fn model_name(&self) -> &str {
        "unknown"
    }
}
