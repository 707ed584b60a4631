//! Agent 错误类型
//!
//! 库内部全部以 AgentError 返回；只有入口处的 safe_query 把它渲染成面向用户的字符串。

use thiserror::Error;

use crate::llm::LlmError;

/// 面向用户的错误前缀
pub const ERROR_PREFIX: &str = "Error processing request: ";

/// Agent 运行过程中可能出现的错误（补全服务、工具、循环控制、配置）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Malformed action: {0}")]
    MalformedAction(String),

    #[error("Tool timeout: {0}")]
    ToolTimeout(String),

    /// 达到步数上限仍未得到最终回复，附最后一轮模型输出
    #[error("Step limit of {max_steps} reached without a final answer")]
    StepLimitExceeded { max_steps: usize, last_output: String },

    #[error("Config error: {0}")]
    ConfigError(String),
}

/// 错误大类，供调用方分支（不必匹配错误文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Network,
    Auth,
    RateLimited,
    Api,
    MalformedResponse,
    Tool,
    StepLimit,
    Config,
}

impl AgentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AgentError::Llm(e) => match e {
                LlmError::Timeout(_) => ErrorKind::Timeout,
                LlmError::Network(_) => ErrorKind::Network,
                LlmError::Auth(_) => ErrorKind::Auth,
                LlmError::RateLimited(_) => ErrorKind::RateLimited,
                LlmError::Api(_) => ErrorKind::Api,
                LlmError::EmptyResponse => ErrorKind::MalformedResponse,
            },
            AgentError::UnknownTool(_) | AgentError::ToolTimeout(_) => ErrorKind::Tool,
            AgentError::MalformedAction(_) => ErrorKind::MalformedResponse,
            AgentError::StepLimitExceeded { .. } => ErrorKind::StepLimit,
            AgentError::ConfigError(_) => ErrorKind::Config,
        }
    }

    /// 渲染为 "Error processing request: <message>"
    pub fn user_message(&self) -> String {
        format!("{ERROR_PREFIX}{self}")
    }
}
