//! OpenRouter 问答工具
//!
//! 把补全服务包装成一个普通工具：输入原样作为单条 Human 消息发送，返回模型文本。
//! 调用前后各打一行诊断日志；补全失败不做捕获与重试，错误原样上抛。

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::AgentError;
use crate::llm::LlmClient;
use crate::memory::Turn;
use crate::tools::executor::preview;
use crate::tools::Tool;

pub const QA_TOOL_NAME: &str = "OpenRouter QA System";
pub const QA_TOOL_DESCRIPTION: &str = "Answers questions using OpenRouter's AI models";

/// 问答工具：与 Dispatcher 共享同一个 LLM 客户端
pub struct OpenRouterQaTool {
    llm: Arc<dyn LlmClient>,
}

impl OpenRouterQaTool {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Tool for OpenRouterQaTool {
    fn name(&self) -> &str {
        QA_TOOL_NAME
    }

    fn description(&self) -> &str {
        QA_TOOL_DESCRIPTION
    }

    async fn invoke(&self, query: &str) -> Result<String, AgentError> {
        tracing::info!(tool = QA_TOOL_NAME, query = %query, "tool executing");
        let prompt = [Turn::Human(query.to_string()).to_message()];
        let response = self.llm.complete(&prompt).await?;
        tracing::info!(tool = QA_TOOL_NAME, response = %preview(&response), "tool response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockLlmClient};
    use crate::memory::Message;

    #[tokio::test]
    async fn test_forwards_query_verbatim_as_single_human_turn() {
        let mock = Arc::new(MockLlmClient::scripted(vec![Ok("42".to_string())]));
        let tool = OpenRouterQaTool::new(mock.clone());
        let out = tool.invoke("  What is 6 * 7?  ").await.unwrap();
        assert_eq!(out, "42");
        assert_eq!(mock.requests(), vec![vec![Message::user("  What is 6 * 7?  ")]]);
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let mock = Arc::new(MockLlmClient::scripted(vec![Err(LlmError::RateLimited(
            "quota exhausted".into(),
        ))]));
        let tool = OpenRouterQaTool::new(mock);
        let err = tool.invoke("q").await.unwrap_err();
        assert_eq!(
            err,
            AgentError::Llm(LlmError::RateLimited("quota exhausted".into()))
        );
    }
}
