//! 直接查询：无工具、无循环的一问一答
//!
//! 用固定模板包装问题，作为单条 Human 消息提交一次，去掉首尾空白后返回。

use std::sync::Arc;

use crate::core::AgentError;
use crate::llm::LlmClient;
use crate::memory::Turn;

pub const DIRECT_QUERY_TEMPLATE: &str =
    "Answer the following question concisely and accurately.\n\nQuestion: {question}";

pub struct DirectQuery {
    llm: Arc<dyn LlmClient>,
    template: String,
}

impl DirectQuery {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            template: DIRECT_QUERY_TEMPLATE.to_string(),
        }
    }

    /// 替换模板；`{question}` 为问题占位符
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn render(&self, question: &str) -> String {
        self.template.replace("{question}", question)
    }

    pub async fn ask(&self, question: &str) -> Result<String, AgentError> {
        let prompt = [Turn::Human(self.render(question)).to_message()];
        let answer = self.llm.complete(&prompt).await?;
        Ok(answer.trim().to_string())
    }

    /// 顶层保护：失败时返回 "Error processing request: <message>"
    pub async fn safe_query(&self, question: &str) -> String {
        match self.ask(question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind(), "direct query failed");
                e.user_message()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::llm::{AlwaysLlmClient, LlmError, MockLlmClient};
    use crate::memory::Message;

    #[tokio::test]
    async fn test_answer_is_trimmed() {
        let mock = Arc::new(AlwaysLlmClient::ok("\n  Paris is the capital of France.  \n"));
        let direct = DirectQuery::new(mock.clone());
        assert_eq!(
            direct.safe_query("What is the capital of France?").await,
            "Paris is the capital of France."
        );
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_prompt_is_single_templated_human_turn() {
        let mock = Arc::new(MockLlmClient::scripted(vec![Ok("ok".to_string())]));
        let direct = DirectQuery::new(mock.clone()).with_template("Q: {question}");
        direct.ask("why?").await.unwrap();
        assert_eq!(mock.requests(), vec![vec![Message::user("Q: why?")]]);
    }

    #[tokio::test]
    async fn test_timeout_becomes_error_string() {
        let mock = Arc::new(AlwaysLlmClient::err(LlmError::Timeout(
            "no response within 60s".into(),
        )));
        let direct = DirectQuery::new(mock);
        let err = direct.ask("q").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(
            direct.safe_query("q").await,
            "Error processing request: request timed out: no response within 60s"
        );
    }
}
