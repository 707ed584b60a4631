//! 工具执行器
//!
//! 持有 ToolRegistry 与全局超时，execute(tool_name, input) 在超时内调用工具；
//! 工具自身的错误原样向上传递，超时转为 ToolTimeout；每次调用输出结构化审计日志（JSON）。

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::core::AgentError;
use crate::tools::{Tool, ToolRegistry};

/// Observation / 输入预览最大字符数
const PREVIEW_CHARS: usize = 200;

/// 工具执行器：解析工具名并对每次调用施加超时
pub struct ToolExecutor {
    registry: ToolRegistry,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, timeout_secs: u64) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// 按名查找；未给名字时使用唯一注册的工具
    pub fn resolve(&self, tool_name: Option<&str>) -> Result<Arc<dyn Tool>, AgentError> {
        match tool_name {
            Some(name) => self.registry.get(name).ok_or_else(|| {
                tracing::warn!(tool = %name, available = ?self.registry.tool_names(), "unknown tool");
                AgentError::UnknownTool(name.to_string())
            }),
            None => self.registry.default_tool().ok_or_else(|| {
                AgentError::MalformedAction(format!(
                    "no tool named and {} tools registered",
                    self.registry.len()
                ))
            }),
        }
    }

    /// 执行工具；返回 (实际工具名, 输出)
    pub async fn execute(
        &self,
        tool_name: Option<&str>,
        input: &str,
    ) -> Result<(String, String), AgentError> {
        let tool = self.resolve(tool_name)?;
        let name = tool.name().to_string();
        let start = Instant::now();
        let result = timeout(self.timeout, tool.invoke(input)).await;

        let (ok, outcome): (bool, &str) = match &result {
            Ok(Ok(_)) => (true, "ok"),
            Ok(Err(_)) => (false, "error"),
            Err(_) => (false, "timeout"),
        };
        let duration_ms = start.elapsed().as_millis() as u64;
        let audit = serde_json::json!({
            "event": "tool_audit",
            "tool": name,
            "ok": ok,
            "outcome": outcome,
            "duration_ms": duration_ms,
            "input_preview": preview(input),
        });
        tracing::info!(audit = %audit.to_string(), "tool");

        match result {
            Ok(Ok(content)) => Ok((name, content)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AgentError::ToolTimeout(name)),
        }
    }

    /// 文本是否恰好是某个已注册工具的名字
    pub fn is_tool_name(&self, text: &str) -> bool {
        self.registry.get(text).is_some()
    }
}

pub(crate) fn preview(s: &str) -> String {
    if s.chars().count() > PREVIEW_CHARS {
        format!("{}...", s.chars().take(PREVIEW_CHARS).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use async_trait::async_trait;

    struct Slow;

    #[async_trait]
    impl Tool for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        fn description(&self) -> &str {
            "never finishes in time"
        }

        async fn invoke(&self, _input: &str) -> Result<String, AgentError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".into())
        }
    }

    struct Broken;

    #[async_trait]
    impl Tool for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        async fn invoke(&self, _input: &str) -> Result<String, AgentError> {
            Err(LlmError::Auth("invalid key".into()).into())
        }
    }

    fn executor_with(tool: impl Tool + 'static, timeout_secs: u64) -> ToolExecutor {
        let mut registry = ToolRegistry::new();
        registry.register(tool);
        ToolExecutor::new(registry, timeout_secs)
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_maps_to_tool_timeout() {
        let executor = executor_with(Slow, 1);
        let err = executor.execute(Some("slow"), "x").await.unwrap_err();
        assert_eq!(err, AgentError::ToolTimeout("slow".into()));
    }

    #[tokio::test]
    async fn test_tool_error_propagates_unchanged() {
        let executor = executor_with(Broken, 5);
        let err = executor.execute(None, "x").await.unwrap_err();
        assert_eq!(err, AgentError::Llm(LlmError::Auth("invalid key".into())));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let executor = executor_with(Broken, 5);
        let err = executor.execute(Some("search"), "x").await.unwrap_err();
        assert_eq!(err, AgentError::UnknownTool("search".into()));
    }

    #[test]
    fn test_is_tool_name() {
        let executor = executor_with(Broken, 5);
        assert!(executor.is_tool_name("broken"));
        assert!(executor.is_tool_name(" BROKEN "));
        assert!(!executor.is_tool_name("what is broken?"));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "界".repeat(300);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }
}
