//! Planner：ReAct 推理与 Action 解析
//!
//! 调用 LLM 得到推理文本；parse_action 检查文本中是否有 Action 标记，并提取工具名与参数。

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::core::AgentError;
use crate::llm::{LlmClient, LlmError};
use crate::memory::{Conversation, Message};
use crate::tools::ToolRegistry;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an AI assistant with tool access. Use tools when needed.";

static ACTION_INPUT_RE: OnceLock<Regex> = OnceLock::new();
static OBSERVATION_RE: OnceLock<Regex> = OnceLock::new();

/// 模型请求的一次工具调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// `Action:` 行上写的工具名；未写时为 None，使用默认工具
    pub tool: Option<String>,
    pub input: String,
}

/// 文本中是否含 Action 标记（终止判定只看这一条）
pub fn has_action(text: &str, marker: &str) -> bool {
    text.contains(marker)
}

/// 解析最后一个 Action 标记：
///
/// ```text
/// Action: <tool name>
/// Action Input: <argument>
/// ```
///
/// 没有 `Action Input:` 时，标记之后的全部文本即参数。参数截止到可选的 `Observation:` 行。
/// 无标记返回 Ok(None)；参数为空返回 MalformedAction。
pub fn parse_action(text: &str, marker: &str) -> Result<Option<Action>, AgentError> {
    let Some(idx) = text.rfind(marker) else {
        return Ok(None);
    };
    let after = &text[idx + marker.len()..];

    let input_re = ACTION_INPUT_RE.get_or_init(|| Regex::new(r"(?i)action\s*input\s*:").unwrap());
    let (tool, raw_input) = match input_re.find(after) {
        Some(m) => {
            let name = after[..m.start()].lines().next().unwrap_or("").trim();
            let name = strip_quotes(name);
            let tool = if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            };
            (tool, &after[m.end()..])
        }
        None => (None, after),
    };

    let obs_re = OBSERVATION_RE.get_or_init(|| Regex::new(r"(?mi)^\s*observation\s*:").unwrap());
    let raw_input = match obs_re.find(raw_input) {
        Some(m) => &raw_input[..m.start()],
        None => raw_input,
    };
    let input = strip_quotes(raw_input.trim()).trim();

    if input.is_empty() {
        return Err(AgentError::MalformedAction(format!(
            "empty argument after {marker:?}"
        )));
    }
    Ok(Some(Action {
        tool,
        input: input.to_string(),
    }))
}

/// 去掉成对的首尾引号
fn strip_quotes(s: &str) -> &str {
    for q in ['"', '\'', '`'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// 拼接系统提示词：基础提示 + 可用工具列表 + ReAct 输出格式说明
pub fn build_system_prompt(base: &str, registry: &ToolRegistry, marker: &str) -> String {
    let tools: Vec<String> = registry
        .tool_descriptions()
        .into_iter()
        .map(|(name, desc)| format!("- {name}: {desc}"))
        .collect();
    format!(
        "{base}\n\n\
        You have access to the following tools:\n{tools}\n\n\
        To use a tool, reply in exactly this format:\n\
        Thought: <your reasoning>\n\
        {marker} <tool name>\n\
        Action Input: <the text to send to the tool>\n\n\
        The tool result will follow as the next message. \
        When you can answer directly, reply with the final answer only and do not write \"{marker}\".",
        tools = tools.join("\n"),
    )
}

/// Planner：持有 LLM 与 system prompt，plan 时拼 system + 对话后调用 LLM
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// 请 LLM 在当前对话基础上继续推理
    pub async fn plan(&self, conversation: &Conversation) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(conversation.to_messages());
        self.llm.complete(&messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::memory::Turn;
    use crate::tools::OpenRouterQaTool;

    const MARKER: &str = "Action:";

    #[test]
    fn test_no_marker_is_final_answer() {
        assert_eq!(parse_action("The answer is 42.", MARKER).unwrap(), None);
        assert!(!has_action("The answer is 42.", MARKER));
    }

    #[test]
    fn test_parse_named_action_with_input() {
        let text = "Thought: I should ask.\nAction: OpenRouter QA System\nAction Input: What is the meaning of life?";
        let action = parse_action(text, MARKER).unwrap().unwrap();
        assert_eq!(action.tool.as_deref(), Some("OpenRouter QA System"));
        assert_eq!(action.input, "What is the meaning of life?");
    }

    #[test]
    fn test_parse_stops_at_observation() {
        let text = "Action: OpenRouter QA System\nAction Input: \"capital of France\"\nObservation: Paris";
        let action = parse_action(text, MARKER).unwrap().unwrap();
        assert_eq!(action.input, "capital of France");
    }

    #[test]
    fn test_parse_without_action_input_uses_rest() {
        let action = parse_action("Action: look up the boiling point of water", MARKER)
            .unwrap()
            .unwrap();
        assert_eq!(action.tool, None);
        assert_eq!(action.input, "look up the boiling point of water");
    }

    #[test]
    fn test_last_marker_wins() {
        let text = "Action: A\nAction Input: first\n\nAction: B\nAction Input: second";
        let action = parse_action(text, MARKER).unwrap().unwrap();
        assert_eq!(action.tool.as_deref(), Some("B"));
        assert_eq!(action.input, "second");
    }

    #[test]
    fn test_empty_argument_is_malformed() {
        let err = parse_action("Thought: hmm\nAction:   ", MARKER).unwrap_err();
        assert!(matches!(err, AgentError::MalformedAction(_)));
    }

    #[test]
    fn test_system_prompt_lists_tools_and_marker() {
        let mut registry = ToolRegistry::new();
        registry.register(OpenRouterQaTool::new(Arc::new(MockLlmClient::new())));
        let prompt = build_system_prompt(DEFAULT_SYSTEM_PROMPT, &registry, MARKER);
        assert!(prompt.starts_with(DEFAULT_SYSTEM_PROMPT));
        assert!(prompt.contains(
            "- OpenRouter QA System: Answers questions using OpenRouter's AI models"
        ));
        assert!(prompt.contains("Action: <tool name>"));
    }

    #[tokio::test]
    async fn test_plan_prepends_system_prompt() {
        let mock = Arc::new(MockLlmClient::scripted(vec![Ok("done".to_string())]));
        let planner = Planner::new(mock.clone(), "sys");
        let mut conv = Conversation::seed("q");
        conv.push(Turn::Assistant("a".into()));
        assert_eq!(planner.plan(&conv).await.unwrap(), "done");
        assert_eq!(
            mock.requests()[0],
            vec![
                Message::system("sys"),
                Message::user("q"),
                Message::assistant("a")
            ]
        );
    }
}
