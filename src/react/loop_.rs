//! ReAct 主循环（Dispatcher）
//!
//! 固定两节点图：Agent 推理 -> 若最新回复含 Action 标记则进入 Tools 执行工具 -> 回到 Agent；
//! 不含标记即结束，该回复就是最终答案。每步向对话追加恰好一轮，步数上限防止死循环。

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::core::AgentError;
use crate::llm::LlmClient;
use crate::memory::{Conversation, Turn};
use crate::react::planner::{
    build_system_prompt, has_action, parse_action, Action, Planner, DEFAULT_SYSTEM_PROMPT,
};
use crate::tools::executor::preview;
use crate::tools::{OpenRouterQaTool, ToolExecutor, ToolRegistry};

/// 单次调用默认最大步数
pub const DEFAULT_MAX_STEPS: usize = 10;

/// 一次 Dispatcher 调用的结果：最终回复、完整对话与实际步数
#[derive(Debug, Clone)]
pub struct ReactResult {
    pub response: String,
    pub turns: Vec<Turn>,
    pub steps: usize,
}

/// 图节点；Agent / Tools 对应 Running，End 对应 Done
#[derive(Debug)]
enum Node {
    Agent,
    Tools(Action),
    End(String),
}

/// Dispatcher：持有 Planner 与工具执行器，每次 run 独占一份新的 Conversation
pub struct Dispatcher {
    planner: Planner,
    executor: ToolExecutor,
    action_marker: String,
    max_steps: usize,
}

impl Dispatcher {
    pub fn new(
        planner: Planner,
        executor: ToolExecutor,
        action_marker: impl Into<String>,
        max_steps: usize,
    ) -> Self {
        Self {
            planner,
            executor,
            action_marker: action_marker.into(),
            max_steps,
        }
    }

    /// 按配置组装：注册唯一的问答工具（与 Agent 共用同一个 LLM 客户端）并生成系统提示词
    pub fn from_config(llm: Arc<dyn LlmClient>, cfg: &AppConfig) -> Self {
        let mut registry = ToolRegistry::new();
        registry.register(OpenRouterQaTool::new(llm.clone()));

        let base = cfg
            .agent
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        let system_prompt = build_system_prompt(base, &registry, &cfg.agent.action_marker);

        Self::new(
            Planner::new(llm, system_prompt),
            ToolExecutor::new(registry, cfg.tools.tool_timeout_secs),
            cfg.agent.action_marker.clone(),
            cfg.agent.max_steps,
        )
    }

    /// 执行一次完整的 ReAct 循环，错误以 AgentError 返回
    pub async fn run(&self, question: &str) -> Result<ReactResult, AgentError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", %run_id, model = %self.planner.model_name());
        self.run_inner(question).instrument(span).await
    }

    /// 顶层保护：任何错误只在这里捕获一次，转为 "Error processing request: <message>"
    pub async fn safe_query(&self, question: &str) -> String {
        match self.run(question).await {
            Ok(result) => result.response,
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind(), "dispatch failed");
                e.user_message()
            }
        }
    }

    async fn run_inner(&self, question: &str) -> Result<ReactResult, AgentError> {
        let mut conversation = Conversation::seed(question);
        let mut node = Node::Agent;
        let mut steps = 0;
        tracing::info!(question = %question, "dispatch started");

        let response = loop {
            if !matches!(node, Node::End(_)) && steps >= self.max_steps {
                let last_output = conversation.last().text().to_string();
                tracing::warn!(max_steps = self.max_steps, "step limit reached");
                return Err(AgentError::StepLimitExceeded {
                    max_steps: self.max_steps,
                    last_output,
                });
            }

            node = match node {
                Node::Agent => {
                    let output = self.planner.plan(&conversation).await?;
                    steps += 1;
                    tracing::debug!(step = steps, output = %preview(&output), "agent");
                    conversation.push(Turn::Assistant(output));
                    self.route(&conversation)?
                }
                Node::Tools(action) => {
                    let (tool, observation) = self
                        .executor
                        .execute(action.tool.as_deref(), &action.input)
                        .await?;
                    steps += 1;
                    tracing::debug!(step = steps, tool = %tool, observation = %preview(&observation), "tools");
                    conversation.push(Turn::Assistant(observation));
                    Node::Agent
                }
                Node::End(answer) => break answer,
            };
        };

        tracing::info!(steps, "dispatch finished");
        Ok(ReactResult {
            response,
            turns: conversation.into_turns(),
            steps,
        })
    }

    /// 终止判定：最新一轮为助手回复且含 Action 标记 -> Tools，否则 -> End
    fn route(&self, conversation: &Conversation) -> Result<Node, AgentError> {
        match conversation.last() {
            Turn::Assistant(text) if has_action(text, &self.action_marker) => {
                match parse_action(text, &self.action_marker)? {
                    // 只写了工具名、没有参数
                    Some(Action { tool: None, input }) if self.executor.is_tool_name(&input) => {
                        Err(AgentError::MalformedAction(format!(
                            "tool {input:?} named without an argument"
                        )))
                    }
                    Some(action) => Ok(Node::Tools(action)),
                    None => Ok(Node::End(text.clone())),
                }
            }
            Turn::Assistant(text) => Ok(Node::End(text.clone())),
            Turn::Human(text) => Ok(Node::End(text.clone())),
        }
    }
}
