//! 工具注册表
//!
//! 所有工具实现 Tool trait（name / description / invoke），由 ToolRegistry 按名注册与查找，
//! ToolExecutor 在调用时加超时并输出审计日志。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::AgentError;

/// 工具 trait：名称、描述（供 LLM 理解）、异步调用（文本进，文本出）
#[async_trait]
pub trait Tool: Send + Sync {
    /// 工具名称（对应 ReAct 输出中 `Action:` 后的名字）
    fn name(&self) -> &str;

    /// 工具描述（写入系统提示词）
    fn description(&self) -> &str;

    /// 调用工具；失败原样返回，不做重试
    async fn invoke(&self, input: &str) -> Result<String, AgentError>;
}

/// 工具注册表：按名称存储 Arc<dyn Tool>
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.register_arc(Arc::new(tool));
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// 精确匹配优先，其次忽略大小写与首尾空白
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        if let Some(tool) = self.tools.get(name) {
            return Some(tool.clone());
        }
        let wanted = name.trim();
        self.tools
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(wanted))
            .map(|(_, t)| t.clone())
    }

    /// 仅注册了一个工具时返回它（Action 未写工具名时使用）
    pub fn default_tool(&self) -> Option<Arc<dyn Tool>> {
        if self.tools.len() == 1 {
            self.tools.values().next().cloned()
        } else {
            None
        }
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// 返回按名称排序的 (name, description) 列表，用于生成 prompt 中的工具段落
    pub fn tool_descriptions(&self) -> Vec<(String, String)> {
        let mut list: Vec<(String, String)> = self
            .tools
            .iter()
            .map(|(name, tool)| (name.clone(), tool.description().to_string()))
            .collect();
        list.sort();
        list
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}
