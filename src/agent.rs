//! 进程级装配
//!
//! 启动时构造一次配置与 LLM 客户端（无全局状态），再按需组装 Dispatcher 或 DirectQuery；
//! 两者共享同一个 Arc<dyn LlmClient>，随进程退出一起释放。

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{load_config, AppConfig};
use crate::core::AgentError;
use crate::llm::{LlmClient, OpenRouterClient};
use crate::react::{DirectQuery, Dispatcher};

/// 启动期组件：配置 + 已认证的补全客户端
pub struct AgentComponents {
    pub config: AppConfig,
    pub llm: Arc<dyn LlmClient>,
}

impl AgentComponents {
    /// 加载 .env（若存在）与配置，构造 OpenRouter 客户端
    pub fn bootstrap(config_path: Option<PathBuf>) -> Result<Self, AgentError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        let config =
            load_config(config_path).map_err(|e| AgentError::ConfigError(e.to_string()))?;
        let llm: Arc<dyn LlmClient> = Arc::new(OpenRouterClient::from_config(&config.llm)?);
        tracing::info!(model = %llm.model_name(), "completion client ready");
        Ok(Self { config, llm })
    }

    /// 用任意客户端（如 Mock）组装
    pub fn with_client(config: AppConfig, llm: Arc<dyn LlmClient>) -> Self {
        Self { config, llm }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::from_config(self.llm.clone(), &self.config)
    }

    pub fn direct_query(&self) -> DirectQuery {
        DirectQuery::new(self.llm.clone())
    }
}
