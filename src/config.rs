//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `SAGE__*` 覆盖（双下划线表示嵌套，如 `SAGE__LLM__MODEL=openai/gpt-4o-mini`）。
//! OpenRouter 约定的 `OPENROUTER_API_KEY`、`SITE_URL`、`SITE_NAME` 在配置未显式给出时作为回退。

use std::path::PathBuf;

use serde::Deserialize;

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SITE_NAME: &str = "LangGraph Agent";

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_SITE_URL: &str = "SITE_URL";
pub const ENV_SITE_NAME: &str = "SITE_NAME";

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmSection,
    pub agent: AgentSection,
    pub tools: ToolsSection,
}

/// [llm] 段：端点、模型与采样参数、超时、OpenRouter 描述性请求头
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// 单次补全请求超时（秒）
    pub request_timeout_secs: u64,
    /// 未设置时读取 OPENROUTER_API_KEY
    pub api_key: Option<String>,
    /// HTTP-Referer；未设置时读取 SITE_URL
    pub site_url: Option<String>,
    /// X-Title；未设置时读取 SITE_NAME
    pub site_name: Option<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            base_url: OPENROUTER_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 512,
            request_timeout_secs: 60,
            api_key: None,
            site_url: None,
            site_name: None,
        }
    }
}

impl LlmSection {
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(ENV_API_KEY).ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn site_url(&self) -> String {
        resolve(
            self.site_url.as_deref(),
            std::env::var(ENV_SITE_URL).ok(),
            DEFAULT_SITE_URL,
        )
    }

    pub fn site_name(&self) -> String {
        resolve(
            self.site_name.as_deref(),
            std::env::var(ENV_SITE_NAME).ok(),
            DEFAULT_SITE_NAME,
        )
    }
}

/// 显式配置 > 环境变量 > 默认值
fn resolve(configured: Option<&str>, from_env: Option<String>, default: &str) -> String {
    configured
        .map(String::from)
        .or(from_env)
        .unwrap_or_else(|| default.to_string())
}

/// [agent] 段：ReAct 循环的步数上限、Action 标记与系统提示词
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    /// 单次调用最多追加的轮数，防止模型一直输出 Action 导致死循环
    pub max_steps: usize,
    pub action_marker: String,
    /// 覆盖默认系统提示词的开头一段
    pub system_prompt: Option<String>,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            max_steps: 10,
            action_marker: "Action:".to_string(),
            system_prompt: None,
        }
    }
}

/// [tools] 段：工具调用超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// 单次工具调用超时（秒），应大于 llm.request_timeout_secs
    pub tool_timeout_secs: u64,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            tool_timeout_secs: 90,
        }
    }
}

/// 从 config 目录加载配置，环境变量 SAGE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 SAGE__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SAGE")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
