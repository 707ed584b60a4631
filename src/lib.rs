//! Sage - OpenRouter 问答智能体
//!
//! 模块划分：
//! - **agent**: 进程级装配（配置 + LLM 客户端 -> Dispatcher / DirectQuery）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型
//! - **llm**: LLM 客户端抽象与实现（OpenRouter / Mock）
//! - **memory**: 单次调用内的对话状态（Turn / Conversation）
//! - **observability**: 日志初始化
//! - **react**: Planner、ReAct 主循环、直接查询
//! - **tools**: 工具注册表、执行器与问答工具

pub mod agent;
pub mod config;
pub mod core;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod react;
pub mod tools;

pub use agent::AgentComponents;
pub use react::{DirectQuery, Dispatcher, ReactResult};
