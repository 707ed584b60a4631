//! Sage - ReAct 智能体入口
//!
//! 初始化日志与组件，对固定示例问题跑一次 Dispatcher 并打印答案（或错误字符串）。

use anyhow::Context;
use sage::{observability, AgentComponents};

const EXAMPLE_QUESTION: &str = "What is the meaning of life according to AI?";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let components = AgentComponents::bootstrap(None).context("Failed to create agent")?;
    let dispatcher = components.dispatcher();

    println!("Question: {EXAMPLE_QUESTION}");
    let answer = dispatcher.safe_query(EXAMPLE_QUESTION).await;
    println!("\nFinal Answer: {answer}");

    Ok(())
}
