//! Sage 直接查询入口：无工具，对固定示例问题做一次补全并打印答案（或错误字符串）

use anyhow::Context;
use sage::{observability, AgentComponents};

const EXAMPLE_QUESTION: &str = "What is the capital of France?";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let components = AgentComponents::bootstrap(None).context("Failed to create client")?;
    let direct = components.direct_query();

    println!("Question: {EXAMPLE_QUESTION}");
    let answer = direct.safe_query(EXAMPLE_QUESTION).await;
    println!("\nFinal Answer: {answer}");

    Ok(())
}
