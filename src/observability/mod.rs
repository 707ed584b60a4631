//! 可观测性：tracing 日志初始化（默认 info，RUST_LOG 覆盖）

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // 日志输出到 stderr，stdout 只留问题与答案
    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
    {
        // 已有全局 subscriber（如测试中重复调用），沿用现有的
        tracing::debug!(error = %e, "tracing subscriber already initialized");
    }
}
