//! 认知层：Planner（推理与 Action 解析）、Dispatcher（ReAct 主循环）、直接查询

pub mod direct;
pub mod loop_;
pub mod planner;

pub use direct::{DirectQuery, DIRECT_QUERY_TEMPLATE};
pub use loop_::{Dispatcher, ReactResult, DEFAULT_MAX_STEPS};
pub use planner::{build_system_prompt, parse_action, Action, Planner, DEFAULT_SYSTEM_PROMPT};
