pub mod executor;
pub mod qa;
pub mod registry;

pub use executor::ToolExecutor;
pub use qa::{OpenRouterQaTool, QA_TOOL_DESCRIPTION, QA_TOOL_NAME};
pub use registry::{Tool, ToolRegistry};
