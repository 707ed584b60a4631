//! LLM 层：客户端抽象与实现（OpenRouter / Mock）

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::{AlwaysLlmClient, MockLlmClient};
pub use openai::OpenRouterClient;
pub use traits::{LlmClient, LlmError};
