//! 记忆层：单次调用内的对话状态（不做跨调用持久化）

pub mod conversation;

pub use conversation::{Conversation, Message, Role, Turn};
