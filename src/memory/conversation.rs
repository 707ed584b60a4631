//! 短期记忆：单次调用内的对话状态
//!
//! Turn 为 Human / Assistant 两种标签的消息；Conversation 只追加、不删除，
//! 由一次 Dispatcher 调用独占，调用结束即随结果返回或丢弃。

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
}

/// 发给 LLM 的单条消息
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// 对话中的一轮：用户提问或助手回复（含工具结果）
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    Human(String),
    Assistant(String),
}

impl Turn {
    pub fn text(&self) -> &str {
        match self {
            Turn::Human(text) | Turn::Assistant(text) => text,
        }
    }

    pub fn is_assistant(&self) -> bool {
        match self {
            Turn::Human(_) => false,
            Turn::Assistant(_) => true,
        }
    }

    /// 转为 LLM 消息：Human -> User，Assistant -> Assistant
    pub fn to_message(&self) -> Message {
        match self {
            Turn::Human(text) => Message::user(text.clone()),
            Turn::Assistant(text) => Message::assistant(text.clone()),
        }
    }
}

/// 对话状态：以种子问题开头，只追加
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// 以用户问题作为第一轮创建，保证非空
    pub fn seed(question: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::Human(question.into())],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// 最新一轮；seed 之后永远存在
    pub fn last(&self) -> &Turn {
        // seed() 是唯一构造方式且只追加，turns 不会为空
        &self.turns[self.turns.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn to_messages(&self) -> Vec<Message> {
        self.turns.iter().map(Turn::to_message).collect()
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_starts_with_human_turn() {
        let conv = Conversation::seed("What is Rust?");
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.last(), &Turn::Human("What is Rust?".to_string()));
        assert!(!conv.is_empty());
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut conv = Conversation::seed("q");
        conv.push(Turn::Assistant("a1".into()));
        conv.push(Turn::Assistant("a2".into()));
        let texts: Vec<&str> = conv.turns().iter().map(Turn::text).collect();
        assert_eq!(texts, vec!["q", "a1", "a2"]);
        assert!(conv.last().is_assistant());
    }

    #[test]
    fn test_to_messages_maps_roles() {
        let mut conv = Conversation::seed("hi");
        conv.push(Turn::Assistant("hello".into()));
        let msgs = conv.to_messages();
        assert_eq!(msgs[0], Message::user("hi"));
        assert_eq!(msgs[1], Message::assistant("hello"));
    }
}
