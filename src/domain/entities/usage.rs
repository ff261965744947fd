use serde::{Deserialize, Serialize};

pub mod counters {
    pub const CONVERSATIONS: &str = "stats:conversations";
    pub const MESSAGES_ANSWERED: &str = "stats:messages_answered";
    pub const PROMPT_TOKENS: &str = "stats:prompt_tokens";
    pub const COMPLETION_TOKENS: &str = "stats:completion_tokens";
    pub const TOTAL_TOKENS: &str = "stats:total_tokens";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Text returned by the language model together with its reported usage.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub conversations: u64,
    pub messages: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}
