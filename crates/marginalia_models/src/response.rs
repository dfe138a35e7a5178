use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completion response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    /// Unique identifier for the completion
    #[serde(default)]
    pub id: String,
    /// Model used for completion
    #[serde(default)]
    pub model: String,
    /// Generated completions
    pub choices: Vec<Choice>,
    /// Token usage statistics
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A completion choice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Choice {
    /// Index of this choice
    #[serde(default)]
    pub index: u32,
    /// The generated message
    pub message: ChoiceMessage,
    /// Reason why generation finished
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message in a choice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChoiceMessage {
    /// Role of the message (typically "assistant")
    pub role: String,
    /// Generated content
    #[serde(default)]
    pub content: String,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}
