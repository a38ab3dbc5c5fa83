//! LLM relay types and client.
//!
//! This module bridges the chat endpoint to an `OpenAI`-compatible chat
//! completions API (OpenRouter by default). It owns the conversation
//! message types, the process-wide connection settings, the outbound
//! client, and the reply-extraction logic for the several response
//! layouts upstream providers are known to return.

pub mod chat_completions;
pub mod extract;

pub use chat_completions::ChatCompletionsClient;

/// Model used when `OPENROUTER_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";

/// API base used when `OPENROUTER_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// LLM connection and model settings.
///
/// Read once at startup and shared read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL for the completions API (e.g., `https://openrouter.ai/api/v1`).
    pub base_url: String,
    /// Optional API key for bearer authentication.
    pub api_key: Option<String>,
    /// Model identifier (e.g., `deepseek/deepseek-chat`).
    pub model: String,
}

/// A single turn in a conversation.
///
/// Turns are append-only; the sequence order is the conversation
/// chronology.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: MessageRole,
    /// Text content of the turn.
    pub content: String,
}

impl Message {
    /// Create a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt.
    System,
    /// User message.
    User,
    /// Assistant response.
    Assistant,
}

/// Failure modes of an outbound completion call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The upstream API answered with a non-success status.
    #[error("upstream returned {status}: {message}")]
    Upstream {
        /// Upstream HTTP status code.
        status: u16,
        /// Error message reported by the upstream body, or a generic phrase.
        message: String,
    },
    /// The request never produced a usable response (connect, I/O, or
    /// body-decode failure).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = Message::user("hello");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["role"], "user");
        assert_eq!(v["content"], "hello");
    }

    #[test]
    fn test_message_parses_from_wire_shape() {
        let msg: Message =
            serde_json::from_value(serde_json::json!({"role": "system", "content": "be brief"}))
                .unwrap();
        assert_eq!(msg.role, MessageRole::System);
    }
}
