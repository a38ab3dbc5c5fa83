//! Outbound chat completions client.
//!
//! Posts the full conversation to `{base_url}/chat/completions` with
//! bearer authentication and normalizes the response into a single reply
//! string via [`extract`](super::extract).

use serde_json::Value;
use tracing::info;

use super::extract;
use super::{LlmError, LlmSettings, Message};

/// Longest upstream body snippet emitted to the diagnostic log.
const LOG_SNIPPET_CHARS: usize = 1000;

/// Client for an `OpenAI`-compatible chat completions API.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsClient {
    /// Create a new client with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    /// The configured model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Forward the conversation upstream and return the assistant reply.
    ///
    /// # Errors
    ///
    /// [`LlmError::Upstream`] when the API answers with a non-success
    /// status, [`LlmError::Transport`] when the call or body decode fails.
    pub async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": self.settings.model,
            "messages": messages,
        });

        let mut rb = self.http.post(&url).json(&body);
        if let Some(k) = &self.settings.api_key {
            rb = rb.bearer_auth(k);
        }

        let resp = rb.send().await?;
        let status = resp.status();
        let raw: Value = resp.json().await?;

        info!(
            name: "llm.upstream.response",
            status = status.as_u16(),
            snippet = %truncate_chars(&raw.to_string(), LOG_SNIPPET_CHARS),
            "Upstream response received"
        );

        if !status.is_success() {
            let message = extract::upstream_error_message(&raw)
                .unwrap_or_else(|| "unknown error from upstream".to_string());
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(extract::reply_text(&raw))
    }
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_untouched() {
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_cuts_at_char_boundary() {
        // Multibyte chars must not be split.
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate_chars("abcde", 5), "abcde");
    }
}
